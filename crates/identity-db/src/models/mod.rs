//! Database models - SQLx-compatible structs for PostgreSQL tables

mod device_token;
mod role;
mod user;

pub use device_token::DeviceTokenModel;
pub use role::RoleModel;
pub use user::UserModel;
