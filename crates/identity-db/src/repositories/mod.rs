//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in identity-core.

mod device_token;
mod error;
mod password_reset;
mod role;
mod user;

pub use device_token::PgDeviceTokenRepository;
pub use password_reset::PgPasswordResetRepository;
pub use role::PgRoleRepository;
pub use user::PgUserRepository;
