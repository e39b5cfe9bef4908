//! Domain entities - core business objects

mod device_token;
mod password_reset;
mod role;
mod user;

pub use device_token::DeviceToken;
pub use password_reset::PasswordReset;
pub use role::Role;
pub use user::User;
