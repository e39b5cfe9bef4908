//! Authentication utilities

mod password;
mod token;

pub use password::{hash_password, verify_password, PasswordService};
pub use token::{
    generate_secret, hash_secret, PlainToken, DEVICE_SECRET_LENGTH, RESET_SECRET_LENGTH,
};
