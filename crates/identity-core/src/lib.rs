//! # identity-core
//!
//! Domain layer for the identity server: accounts, roles, device tokens and
//! password resets, plus the ports the storage and delivery layers implement.
//! No database or web framework types appear here.

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

pub use entities::{DeviceToken, PasswordReset, Role, User};
pub use error::DomainError;
pub use traits::{
    DeviceTokenRepository, PasswordResetNotifier, PasswordResetRepository, PasswordVerifier,
    RepoResult, RoleRepository, UserRepository,
};
pub use value_objects::{
    DeletedScope, LoginIdentifier, Snowflake, SnowflakeGenerator, SnowflakeParseError,
};
