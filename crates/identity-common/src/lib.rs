//! # identity-common
//!
//! Shared utilities: configuration, application errors, password hashing,
//! opaque token secrets and telemetry.

pub mod auth;
pub mod config;
pub mod error;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use auth::{
    generate_secret, hash_password, hash_secret, verify_password, PasswordService, PlainToken,
    DEVICE_SECRET_LENGTH, RESET_SECRET_LENGTH,
};
pub use config::{
    AppConfig, AppSettings, AuthConfig, BootstrapAdminConfig, ConfigError, CorsConfig,
    DatabaseConfig, Environment, ServerConfig, SnowflakeConfig,
};
pub use error::{AppError, AppResult, ErrorResponse};
pub use telemetry::{init_tracing, try_init_tracing, try_init_tracing_with_config, TracingConfig, TracingError};
