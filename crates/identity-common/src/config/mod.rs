//! Configuration structs

mod app_config;

pub use app_config::{
    AppConfig, AppSettings, AuthConfig, BootstrapAdminConfig, ConfigError, CorsConfig,
    DatabaseConfig, Environment, ServerConfig, SnowflakeConfig,
};
