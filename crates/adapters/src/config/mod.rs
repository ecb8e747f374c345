//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, ConfigError, DatabaseConfig, LogFormat, LoggingConfig, Result, ServerConfig,
    StorageBackend, StorageConfig,
};
