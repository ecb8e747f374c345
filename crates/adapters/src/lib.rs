//! Adapters - Infrastructure Implementations
//!
//! Implementations of the ports defined in `slotbook-ports`, plus the
//! application configuration.

pub mod config;
pub mod notifications;
pub mod postgres;
pub mod repositories;

pub use crate::config::{AppConfig, ConfigError, StorageBackend};
pub use crate::notifications::{InMemoryNotificationDispatcher, TracingNotificationDispatcher};
pub use crate::repositories::{
    InMemoryBookingRepository, InMemoryProviderRepository, InMemoryUserRepository,
};

// PostgreSQL implementations
pub use crate::postgres::{
    PostgreSqlBookingRepository, PostgreSqlProviderRepository, PostgreSqlUserRepository,
    init_all_schemas,
};
