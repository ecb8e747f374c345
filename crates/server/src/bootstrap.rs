//! Server Bootstrap
//!
//! Turns a validated [`AppConfig`] into the shared [`AppState`] for the
//! configured storage backend. Both backends log notifications through
//! [`TracingNotificationDispatcher`].

use slotbook_adapters::{
    AppConfig, ConfigError, InMemoryBookingRepository, InMemoryProviderRepository,
    InMemoryUserRepository, PostgreSqlBookingRepository, PostgreSqlProviderRepository,
    PostgreSqlUserRepository, StorageBackend, TracingNotificationDispatcher, init_all_schemas,
};
use slotbook_api::AppState;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("General error: {0}")]
    General(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, BootstrapError>;

#[derive(Clone)]
pub struct ServerComponents {
    pub config: AppConfig,
    pub state: AppState,
}

pub async fn build_components(config: AppConfig) -> Result<ServerComponents> {
    info!(storage = %config.storage.backend, "🚀 Initializing SlotBook server");

    let state = match config.storage.backend {
        StorageBackend::Memory => memory_state(),
        StorageBackend::Postgres => postgres_state(&config).await?,
    };

    Ok(ServerComponents { config, state })
}

fn memory_state() -> AppState {
    let state = AppState::new(
        Arc::new(InMemoryProviderRepository::new()),
        Arc::new(InMemoryBookingRepository::new()),
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(TracingNotificationDispatcher),
    );
    info!("✅ In-memory storage initialized");
    state
}

async fn postgres_state(config: &AppConfig) -> Result<AppState> {
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .acquire_timeout(Duration::from_millis(config.database.connection_timeout_ms))
        .connect(&config.database.url)
        .await
        .map_err(|e| {
            error!("❌ Failed to connect to PostgreSQL: {}", e);
            BootstrapError::General(anyhow::anyhow!("Failed to connect to PostgreSQL: {}", e))
        })?;
    info!("✅ PostgreSQL connection pool initialized");

    init_all_schemas(&pool).await.map_err(|e| {
        error!("❌ Failed to initialize database schema: {}", e);
        BootstrapError::General(anyhow::anyhow!(
            "Failed to initialize database schema: {}",
            e
        ))
    })?;
    info!("   ✅ Database schema initialized");

    Ok(AppState::new(
        Arc::new(PostgreSqlProviderRepository::new(pool.clone())),
        Arc::new(PostgreSqlBookingRepository::new(pool.clone())),
        Arc::new(PostgreSqlUserRepository::new(pool)),
        Arc::new(TracingNotificationDispatcher),
    ))
}
