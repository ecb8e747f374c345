//! PostgreSQL Repository Implementations
//!
//! Persistence using PostgreSQL through the async SQLx driver. Each repository
//! owns its table and exposes `init_schema` so the server can create it on
//! startup.

mod booking_repository;
mod provider_repository;
mod user_repository;

pub use booking_repository::PostgreSqlBookingRepository;
pub use provider_repository::PostgreSqlProviderRepository;
pub use user_repository::PostgreSqlUserRepository;

use slotbook_core::DomainError;
use sqlx::PgPool;
use tracing::info;

/// Maps a driver error to `DomainError::Infrastructure`, keeping the context.
pub(crate) fn infrastructure(context: &'static str) -> impl FnOnce(sqlx::Error) -> DomainError {
    move |e| DomainError::Infrastructure(format!("{}: {}", context, e))
}

pub(crate) fn is_unique_violation(error: &sqlx::Error) -> bool {
    matches!(error, sqlx::Error::Database(db) if db.is_unique_violation())
}

/// Runs DDL statements one by one; prepared statements accept a single command.
pub(crate) async fn run_ddl(
    pool: &PgPool,
    table: &'static str,
    statements: &[&str],
) -> slotbook_core::Result<()> {
    info!(table, "Initializing schema");
    for statement in statements {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(infrastructure("Failed to initialize schema"))?;
    }
    info!(table, "Schema initialized successfully");
    Ok(())
}

/// Creates every SlotBook table and index.
pub async fn init_all_schemas(pool: &PgPool) -> slotbook_core::Result<()> {
    PostgreSqlUserRepository::new(pool.clone()).init_schema().await?;
    PostgreSqlProviderRepository::new(pool.clone()).init_schema().await?;
    PostgreSqlBookingRepository::new(pool.clone()).init_schema().await?;
    Ok(())
}
