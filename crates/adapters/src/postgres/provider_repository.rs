//! PostgreSQL Provider Repository

use super::{infrastructure, run_ddl};
use async_trait::async_trait;
use slotbook_core::{DomainError, Provider, ProviderId, Result, UserId};
use slotbook_ports::{ProviderFilter, ProviderRepository};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use uuid::Uuid;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS providers (
        id UUID PRIMARY KEY,
        name TEXT NOT NULL,
        category TEXT NOT NULL,
        specialty TEXT NULL,
        slots TEXT[] NOT NULL DEFAULT '{}',
        avatar TEXT NULL,
        owner_id UUID NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_providers_category ON providers (LOWER(category))",
];

const COLUMNS: &str =
    "id, name, category, specialty, slots, avatar, owner_id, created_at, updated_at";

/// PostgreSQL-backed provider directory
#[derive(Debug, Clone)]
pub struct PostgreSqlProviderRepository {
    pool: PgPool,
}

impl PostgreSqlProviderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn init_schema(&self) -> Result<()> {
        run_ddl(&self.pool, "providers", SCHEMA).await
    }

    fn provider_from_row(row: &PgRow) -> Result<Provider> {
        let decode = |e: sqlx::Error| {
            DomainError::Infrastructure(format!("Failed to decode provider row: {}", e))
        };

        Ok(Provider {
            id: ProviderId::from_uuid(row.try_get("id").map_err(decode)?),
            name: row.try_get("name").map_err(decode)?,
            category: row.try_get("category").map_err(decode)?,
            specialty: row.try_get("specialty").map_err(decode)?,
            slots: row.try_get("slots").map_err(decode)?,
            avatar: row.try_get("avatar").map_err(decode)?,
            owner_id: row
                .try_get::<Option<Uuid>, _>("owner_id")
                .map_err(decode)?
                .map(UserId::from_uuid),
            created_at: row.try_get("created_at").map_err(decode)?,
            updated_at: row.try_get("updated_at").map_err(decode)?,
        })
    }
}

#[async_trait]
impl ProviderRepository for PostgreSqlProviderRepository {
    async fn save_provider(&self, provider: &Provider) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO providers (
                id, name, category, specialty, slots, avatar, owner_id, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                category = EXCLUDED.category,
                specialty = EXCLUDED.specialty,
                slots = EXCLUDED.slots,
                avatar = EXCLUDED.avatar,
                owner_id = EXCLUDED.owner_id,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(provider.id.as_uuid())
        .bind(&provider.name)
        .bind(&provider.category)
        .bind(&provider.specialty)
        .bind(&provider.slots)
        .bind(&provider.avatar)
        .bind(provider.owner_id.map(|o| o.as_uuid()))
        .bind(provider.created_at)
        .bind(provider.updated_at)
        .execute(&self.pool)
        .await
        .map_err(infrastructure("Failed to save provider"))?;

        Ok(())
    }

    async fn update_provider(&self, provider: &Provider) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE providers SET
                name = $2,
                category = $3,
                specialty = $4,
                slots = $5,
                avatar = $6,
                owner_id = $7,
                updated_at = $8
            WHERE id = $1
            "#,
        )
        .bind(provider.id.as_uuid())
        .bind(&provider.name)
        .bind(&provider.category)
        .bind(&provider.specialty)
        .bind(&provider.slots)
        .bind(&provider.avatar)
        .bind(provider.owner_id.map(|o| o.as_uuid()))
        .bind(provider.updated_at)
        .execute(&self.pool)
        .await
        .map_err(infrastructure("Failed to update provider"))?;

        Ok(result.rows_affected() == 1)
    }

    async fn get_provider(&self, id: &ProviderId) -> Result<Option<Provider>> {
        let row = sqlx::query(&format!("SELECT {} FROM providers WHERE id = $1", COLUMNS))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(infrastructure("Failed to get provider"))?;

        row.as_ref().map(Self::provider_from_row).transpose()
    }

    async fn list_providers(&self, filter: &ProviderFilter) -> Result<Vec<Provider>> {
        let mut query =
            QueryBuilder::<Postgres>::new(format!("SELECT {} FROM providers WHERE TRUE", COLUMNS));
        if let Some(category) = &filter.category {
            query
                .push(" AND LOWER(category) = LOWER(")
                .push_bind(category.trim())
                .push(")");
        }
        if let Some(specialty) = &filter.specialty {
            query
                .push(" AND LOWER(specialty) = LOWER(")
                .push_bind(specialty.trim())
                .push(")");
        }
        query.push(" ORDER BY created_at ASC");

        let rows = query
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(infrastructure("Failed to list providers"))?;

        rows.iter().map(Self::provider_from_row).collect()
    }

    async fn delete_provider(&self, id: &ProviderId) -> Result<Option<Provider>> {
        let row = sqlx::query(&format!(
            "DELETE FROM providers WHERE id = $1 RETURNING {}",
            COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(infrastructure("Failed to delete provider"))?;

        row.as_ref().map(Self::provider_from_row).transpose()
    }
}
