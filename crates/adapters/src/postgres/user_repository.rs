//! PostgreSQL User Repository

use super::{infrastructure, is_unique_violation, run_ddl};
use async_trait::async_trait;
use slotbook_core::{DomainError, Result, UserAccount, UserId, UserRole};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use slotbook_ports::UserRepository;

const SCHEMA: &[&str] = &[r#"
    CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        role TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#];

/// PostgreSQL-backed user directory
#[derive(Debug, Clone)]
pub struct PostgreSqlUserRepository {
    pool: PgPool,
}

impl PostgreSqlUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn init_schema(&self) -> Result<()> {
        run_ddl(&self.pool, "users", SCHEMA).await
    }

    fn user_from_row(row: &PgRow) -> Result<UserAccount> {
        let decode =
            |e: sqlx::Error| DomainError::Infrastructure(format!("Failed to decode user row: {}", e));

        let role = row
            .try_get::<String, _>("role")
            .map_err(decode)?
            .parse::<UserRole>()
            .map_err(|e| DomainError::Infrastructure(format!("Stored user role: {}", e)))?;

        Ok(UserAccount {
            id: UserId::from_uuid(row.try_get("id").map_err(decode)?),
            name: row.try_get("name").map_err(decode)?,
            email: row.try_get("email").map_err(decode)?,
            role,
            created_at: row.try_get("created_at").map_err(decode)?,
        })
    }
}

#[async_trait]
impl UserRepository for PostgreSqlUserRepository {
    async fn create_user(&self, user: &UserAccount) -> Result<()> {
        sqlx::query(
            "INSERT INTO users (id, name, email, role, created_at) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(user.id.as_uuid())
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.role.as_str())
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::Conflict(format!("email {} is already registered", user.email))
            } else {
                infrastructure("Failed to create user")(e)
            }
        })?;

        Ok(())
    }

    async fn get_user(&self, id: &UserId) -> Result<Option<UserAccount>> {
        let row = sqlx::query("SELECT id, name, email, role, created_at FROM users WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(infrastructure("Failed to get user"))?;

        row.as_ref().map(Self::user_from_row).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>> {
        let row =
            sqlx::query("SELECT id, name, email, role, created_at FROM users WHERE email = $1")
                .bind(email)
                .fetch_optional(&self.pool)
                .await
                .map_err(infrastructure("Failed to find user by email"))?;

        row.as_ref().map(Self::user_from_row).transpose()
    }
}
