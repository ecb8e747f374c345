//! PostgreSQL Booking Repository
//!
//! The active-slot rule lives in the schema as a partial unique index over
//! `(provider_id, booking_date, slot)` for rows that are not cancelled. Inserts
//! use `ON CONFLICT ... DO NOTHING RETURNING id`, so of two concurrent requests
//! for the same slot exactly one gets a row back.

use super::{infrastructure, is_unique_violation, run_ddl};
use async_trait::async_trait;
use slotbook_core::{Booking, BookingId, BookingStatus, DomainError, ProviderId, Result};
use slotbook_ports::{BookingFilter, BookingRepository};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use tracing::{debug, info};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS bookings (
        id UUID PRIMARY KEY,
        provider_id UUID NOT NULL,
        service_type TEXT NOT NULL,
        booking_date DATE NOT NULL,
        slot TEXT NOT NULL,
        client_name TEXT NOT NULL,
        client_email TEXT NOT NULL,
        client_phone TEXT NULL,
        description TEXT NULL,
        status TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE UNIQUE INDEX IF NOT EXISTS ux_bookings_active_slot
    ON bookings (provider_id, booking_date, slot)
    WHERE status <> 'cancelled'
    "#,
    "CREATE INDEX IF NOT EXISTS idx_bookings_client_email ON bookings (client_email)",
    "CREATE INDEX IF NOT EXISTS idx_bookings_provider ON bookings (provider_id, booking_date)",
];

const COLUMNS: &str = "id, provider_id, service_type, booking_date, slot, client_name, \
                       client_email, client_phone, description, status, created_at, updated_at";

/// `COLLATE "C"` keeps slot ordering byte-wise, matching the in-memory ledger.
const SCHEDULE_ORDER: &str = r#" ORDER BY booking_date ASC, slot COLLATE "C" ASC, created_at ASC"#;

fn slot_taken() -> DomainError {
    DomainError::Conflict("slot already booked".to_string())
}

/// PostgreSQL-backed booking ledger
#[derive(Debug, Clone)]
pub struct PostgreSqlBookingRepository {
    pool: PgPool,
}

impl PostgreSqlBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn init_schema(&self) -> Result<()> {
        run_ddl(&self.pool, "bookings", SCHEMA).await
    }

    fn booking_from_row(row: &PgRow) -> Result<Booking> {
        let decode = |e: sqlx::Error| {
            DomainError::Infrastructure(format!("Failed to decode booking row: {}", e))
        };

        let status = row
            .try_get::<String, _>("status")
            .map_err(decode)?
            .parse::<BookingStatus>()
            .map_err(|e| DomainError::Infrastructure(format!("Stored booking status: {}", e)))?;

        Ok(Booking {
            id: BookingId::from_uuid(row.try_get("id").map_err(decode)?),
            provider_id: ProviderId::from_uuid(row.try_get("provider_id").map_err(decode)?),
            service_type: row.try_get("service_type").map_err(decode)?,
            date: row.try_get("booking_date").map_err(decode)?,
            slot: row.try_get("slot").map_err(decode)?,
            client_name: row.try_get("client_name").map_err(decode)?,
            client_email: row.try_get("client_email").map_err(decode)?,
            client_phone: row.try_get("client_phone").map_err(decode)?,
            description: row.try_get("description").map_err(decode)?,
            status,
            created_at: row.try_get("created_at").map_err(decode)?,
            updated_at: row.try_get("updated_at").map_err(decode)?,
        })
    }
}

#[async_trait]
impl BookingRepository for PostgreSqlBookingRepository {
    async fn insert_if_slot_free(&self, booking: &Booking) -> Result<()> {
        let inserted = sqlx::query(
            r#"
            INSERT INTO bookings (
                id, provider_id, service_type, booking_date, slot, client_name,
                client_email, client_phone, description, status, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT (provider_id, booking_date, slot) WHERE status <> 'cancelled'
            DO NOTHING
            RETURNING id
            "#,
        )
        .bind(booking.id.as_uuid())
        .bind(booking.provider_id.as_uuid())
        .bind(&booking.service_type)
        .bind(booking.date)
        .bind(&booking.slot)
        .bind(&booking.client_name)
        .bind(&booking.client_email)
        .bind(&booking.client_phone)
        .bind(&booking.description)
        .bind(booking.status.as_str())
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                slot_taken()
            } else {
                infrastructure("Failed to insert booking")(e)
            }
        })?;

        match inserted {
            Some(_) => Ok(()),
            None => {
                debug!(
                    provider_id = %booking.provider_id,
                    date = %booking.date,
                    slot = %booking.slot,
                    "Slot already held"
                );
                Err(slot_taken())
            }
        }
    }

    async fn get_booking(&self, id: &BookingId) -> Result<Option<Booking>> {
        let row = sqlx::query(&format!("SELECT {} FROM bookings WHERE id = $1", COLUMNS))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(infrastructure("Failed to get booking"))?;

        row.as_ref().map(Self::booking_from_row).transpose()
    }

    async fn list_bookings(&self, filter: &BookingFilter) -> Result<Vec<Booking>> {
        let mut query =
            QueryBuilder::<Postgres>::new(format!("SELECT {} FROM bookings WHERE TRUE", COLUMNS));
        if let Some(provider_id) = filter.provider_id {
            query.push(" AND provider_id = ").push_bind(provider_id.as_uuid());
        }
        if let Some(email) = &filter.client_email {
            query.push(" AND client_email = ").push_bind(email.as_str());
        }
        if let Some(status) = filter.status {
            query.push(" AND status = ").push_bind(status.as_str());
        }
        if let Some(date) = filter.date {
            query.push(" AND booking_date = ").push_bind(date);
        }
        query.push(SCHEDULE_ORDER);

        let rows = query
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(infrastructure("Failed to list bookings"))?;

        rows.iter().map(Self::booking_from_row).collect()
    }

    async fn compare_and_swap_status(
        &self,
        id: &BookingId,
        expected: BookingStatus,
        new_status: BookingStatus,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE bookings
            SET status = $1, updated_at = NOW()
            WHERE id = $2 AND status = $3
            "#,
        )
        .bind(new_status.as_str())
        .bind(id.as_uuid())
        .bind(expected.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                slot_taken()
            } else {
                infrastructure("Failed to update booking status")(e)
            }
        })?;

        Ok(result.rows_affected() == 1)
    }

    async fn delete_booking(&self, id: &BookingId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(infrastructure("Failed to delete booking"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn cancel_active_for_provider(&self, provider_id: &ProviderId) -> Result<Vec<Booking>> {
        let rows = sqlx::query(&format!(
            r#"
            UPDATE bookings
            SET status = 'cancelled', updated_at = NOW()
            WHERE provider_id = $1 AND status IN ('pending', 'confirmed')
            RETURNING {}
            "#,
            COLUMNS
        ))
        .bind(provider_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(infrastructure("Failed to cancel provider bookings"))?;

        let mut cancelled = rows
            .iter()
            .map(Self::booking_from_row)
            .collect::<Result<Vec<_>>>()?;
        cancelled.sort_by(Booking::schedule_order);

        if !cancelled.is_empty() {
            info!(%provider_id, cancelled = cancelled.len(), "Cancelled active bookings of provider");
        }
        Ok(cancelled)
    }
}
