//! Booking Repository Port
//!
//! Implementations own the active-slot invariant: at most one booking whose
//! status is not `cancelled` per (provider, date, slot). It must be enforced
//! by the store itself, atomically with the insert, never by a separate read
//! followed by a write.

use async_trait::async_trait;
use slotbook_core::{Booking, BookingId, BookingStatus, NaiveDate, ProviderId, Result};

/// Listing filter; unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingFilter {
    pub provider_id: Option<ProviderId>,
    /// Compared against the stored, lower-cased email
    pub client_email: Option<String>,
    pub status: Option<BookingStatus>,
    pub date: Option<NaiveDate>,
}

impl BookingFilter {
    pub fn for_provider(provider_id: ProviderId) -> Self {
        Self {
            provider_id: Some(provider_id),
            ..Default::default()
        }
    }

    pub fn for_client(email: &str) -> Self {
        Self {
            client_email: Some(slotbook_core::validation::normalize_email(email)),
            ..Default::default()
        }
    }

    pub fn matches(&self, booking: &Booking) -> bool {
        self.provider_id.is_none_or(|p| p == booking.provider_id)
            && self
                .client_email
                .as_deref()
                .is_none_or(|e| e == booking.client_email)
            && self.status.is_none_or(|s| s == booking.status)
            && self.date.is_none_or(|d| d == booking.date)
    }
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Inserts `booking` unless an active booking already holds its slot.
    ///
    /// Fails with `DomainError::Conflict` when the slot is taken.
    async fn insert_if_slot_free(&self, booking: &Booking) -> Result<()>;

    async fn get_booking(&self, id: &BookingId) -> Result<Option<Booking>>;

    /// Matching bookings sorted by `Booking::schedule_order`
    async fn list_bookings(&self, filter: &BookingFilter) -> Result<Vec<Booking>>;

    /// Sets the status only if it is still `expected`.
    ///
    /// Returns `false` when the booking is gone or its status moved on.
    async fn compare_and_swap_status(
        &self,
        id: &BookingId,
        expected: BookingStatus,
        new_status: BookingStatus,
    ) -> Result<bool>;

    /// Returns `false` when no booking had this id
    async fn delete_booking(&self, id: &BookingId) -> Result<bool>;

    /// Cancels every active booking of a provider and returns them as cancelled
    async fn cancel_active_for_provider(&self, provider_id: &ProviderId) -> Result<Vec<Booking>>;
}
