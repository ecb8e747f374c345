//! Application Service for the Booking Ledger
//!
//! Validates booking requests, resolves the provider and hands the insert to
//! the repository, which owns the one-active-booking-per-slot rule. After a
//! successful write the client and the provider owner are notified from a
//! detached task; dispatch outcomes never reach the caller.

use slotbook_core::{
    Booking, BookingId, BookingRequest, BookingStatus, DomainError, Provider, ProviderId,
    ProviderSummary, Result,
};
use slotbook_ports::{
    BookingFilter, BookingRepository, NotificationDispatcher, ProviderRepository, UserRepository,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::notifier::{BookingEvent, BookingNotifier};
use crate::provider_service::provider_not_found;

fn booking_not_found() -> DomainError {
    DomainError::NotFound("booking not found".to_string())
}

/// A listed booking with a summary of its provider.
///
/// `provider` is `None` once the provider has been deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingView {
    pub booking: Booking,
    pub provider: Option<ProviderSummary>,
}

pub struct BookingService {
    booking_repo: Arc<dyn BookingRepository>,
    provider_repo: Arc<dyn ProviderRepository>,
    notifier: BookingNotifier,
}

impl BookingService {
    pub fn new(
        booking_repo: Arc<dyn BookingRepository>,
        provider_repo: Arc<dyn ProviderRepository>,
        user_repo: Arc<dyn UserRepository>,
        dispatcher: Arc<dyn NotificationDispatcher>,
    ) -> Self {
        Self {
            booking_repo,
            provider_repo,
            notifier: BookingNotifier::new(user_repo, dispatcher),
        }
    }

    pub async fn create_booking(&self, request: BookingRequest) -> Result<Booking> {
        let new = request.validate()?;

        let provider = self
            .resolve_provider(&new.provider_ref)
            .await?
            .ok_or_else(provider_not_found)?;
        if !provider.offers_slot(&new.slot) {
            return Err(DomainError::Validation(format!(
                "slot '{}' is not offered by provider {}",
                new.slot, provider.id
            )));
        }

        let booking = Booking::create(provider.id, new);
        self.booking_repo.insert_if_slot_free(&booking).await?;

        info!(
            booking_id = %booking.id,
            provider_id = %booking.provider_id,
            date = %booking.date,
            slot = %booking.slot,
            "Booking created"
        );

        self.notifier.notify_in_background(
            booking.clone(),
            provider.owner_id,
            BookingEvent::Created {
                provider_name: provider.name,
            },
        );
        Ok(booking)
    }

    /// Moves a booking along its status machine.
    ///
    /// Re-applying the current status succeeds without notifying anyone. The
    /// write is a compare-and-swap on the status read here, so a concurrent
    /// change surfaces as `Conflict` instead of being overwritten.
    pub async fn update_status(&self, id: &str, status: &str) -> Result<Booking> {
        let target: BookingStatus = status.parse()?;
        let id = BookingId::parse(id).ok_or_else(booking_not_found)?;

        let mut booking = self
            .booking_repo
            .get_booking(&id)
            .await?
            .ok_or_else(booking_not_found)?;
        let current = booking.status;
        if !booking.transition_to(target)? {
            debug!(booking_id = %id, status = %target, "Status unchanged");
            return Ok(booking);
        }

        if !self
            .booking_repo
            .compare_and_swap_status(&id, current, target)
            .await?
        {
            return match self.booking_repo.get_booking(&id).await? {
                None => Err(booking_not_found()),
                Some(latest) => Err(DomainError::Conflict(format!(
                    "booking {} changed concurrently and is now {}",
                    id, latest.status
                ))),
            };
        }

        info!(booking_id = %id, from = %current, to = %target, "Booking status updated");

        let owner_id = match self.provider_repo.get_provider(&booking.provider_id).await {
            Ok(provider) => provider.and_then(|p| p.owner_id),
            Err(e) => {
                warn!(booking_id = %id, error = %e, "Could not resolve provider owner");
                None
            }
        };
        self.notifier.notify_in_background(
            booking.clone(),
            owner_id,
            BookingEvent::StatusChanged(target),
        );
        Ok(booking)
    }

    pub async fn get_booking(&self, id: &str) -> Result<Booking> {
        let id = BookingId::parse(id).ok_or_else(booking_not_found)?;
        self.booking_repo
            .get_booking(&id)
            .await?
            .ok_or_else(booking_not_found)
    }

    /// Bookings matching `filter`, each with its provider summary
    pub async fn list_bookings(&self, filter: &BookingFilter) -> Result<Vec<BookingView>> {
        let bookings = self.booking_repo.list_bookings(filter).await?;

        let mut summaries: HashMap<ProviderId, Option<ProviderSummary>> = HashMap::new();
        let mut views = Vec::with_capacity(bookings.len());
        for booking in bookings {
            let provider = match summaries.get(&booking.provider_id) {
                Some(summary) => summary.clone(),
                None => {
                    let summary = self
                        .provider_repo
                        .get_provider(&booking.provider_id)
                        .await?
                        .map(|p| p.summary());
                    summaries.insert(booking.provider_id, summary.clone());
                    summary
                }
            };
            views.push(BookingView { booking, provider });
        }
        Ok(views)
    }

    /// An id that does not parse matches no booking.
    pub async fn list_by_provider(&self, provider_id: &str) -> Result<Vec<Booking>> {
        match ProviderId::parse(provider_id) {
            Some(id) => {
                self.booking_repo
                    .list_bookings(&BookingFilter::for_provider(id))
                    .await
            }
            None => Ok(Vec::new()),
        }
    }

    pub async fn list_by_client(&self, email: &str) -> Result<Vec<Booking>> {
        self.booking_repo
            .list_bookings(&BookingFilter::for_client(email))
            .await
    }

    pub async fn delete_booking(&self, id: &str) -> Result<BookingId> {
        let id = BookingId::parse(id).ok_or_else(booking_not_found)?;
        if !self.booking_repo.delete_booking(&id).await? {
            return Err(booking_not_found());
        }

        info!(booking_id = %id, "Booking deleted");
        Ok(id)
    }

    async fn resolve_provider(&self, provider_ref: &str) -> Result<Option<Provider>> {
        match ProviderId::parse(provider_ref) {
            Some(id) => self.provider_repo.get_provider(&id).await,
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests;
