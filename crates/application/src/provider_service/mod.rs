//! Application Service for the Provider Directory

use slotbook_core::validation::parse_date;
use slotbook_core::{
    BookingStatus, DomainError, NaiveDate, NewProvider, Provider, ProviderId, ProviderPatch,
    Result,
};
use slotbook_ports::{
    BookingFilter, BookingRepository, NotificationDispatcher, ProviderFilter, ProviderRepository,
    UserRepository,
};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::info;

use crate::notifier::{BookingEvent, BookingNotifier};

pub(crate) fn provider_not_found() -> DomainError {
    DomainError::NotFound("provider not found".to_string())
}

/// Whether one offered slot is still free on a given date
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotAvailability {
    pub slot: String,
    pub available: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Availability {
    pub provider_id: ProviderId,
    pub date: NaiveDate,
    pub slots: Vec<SlotAvailability>,
}

pub struct ProviderService {
    provider_repo: Arc<dyn ProviderRepository>,
    booking_repo: Arc<dyn BookingRepository>,
    notifier: BookingNotifier,
}

impl ProviderService {
    pub fn new(
        provider_repo: Arc<dyn ProviderRepository>,
        booking_repo: Arc<dyn BookingRepository>,
        user_repo: Arc<dyn UserRepository>,
        dispatcher: Arc<dyn NotificationDispatcher>,
    ) -> Self {
        Self {
            provider_repo,
            booking_repo,
            notifier: BookingNotifier::new(user_repo, dispatcher),
        }
    }

    pub async fn create_provider(&self, attributes: NewProvider) -> Result<Provider> {
        let provider = attributes.into_provider()?;
        self.provider_repo.save_provider(&provider).await?;

        info!(provider_id = %provider.id, category = %provider.category, "Provider created");
        Ok(provider)
    }

    /// Unparseable ids are reported as not found.
    pub async fn get_provider(&self, id: &str) -> Result<Provider> {
        let id = ProviderId::parse(id).ok_or_else(provider_not_found)?;
        self.provider_repo
            .get_provider(&id)
            .await?
            .ok_or_else(provider_not_found)
    }

    pub async fn list_providers(&self, filter: &ProviderFilter) -> Result<Vec<Provider>> {
        self.provider_repo.list_providers(filter).await
    }

    /// The write only touches an existing row, so a provider deleted after
    /// the read stays deleted and the update reports not found.
    pub async fn update_provider(&self, id: &str, patch: ProviderPatch) -> Result<Provider> {
        let mut provider = self.get_provider(id).await?;
        provider.apply(patch)?;
        if !self.provider_repo.update_provider(&provider).await? {
            return Err(provider_not_found());
        }

        info!(provider_id = %provider.id, "Provider updated");
        Ok(provider)
    }

    /// Removes the provider and cancels its active bookings, notifying each
    /// client and the former owner of the cancellation.
    ///
    /// The provider goes first so that new requests stop resolving it. A
    /// create that resolved it just before can still land after the cascade.
    pub async fn delete_provider(&self, id: &str) -> Result<ProviderId> {
        let id = ProviderId::parse(id).ok_or_else(provider_not_found)?;
        let provider = self
            .provider_repo
            .delete_provider(&id)
            .await?
            .ok_or_else(provider_not_found)?;

        let cancelled = self.booking_repo.cancel_active_for_provider(&id).await?;
        info!(provider_id = %id, cancelled = cancelled.len(), "Provider deleted");

        for booking in cancelled {
            self.notifier.notify_in_background(
                booking,
                provider.owner_id,
                BookingEvent::StatusChanged(BookingStatus::Cancelled),
            );
        }
        Ok(id)
    }

    pub async fn availability(&self, id: &str, date: &str) -> Result<Availability> {
        let date = parse_date(date)?;
        let provider = self.get_provider(id).await?;

        let filter = BookingFilter {
            date: Some(date),
            ..BookingFilter::for_provider(provider.id)
        };
        let held: HashSet<String> = self
            .booking_repo
            .list_bookings(&filter)
            .await?
            .into_iter()
            .filter(|b| b.is_active())
            .map(|b| b.slot)
            .collect();

        let mut seen = HashSet::new();
        let slots = provider
            .slots
            .iter()
            .filter(|slot| seen.insert(slot.as_str()))
            .map(|slot| SlotAvailability {
                slot: slot.clone(),
                available: !held.contains(slot),
            })
            .collect();

        Ok(Availability {
            provider_id: provider.id,
            date,
            slots,
        })
    }
}
