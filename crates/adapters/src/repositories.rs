//! In-Memory Repository Implementations
//!
//! Used by the `memory` storage backend and by tests. Every repository keeps
//! its state behind a single `tokio::sync::RwLock`; the booking ledger also
//! keeps an index of active slots next to the arena of bookings so that the
//! slot check and the insert happen under one write guard.

use async_trait::async_trait;
use chrono::Utc;
use slotbook_core::{
    Booking, BookingId, BookingStatus, DomainError, Provider, ProviderId, Result, SlotKey,
    UserAccount, UserId,
};
use slotbook_ports::{
    BookingFilter, BookingRepository, ProviderFilter, ProviderRepository, UserRepository,
};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// In-memory provider repository
#[derive(Debug, Clone, Default)]
pub struct InMemoryProviderRepository {
    providers: Arc<RwLock<HashMap<ProviderId, Provider>>>,
}

impl InMemoryProviderRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProviderRepository for InMemoryProviderRepository {
    async fn save_provider(&self, provider: &Provider) -> Result<()> {
        let mut providers = self.providers.write().await;
        providers.insert(provider.id, provider.clone());
        Ok(())
    }

    async fn update_provider(&self, provider: &Provider) -> Result<bool> {
        let mut providers = self.providers.write().await;
        match providers.get_mut(&provider.id) {
            Some(stored) => {
                *stored = provider.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn get_provider(&self, id: &ProviderId) -> Result<Option<Provider>> {
        let providers = self.providers.read().await;
        Ok(providers.get(id).cloned())
    }

    async fn list_providers(&self, filter: &ProviderFilter) -> Result<Vec<Provider>> {
        let providers = self.providers.read().await;
        Ok(providers
            .values()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect())
    }

    async fn delete_provider(&self, id: &ProviderId) -> Result<Option<Provider>> {
        let mut providers = self.providers.write().await;
        Ok(providers.remove(id))
    }
}

/// Arena of bookings plus the unique index over active slots.
#[derive(Debug, Default)]
struct LedgerState {
    bookings: HashMap<BookingId, Booking>,
    active_slots: HashMap<SlotKey, BookingId>,
}

impl LedgerState {
    fn release_slot(&mut self, key: &SlotKey, id: BookingId) {
        if self.active_slots.get(key) == Some(&id) {
            self.active_slots.remove(key);
        }
    }
}

/// In-memory booking repository
#[derive(Debug, Clone, Default)]
pub struct InMemoryBookingRepository {
    state: Arc<RwLock<LedgerState>>,
}

impl InMemoryBookingRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn slot_taken() -> DomainError {
    DomainError::Conflict("slot already booked".to_string())
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn insert_if_slot_free(&self, booking: &Booking) -> Result<()> {
        let mut state = self.state.write().await;

        if state.bookings.contains_key(&booking.id) {
            return Err(DomainError::Conflict(format!(
                "booking {} already exists",
                booking.id
            )));
        }

        if booking.is_active() {
            match state.active_slots.entry(booking.slot_key()) {
                Entry::Occupied(held) => {
                    debug!(
                        provider_id = %booking.provider_id,
                        date = %booking.date,
                        slot = %booking.slot,
                        holder = %held.get(),
                        "Slot already held"
                    );
                    return Err(slot_taken());
                }
                Entry::Vacant(free) => {
                    free.insert(booking.id);
                }
            }
        }

        state.bookings.insert(booking.id, booking.clone());
        Ok(())
    }

    async fn get_booking(&self, id: &BookingId) -> Result<Option<Booking>> {
        let state = self.state.read().await;
        Ok(state.bookings.get(id).cloned())
    }

    async fn list_bookings(&self, filter: &BookingFilter) -> Result<Vec<Booking>> {
        let state = self.state.read().await;
        let mut bookings: Vec<Booking> = state
            .bookings
            .values()
            .filter(|b| filter.matches(b))
            .cloned()
            .collect();
        bookings.sort_by(Booking::schedule_order);
        Ok(bookings)
    }

    async fn compare_and_swap_status(
        &self,
        id: &BookingId,
        expected: BookingStatus,
        new_status: BookingStatus,
    ) -> Result<bool> {
        let mut guard = self.state.write().await;
        let state = &mut *guard;

        let Some(booking) = state.bookings.get_mut(id) else {
            return Ok(false);
        };
        if booking.status != expected {
            return Ok(false);
        }

        let key = booking.slot_key();
        match (booking.is_active(), new_status.is_active()) {
            (true, false) => {
                if state.active_slots.get(&key) == Some(id) {
                    state.active_slots.remove(&key);
                }
            }
            (false, true) => match state.active_slots.entry(key) {
                Entry::Occupied(_) => return Err(slot_taken()),
                Entry::Vacant(free) => {
                    free.insert(*id);
                }
            },
            _ => {}
        }

        booking.status = new_status;
        booking.updated_at = Utc::now();
        Ok(true)
    }

    async fn delete_booking(&self, id: &BookingId) -> Result<bool> {
        let mut state = self.state.write().await;
        match state.bookings.remove(id) {
            Some(booking) => {
                state.release_slot(&booking.slot_key(), booking.id);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn cancel_active_for_provider(&self, provider_id: &ProviderId) -> Result<Vec<Booking>> {
        let mut state = self.state.write().await;
        let now = Utc::now();

        let mut cancelled = Vec::new();
        for booking in state.bookings.values_mut() {
            if booking.provider_id == *provider_id && booking.is_active() {
                let key = booking.slot_key();
                booking.status = BookingStatus::Cancelled;
                booking.updated_at = now;
                cancelled.push((key, booking.clone()));
            }
        }
        for (key, booking) in &cancelled {
            state.release_slot(key, booking.id);
        }

        let mut cancelled: Vec<Booking> = cancelled.into_iter().map(|(_, b)| b).collect();
        cancelled.sort_by(Booking::schedule_order);
        Ok(cancelled)
    }
}

/// In-memory user repository
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<UserId, UserAccount>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create_user(&self, user: &UserAccount) -> Result<()> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(DomainError::Conflict(format!(
                "email {} is already registered",
                user.email
            )));
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn get_user(&self, id: &UserId) -> Result<Option<UserAccount>> {
        let users = self.users.read().await;
        Ok(users.get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }
}
