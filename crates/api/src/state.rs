//! Shared application state
//!
//! Built once at startup and handed to every handler through axum `State`.

use slotbook_application::{BookingService, ProviderService, UserService};
use slotbook_ports::{BookingRepository, NotificationDispatcher, ProviderRepository, UserRepository};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub providers: Arc<ProviderService>,
    pub bookings: Arc<BookingService>,
    pub users: Arc<UserService>,
}

impl AppState {
    pub fn new(
        provider_repo: Arc<dyn ProviderRepository>,
        booking_repo: Arc<dyn BookingRepository>,
        user_repo: Arc<dyn UserRepository>,
        dispatcher: Arc<dyn NotificationDispatcher>,
    ) -> Self {
        Self {
            providers: Arc::new(ProviderService::new(
                provider_repo.clone(),
                booking_repo.clone(),
                user_repo.clone(),
                dispatcher.clone(),
            )),
            bookings: Arc::new(BookingService::new(
                booking_repo,
                provider_repo,
                user_repo.clone(),
                dispatcher,
            )),
            users: Arc::new(UserService::new(user_repo)),
        }
    }
}
