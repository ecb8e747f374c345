//! Application Layer
//!
//! Use cases of the provider directory, the booking ledger and the user
//! directory, written against the ports so any storage backend can serve them.

pub mod booking_service;
mod notifier;
pub mod provider_service;
pub mod user_service;

// Re-exports
pub use booking_service::{BookingService, BookingView};
pub use provider_service::{Availability, ProviderService, SlotAvailability};
pub use user_service::UserService;
