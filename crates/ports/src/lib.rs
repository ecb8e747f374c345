//! Ports - Abstraction Layer
//!
//! This crate defines ports (traits) that represent the interfaces
//! needed by the application layer. These are implemented by adapters
//! in the infrastructure layer.

pub mod booking_repository;
pub mod notification;
pub mod provider_repository;
pub mod user_repository;

pub use crate::booking_repository::{BookingFilter, BookingRepository};
pub use crate::notification::{NotificationDispatcher, NotificationError};
pub use crate::provider_repository::{ProviderFilter, ProviderRepository};
pub use crate::user_repository::UserRepository;
