//! Domain Core - Business Logic and Shared Types
//!
//! This crate contains the entities of the booking domain (providers,
//! bookings, user accounts, notifications), their invariants and the
//! validation applied to caller input before anything is persisted.

pub mod booking;
pub mod error;
pub mod ids;
pub mod notification;
pub mod provider;
pub mod user;
pub mod validation;

pub use crate::error::{DomainError, Result};
pub use chrono::{DateTime, NaiveDate, Utc};
pub use uuid::Uuid;

pub use crate::booking::{Booking, BookingRequest, BookingStatus, NewBooking, SlotKey};
pub use crate::ids::{BookingId, NotificationId, ProviderId, UserId};
pub use crate::notification::{Notification, NotificationKind, NotificationRequest};
pub use crate::provider::{NewProvider, Provider, ProviderPatch, ProviderSummary};
pub use crate::user::{NewUser, UserAccount, UserRole};
