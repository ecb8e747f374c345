//! Notifications requested as a side effect of booking changes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::booking::{Booking, BookingStatus};
use crate::ids::{BookingId, NotificationId, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    BookingCreated,
    BookingStatusChanged,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::BookingCreated => "booking_created",
            NotificationKind::BookingStatusChanged => "booking_status_changed",
        }
    }
}

/// A notification request addressed to one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRequest {
    pub recipient_id: UserId,
    pub kind: NotificationKind,
    pub booking_id: Option<BookingId>,
    pub message: String,
}

impl NotificationRequest {
    pub fn booking_created(recipient_id: UserId, booking: &Booking, provider_name: &str) -> Self {
        Self {
            recipient_id,
            kind: NotificationKind::BookingCreated,
            booking_id: Some(booking.id),
            message: format!(
                "Booking with {} on {} at {} for {} was created",
                provider_name, booking.date, booking.slot, booking.client_name
            ),
        }
    }

    pub fn status_changed(recipient_id: UserId, booking: &Booking, status: BookingStatus) -> Self {
        Self {
            recipient_id,
            kind: NotificationKind::BookingStatusChanged,
            booking_id: Some(booking.id),
            message: format!(
                "Booking on {} at {} is now {}",
                booking.date, booking.slot, status
            ),
        }
    }
}

/// A recorded notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub recipient_id: UserId,
    pub kind: NotificationKind,
    pub booking_id: Option<BookingId>,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<NotificationRequest> for Notification {
    fn from(request: NotificationRequest) -> Self {
        Self {
            id: NotificationId::new(),
            recipient_id: request.recipient_id,
            kind: request.kind,
            booking_id: request.booking_id,
            message: request.message,
            read: false,
            created_at: Utc::now(),
        }
    }
}
