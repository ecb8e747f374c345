//! Booking entity and its status machine

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

use crate::error::{DomainError, Result};
use crate::ids::{BookingId, ProviderId};
use crate::validation::{RequiredFields, is_valid_email, non_blank, normalize_email, parse_date};

/// Booking lifecycle.
///
/// `Pending -> Confirmed -> Completed`, with `Cancelled` reachable from every
/// non-terminal state. `Completed` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 4] = [
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::Completed,
        BookingStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::Completed | BookingStatus::Cancelled)
    }

    /// Active bookings hold their slot.
    pub fn is_active(&self) -> bool {
        !matches!(self, BookingStatus::Cancelled)
    }

    pub fn can_transition_to(&self, target: BookingStatus) -> bool {
        matches!(
            (self, target),
            (BookingStatus::Pending, BookingStatus::Confirmed)
                | (BookingStatus::Pending, BookingStatus::Cancelled)
                | (BookingStatus::Confirmed, BookingStatus::Completed)
                | (BookingStatus::Confirmed, BookingStatus::Cancelled)
        )
    }
}

impl Default for BookingStatus {
    fn default() -> Self {
        BookingStatus::Pending
    }
}

impl FromStr for BookingStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        BookingStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == wanted)
            .ok_or_else(|| {
                DomainError::Validation(format!(
                    "invalid status '{s}', expected one of: pending, confirmed, completed, cancelled"
                ))
            })
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Uniqueness key for active bookings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SlotKey {
    pub provider_id: ProviderId,
    pub date: NaiveDate,
    pub slot: String,
}

/// Raw booking request. Every field is optional so that missing input is
/// reported as a validation error rather than a decoding failure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingRequest {
    pub provider_id: Option<String>,
    pub service_type: Option<String>,
    pub date: Option<String>,
    pub slot: Option<String>,
    pub client_name: Option<String>,
    pub client_email: Option<String>,
    pub client_phone: Option<String>,
    pub description: Option<String>,
}

impl BookingRequest {
    /// Checks presence and shape of every field.
    ///
    /// The provider reference is left unresolved; whether it names an
    /// existing provider is decided against the directory.
    pub fn validate(self) -> Result<NewBooking> {
        let mut required = RequiredFields::default();
        let provider_ref = required.take("providerId", self.provider_id);
        let service_type = required.take("serviceType", self.service_type);
        let date = required.take("date", self.date);
        let slot = required.take("slot", self.slot);
        let client_name = required.take("clientName", self.client_name);
        let client_email = required.take("clientEmail", self.client_email);
        required.finish()?;

        let date = parse_date(&date)?;
        let client_email = normalize_email(&client_email);
        if !is_valid_email(&client_email) {
            return Err(DomainError::Validation(format!(
                "invalid client email '{client_email}'"
            )));
        }

        Ok(NewBooking {
            provider_ref,
            service_type,
            date,
            slot,
            client_name,
            client_email,
            client_phone: non_blank(self.client_phone),
            description: non_blank(self.description),
        })
    }
}

/// A booking request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBooking {
    pub provider_ref: String,
    pub service_type: String,
    pub date: NaiveDate,
    pub slot: String,
    pub client_name: String,
    pub client_email: String,
    pub client_phone: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub provider_id: ProviderId,
    pub service_type: String,
    pub date: NaiveDate,
    pub slot: String,
    pub client_name: String,
    pub client_email: String,
    pub client_phone: Option<String>,
    pub description: Option<String>,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Builds a pending booking for an already resolved provider.
    pub fn create(provider_id: ProviderId, new: NewBooking) -> Self {
        let now = Utc::now();
        Self {
            id: BookingId::new(),
            provider_id,
            service_type: new.service_type,
            date: new.date,
            slot: new.slot,
            client_name: new.client_name,
            client_email: new.client_email,
            client_phone: new.client_phone,
            description: new.description,
            status: BookingStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn slot_key(&self) -> SlotKey {
        SlotKey {
            provider_id: self.provider_id,
            date: self.date,
            slot: self.slot.clone(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Moves the booking to `target`.
    ///
    /// Returns `Ok(false)` when the booking already has that status.
    pub fn transition_to(&mut self, target: BookingStatus) -> Result<bool> {
        if self.status == target {
            return Ok(false);
        }
        if !self.status.can_transition_to(target) {
            return Err(DomainError::invalid_state_transition(
                self.status.as_str(),
                target.as_str(),
            ));
        }
        self.status = target;
        self.updated_at = Utc::now();
        Ok(true)
    }

    /// Ordering used by every listing: date, then slot label, then age.
    pub fn schedule_order(a: &Booking, b: &Booking) -> Ordering {
        a.date
            .cmp(&b.date)
            .then_with(|| a.slot.cmp(&b.slot))
            .then_with(|| a.created_at.cmp(&b.created_at))
    }
}
