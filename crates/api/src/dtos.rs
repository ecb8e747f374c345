//! Request and response bodies
//!
//! Field names are camelCase on the wire. Request fields are all optional so
//! that a missing field is reported by domain validation rather than by the
//! JSON decoder.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use slotbook_application::{Availability, BookingView, SlotAvailability};
use slotbook_core::{
    Booking, BookingRequest, BookingStatus, DomainError, NewProvider, NewUser, Provider,
    ProviderId, ProviderPatch, ProviderSummary, UserAccount, UserId, UserRole,
};
use slotbook_core::validation::parse_date;
use slotbook_ports::{BookingFilter, ProviderFilter};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

// --- Common ---

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// `validation_error`, `not_found`, `conflict` or `internal`
    pub kind: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthDto {
    pub status: String,
    pub service: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeletedDto {
    pub message: String,
    pub id: Uuid,
}

// --- Bookings ---

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateBookingDto {
    pub provider_id: Option<String>,
    pub service_type: Option<String>,
    /// `YYYY-MM-DD`
    pub date: Option<String>,
    pub slot: Option<String>,
    pub client_name: Option<String>,
    pub client_email: Option<String>,
    pub client_phone: Option<String>,
    pub description: Option<String>,
}

impl From<CreateBookingDto> for BookingRequest {
    fn from(dto: CreateBookingDto) -> Self {
        Self {
            provider_id: dto.provider_id,
            service_type: dto.service_type,
            date: dto.date,
            slot: dto.slot,
            client_name: dto.client_name,
            client_email: dto.client_email,
            client_phone: dto.client_phone,
            description: dto.description,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct UpdateStatusDto {
    /// `pending`, `confirmed`, `completed` or `cancelled`
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingDto {
    pub id: Uuid,
    pub provider_id: Uuid,
    pub service_type: String,
    pub date: NaiveDate,
    pub slot: String,
    pub client_name: String,
    pub client_email: String,
    pub client_phone: Option<String>,
    pub description: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Booking> for BookingDto {
    fn from(b: Booking) -> Self {
        Self {
            id: b.id.as_uuid(),
            provider_id: b.provider_id.as_uuid(),
            service_type: b.service_type,
            date: b.date,
            slot: b.slot,
            client_name: b.client_name,
            client_email: b.client_email,
            client_phone: b.client_phone,
            description: b.description,
            status: b.status.as_str().to_string(),
            created_at: b.created_at,
            updated_at: b.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProviderSummaryDto {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub specialty: Option<String>,
}

impl From<ProviderSummary> for ProviderSummaryDto {
    fn from(s: ProviderSummary) -> Self {
        Self {
            id: s.id.as_uuid(),
            name: s.name,
            category: s.category,
            specialty: s.specialty,
        }
    }
}

/// A booking with its provider summary; `provider` is null once the
/// provider has been deleted
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingViewDto {
    #[serde(flatten)]
    pub booking: BookingDto,
    pub provider: Option<ProviderSummaryDto>,
}

impl From<BookingView> for BookingViewDto {
    fn from(view: BookingView) -> Self {
        Self {
            booking: view.booking.into(),
            provider: view.provider.map(Into::into),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct BookingQuery {
    pub provider_id: Option<String>,
    pub client_email: Option<String>,
    pub status: Option<String>,
    /// `YYYY-MM-DD`
    pub date: Option<String>,
}

impl TryFrom<BookingQuery> for BookingFilter {
    type Error = DomainError;

    fn try_from(query: BookingQuery) -> Result<Self, Self::Error> {
        let provider_id = query
            .provider_id
            .map(|raw| {
                ProviderId::parse(&raw)
                    .ok_or_else(|| DomainError::Validation(format!("invalid providerId '{raw}'")))
            })
            .transpose()?;
        let client_email = query
            .client_email
            .map(|email| slotbook_core::validation::normalize_email(&email));
        let status = query
            .status
            .map(|s| s.parse::<BookingStatus>())
            .transpose()?;
        let date = query.date.map(|d| parse_date(&d)).transpose()?;

        Ok(Self {
            provider_id,
            client_email,
            status,
            date,
        })
    }
}

// --- Providers ---

fn parse_owner(owner_id: Option<String>) -> Result<Option<UserId>, DomainError> {
    owner_id
        .map(|raw| {
            UserId::parse(&raw)
                .ok_or_else(|| DomainError::Validation(format!("invalid ownerId '{raw}'")))
        })
        .transpose()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ProviderInputDto {
    pub name: Option<String>,
    pub category: Option<String>,
    pub specialty: Option<String>,
    pub slots: Option<Vec<String>>,
    pub avatar: Option<String>,
    pub owner_id: Option<String>,
}

impl TryFrom<ProviderInputDto> for NewProvider {
    type Error = DomainError;

    fn try_from(dto: ProviderInputDto) -> Result<Self, Self::Error> {
        Ok(Self {
            owner_id: parse_owner(dto.owner_id)?,
            name: dto.name,
            category: dto.category,
            specialty: dto.specialty,
            slots: dto.slots,
            avatar: dto.avatar,
        })
    }
}

impl TryFrom<ProviderInputDto> for ProviderPatch {
    type Error = DomainError;

    fn try_from(dto: ProviderInputDto) -> Result<Self, Self::Error> {
        Ok(Self {
            owner_id: parse_owner(dto.owner_id)?,
            name: dto.name,
            category: dto.category,
            specialty: dto.specialty,
            slots: dto.slots,
            avatar: dto.avatar,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProviderDto {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub specialty: Option<String>,
    pub slots: Vec<String>,
    pub avatar: Option<String>,
    pub owner_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Provider> for ProviderDto {
    fn from(p: Provider) -> Self {
        Self {
            id: p.id.as_uuid(),
            name: p.name,
            category: p.category,
            specialty: p.specialty,
            slots: p.slots,
            avatar: p.avatar,
            owner_id: p.owner_id.map(|o| o.as_uuid()),
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProviderQuery {
    pub category: Option<String>,
    pub specialty: Option<String>,
}

impl From<ProviderQuery> for ProviderFilter {
    fn from(query: ProviderQuery) -> Self {
        Self {
            category: query.category,
            specialty: query.specialty,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AvailabilityQuery {
    /// `YYYY-MM-DD`
    pub date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SlotAvailabilityDto {
    pub slot: String,
    pub available: bool,
}

impl From<SlotAvailability> for SlotAvailabilityDto {
    fn from(s: SlotAvailability) -> Self {
        Self {
            slot: s.slot,
            available: s.available,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityDto {
    pub provider_id: Uuid,
    pub date: NaiveDate,
    pub slots: Vec<SlotAvailabilityDto>,
}

impl From<Availability> for AvailabilityDto {
    fn from(a: Availability) -> Self {
        Self {
            provider_id: a.provider_id.as_uuid(),
            date: a.date,
            slots: a.slots.into_iter().map(Into::into).collect(),
        }
    }
}

// --- Users ---

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct CreateUserDto {
    pub name: Option<String>,
    pub email: Option<String>,
    /// `client` (default), `provider` or `admin`
    pub role: Option<String>,
}

impl TryFrom<CreateUserDto> for NewUser {
    type Error = DomainError;

    fn try_from(dto: CreateUserDto) -> Result<Self, Self::Error> {
        Ok(Self {
            name: dto.name,
            email: dto.email,
            role: dto.role.map(|r| r.parse::<UserRole>()).transpose()?,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl From<UserAccount> for UserDto {
    fn from(u: UserAccount) -> Self {
        Self {
            id: u.id.as_uuid(),
            name: u.name,
            email: u.email,
            role: u.role.as_str().to_string(),
            created_at: u.created_at,
        }
    }
}
