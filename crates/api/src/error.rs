//! HTTP error mapping
//!
//! Every failure leaves the API as
//! `{"error": {"kind": "...", "message": "..."}}`. Internal failures are
//! logged here and reported with a generic message.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use slotbook_core::DomainError;
use tracing::{error, warn};

use crate::dtos::{ErrorBody, ErrorDetail};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub kind: &'static str,
    pub message: String,
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            kind: "validation_error",
            message: message.into(),
        }
    }

    /// `POST /bookings` reports a taken slot as a bad request.
    pub fn from_booking_create(error: DomainError) -> Self {
        let mut api_error = Self::from(error);
        if api_error.kind == "conflict" {
            api_error.status = StatusCode::BAD_REQUEST;
        }
        api_error
    }
}

impl From<DomainError> for ApiError {
    fn from(error: DomainError) -> Self {
        let kind = error.kind();
        let (status, message) = match error {
            DomainError::Validation(message) => (StatusCode::BAD_REQUEST, message),
            e @ DomainError::InvalidStateTransition { .. } => (StatusCode::BAD_REQUEST, e.to_string()),
            DomainError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            DomainError::Conflict(message) => (StatusCode::CONFLICT, message),
            DomainError::Infrastructure(detail) => {
                error!(error = %detail, "Request failed with an internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };
        Self {
            status,
            kind,
            message,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        warn!(error = %rejection.body_text(), "Rejected JSON body");
        Self::validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                kind: self.kind.to_string(),
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
