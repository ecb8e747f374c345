//! Booking Ledger endpoints

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use slotbook_core::DomainError;
use slotbook_ports::BookingFilter;

use crate::dtos::{
    BookingDto, BookingQuery, BookingViewDto, CreateBookingDto, DeletedDto, ErrorBody,
    UpdateStatusDto,
};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/bookings",
    request_body = CreateBookingDto,
    responses(
        (status = 201, description = "Booking created with status pending", body = BookingDto),
        (status = 400, description = "Missing or malformed fields, or slot already booked", body = ErrorBody),
        (status = 404, description = "Provider not found", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tag = "bookings"
)]
pub async fn create_booking_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateBookingDto>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<BookingDto>)> {
    let Json(payload) = payload?;
    let booking = state
        .bookings
        .create_booking(payload.into())
        .await
        .map_err(ApiError::from_booking_create)?;

    Ok((StatusCode::CREATED, Json(booking.into())))
}

#[utoipa::path(
    get,
    path = "/bookings",
    params(BookingQuery),
    responses(
        (status = 200, description = "Bookings sorted by date and slot", body = Vec<BookingViewDto>),
        (status = 400, description = "Malformed filter", body = ErrorBody)
    ),
    tag = "bookings"
)]
pub async fn list_bookings_handler(
    State(state): State<AppState>,
    query: Result<Query<BookingQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<BookingViewDto>>> {
    let Query(query) = query?;
    let filter = BookingFilter::try_from(query)?;
    let views = state.bookings.list_bookings(&filter).await?;

    Ok(Json(views.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/bookings/{id}",
    params(("id" = String, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking details", body = BookingDto),
        (status = 404, description = "Booking not found", body = ErrorBody)
    ),
    tag = "bookings"
)]
pub async fn get_booking_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<BookingDto>> {
    let booking = state.bookings.get_booking(&id).await?;
    Ok(Json(booking.into()))
}

#[utoipa::path(
    put,
    path = "/bookings/{id}",
    params(("id" = String, Path, description = "Booking ID")),
    request_body = UpdateStatusDto,
    responses(
        (status = 200, description = "Booking with its new status", body = BookingDto),
        (status = 400, description = "Unknown status or illegal transition", body = ErrorBody),
        (status = 404, description = "Booking not found", body = ErrorBody),
        (status = 409, description = "Booking changed concurrently", body = ErrorBody)
    ),
    tag = "bookings"
)]
pub async fn update_booking_status_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateStatusDto>, JsonRejection>,
) -> ApiResult<Json<BookingDto>> {
    let Json(payload) = payload?;
    let status = payload
        .status
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| DomainError::Validation("missing required fields: status".to_string()))?;

    let booking = state.bookings.update_status(&id, &status).await?;
    Ok(Json(booking.into()))
}

#[utoipa::path(
    delete,
    path = "/bookings/{id}",
    params(("id" = String, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking deleted", body = DeletedDto),
        (status = 404, description = "Booking not found", body = ErrorBody)
    ),
    tag = "bookings"
)]
pub async fn delete_booking_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeletedDto>> {
    let id = state.bookings.delete_booking(&id).await?;
    Ok(Json(DeletedDto {
        message: "Booking deleted".to_string(),
        id: id.as_uuid(),
    }))
}

#[utoipa::path(
    get,
    path = "/bookings/provider/{provider_id}",
    params(("provider_id" = String, Path, description = "Provider ID")),
    responses(
        (status = 200, description = "Provider's bookings sorted by date and slot", body = Vec<BookingDto>)
    ),
    tag = "bookings"
)]
pub async fn list_provider_bookings_handler(
    State(state): State<AppState>,
    Path(provider_id): Path<String>,
) -> ApiResult<Json<Vec<BookingDto>>> {
    let bookings = state.bookings.list_by_provider(&provider_id).await?;
    Ok(Json(bookings.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/bookings/client/{email}",
    params(("email" = String, Path, description = "Client email, matched ignoring case")),
    responses(
        (status = 200, description = "Client's bookings sorted by date and slot", body = Vec<BookingDto>)
    ),
    tag = "bookings"
)]
pub async fn list_client_bookings_handler(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> ApiResult<Json<Vec<BookingDto>>> {
    let bookings = state.bookings.list_by_client(&email).await?;
    Ok(Json(bookings.into_iter().map(Into::into).collect()))
}
