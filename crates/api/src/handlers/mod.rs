//! HTTP Handlers
//!
//! Handlers translate between DTOs and the application services; every error
//! leaves through `ApiError`.

pub mod bookings;
pub mod providers;
pub mod users;

use axum::response::Json;
use utoipa::OpenApi;

use crate::api_docs::ApiDoc;
use crate::dtos::HealthDto;

#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = HealthDto)),
    tag = "health"
)]
pub async fn health_handler() -> Json<HealthDto> {
    Json(HealthDto {
        status: "ok".to_string(),
        service: "slotbook".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub async fn openapi_handler() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
