//! Provider Directory endpoints

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use slotbook_core::{DomainError, NewProvider, ProviderPatch};

use crate::dtos::{
    AvailabilityDto, AvailabilityQuery, DeletedDto, ErrorBody, ProviderDto, ProviderInputDto,
    ProviderQuery,
};
use crate::error::ApiResult;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/providers",
    request_body = ProviderInputDto,
    responses(
        (status = 201, description = "Provider created", body = ProviderDto),
        (status = 400, description = "Missing name or category", body = ErrorBody)
    ),
    tag = "providers"
)]
pub async fn create_provider_handler(
    State(state): State<AppState>,
    payload: Result<Json<ProviderInputDto>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ProviderDto>)> {
    let Json(payload) = payload?;
    let provider = state
        .providers
        .create_provider(NewProvider::try_from(payload)?)
        .await?;

    Ok((StatusCode::CREATED, Json(provider.into())))
}

#[utoipa::path(
    get,
    path = "/providers",
    params(ProviderQuery),
    responses(
        (status = 200, description = "Providers matching the filter", body = Vec<ProviderDto>)
    ),
    tag = "providers"
)]
pub async fn list_providers_handler(
    State(state): State<AppState>,
    query: Result<Query<ProviderQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<ProviderDto>>> {
    let Query(query) = query?;
    let providers = state.providers.list_providers(&query.into()).await?;
    Ok(Json(providers.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/providers/{id}",
    params(("id" = String, Path, description = "Provider ID")),
    responses(
        (status = 200, description = "Provider details", body = ProviderDto),
        (status = 404, description = "Provider not found", body = ErrorBody)
    ),
    tag = "providers"
)]
pub async fn get_provider_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ProviderDto>> {
    let provider = state.providers.get_provider(&id).await?;
    Ok(Json(provider.into()))
}

#[utoipa::path(
    put,
    path = "/providers/{id}",
    params(("id" = String, Path, description = "Provider ID")),
    request_body = ProviderInputDto,
    responses(
        (status = 200, description = "Provider updated", body = ProviderDto),
        (status = 400, description = "Blank name or category", body = ErrorBody),
        (status = 404, description = "Provider not found", body = ErrorBody)
    ),
    tag = "providers"
)]
pub async fn update_provider_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ProviderInputDto>, JsonRejection>,
) -> ApiResult<Json<ProviderDto>> {
    let Json(payload) = payload?;
    let provider = state
        .providers
        .update_provider(&id, ProviderPatch::try_from(payload)?)
        .await?;

    Ok(Json(provider.into()))
}

#[utoipa::path(
    delete,
    path = "/providers/{id}",
    params(("id" = String, Path, description = "Provider ID")),
    responses(
        (status = 200, description = "Provider deleted, its active bookings cancelled", body = DeletedDto),
        (status = 404, description = "Provider not found", body = ErrorBody)
    ),
    tag = "providers"
)]
pub async fn delete_provider_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeletedDto>> {
    let id = state.providers.delete_provider(&id).await?;
    Ok(Json(DeletedDto {
        message: "Provider deleted".to_string(),
        id: id.as_uuid(),
    }))
}

#[utoipa::path(
    get,
    path = "/providers/{id}/availability",
    params(("id" = String, Path, description = "Provider ID"), AvailabilityQuery),
    responses(
        (status = 200, description = "Offered slots for the date", body = AvailabilityDto),
        (status = 400, description = "Missing or malformed date", body = ErrorBody),
        (status = 404, description = "Provider not found", body = ErrorBody)
    ),
    tag = "providers"
)]
pub async fn provider_availability_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    query: Result<Query<AvailabilityQuery>, QueryRejection>,
) -> ApiResult<Json<AvailabilityDto>> {
    let Query(query) = query?;
    let date = query
        .date
        .ok_or_else(|| DomainError::Validation("missing required fields: date".to_string()))?;

    let availability = state.providers.availability(&id, &date).await?;
    Ok(Json(availability.into()))
}
