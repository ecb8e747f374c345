//! User Directory endpoints

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use slotbook_core::NewUser;

use crate::dtos::{CreateUserDto, ErrorBody, UserDto};
use crate::error::ApiResult;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/users",
    request_body = CreateUserDto,
    responses(
        (status = 201, description = "User registered", body = UserDto),
        (status = 400, description = "Missing or malformed fields", body = ErrorBody),
        (status = 409, description = "Email already registered", body = ErrorBody)
    ),
    tag = "users"
)]
pub async fn create_user_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserDto>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<UserDto>)> {
    let Json(payload) = payload?;
    let account = state.users.register_user(NewUser::try_from(payload)?).await?;

    Ok((StatusCode::CREATED, Json(account.into())))
}

#[utoipa::path(
    get,
    path = "/users/{id}",
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User details", body = UserDto),
        (status = 404, description = "User not found", body = ErrorBody)
    ),
    tag = "users"
)]
pub async fn get_user_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<UserDto>> {
    let account = state.users.get_user(&id).await?;
    Ok(Json(account.into()))
}
