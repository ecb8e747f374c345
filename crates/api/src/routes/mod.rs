//! HTTP Routes

use axum::Router;
use axum::middleware::from_fn;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::handlers::{self, bookings, providers, users};
use crate::middleware::{add_request_id, cors_layer};
use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/api-docs/openapi.json", get(handlers::openapi_handler))
        .merge(booking_routes())
        .merge(provider_routes())
        .merge(user_routes())
        .layer(from_fn(add_request_id))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .with_state(state)
}

fn booking_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/bookings",
            post(bookings::create_booking_handler).get(bookings::list_bookings_handler),
        )
        .route("/bookings/book", post(bookings::create_booking_handler))
        .route(
            "/bookings/{id}",
            get(bookings::get_booking_handler)
                .put(bookings::update_booking_status_handler)
                .delete(bookings::delete_booking_handler),
        )
        .route(
            "/bookings/provider/{provider_id}",
            get(bookings::list_provider_bookings_handler),
        )
        .route(
            "/bookings/client/{email}",
            get(bookings::list_client_bookings_handler),
        )
}

fn provider_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/providers",
            post(providers::create_provider_handler).get(providers::list_providers_handler),
        )
        .route(
            "/providers/{id}",
            get(providers::get_provider_handler)
                .put(providers::update_provider_handler)
                .delete(providers::delete_provider_handler),
        )
        .route(
            "/providers/{id}/availability",
            get(providers::provider_availability_handler),
        )
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(users::create_user_handler))
        .route("/users/{id}", get(users::get_user_handler))
}
