//! Middleware components for the HTTP API

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::debug;

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// CORS configuration for the API
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Echoes the caller's `X-Request-ID`, or assigns a fresh one.
pub async fn add_request_id(request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(&REQUEST_ID_HEADER)
        .cloned()
        .or_else(|| HeaderValue::from_str(&uuid::Uuid::new_v4().to_string()).ok());

    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let mut response = next.run(request).await;

    if let Some(request_id) = request_id {
        debug!(
            request_id = request_id.to_str().unwrap_or_default(),
            %method,
            path = %path,
            status = response.status().as_u16(),
            "request completed"
        );
        response.headers_mut().insert(REQUEST_ID_HEADER, request_id);
    }
    response
}
