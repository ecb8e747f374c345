//! API Layer - HTTP Server
//!
//! Axum-based HTTP API for the provider directory and booking ledger

pub mod api_docs;
pub mod dtos;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

// Re-export main server components
pub use api_docs::ApiDoc;
pub use error::{ApiError, ApiResult};
pub use middleware::cors_layer;
pub use routes::create_router;
pub use state::AppState;
