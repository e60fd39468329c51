//! HTTP handlers for evently-api.

pub mod events;

use axum::http::{Method, Uri};
use axum::response::IntoResponse;
use axum::Json;

use crate::error::ApiError;

/// `GET /health`
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Unmatched routes answer in the regular error envelope.
pub async fn route_not_found(method: Method, uri: Uri) -> ApiError {
    ApiError::NotFound(format!("Cannot {} {}", method, uri.path()))
}
