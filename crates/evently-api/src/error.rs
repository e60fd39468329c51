//! HTTP error mapping and the JSON error envelope.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use tracing::error;

use evently_core::models::iso8601;

const INTERNAL_MESSAGE: &str = "Internal server error";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),
    /// One entry per violated rule; the first one becomes `message`.
    #[error("{}", .0.join("; "))]
    BadRequest(Vec<String>),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        ApiError::BadRequest(vec![msg.into()])
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<evently_core::Error> for ApiError {
    fn from(err: evently_core::Error) -> Self {
        match err {
            evently_core::Error::NotFound(msg) => ApiError::NotFound(msg),
            evently_core::Error::Validation(errors) => ApiError::BadRequest(errors),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

/// Body of every non-2xx response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    pub success: bool,
    pub status_code: u16,
    pub message: String,
    pub errors: Vec<String>,
    pub timestamp: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let errors = match self {
            ApiError::NotFound(msg) => vec![msg],
            ApiError::BadRequest(errors) => errors,
            ApiError::Internal(detail) => {
                error!(
                    subsystem = "api",
                    status = status.as_u16(),
                    error = %detail,
                    "Request failed"
                );
                vec![INTERNAL_MESSAGE.to_string()]
            }
        };

        let body = ErrorEnvelope {
            success: false,
            status_code: status.as_u16(),
            message: errors
                .first()
                .cloned()
                .unwrap_or_else(|| "An error occurred".to_string()),
            errors,
            timestamp: iso8601::format(&Utc::now()),
        };

        (status, Json(body)).into_response()
    }
}
