//! Error types for evently.

use thiserror::Error;

/// Result type alias using evently's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for evently operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Resource not found
    #[error("{0}")]
    NotFound(String),

    /// One or more fields failed validation
    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// NotFound for an event id, worded the way clients see it.
    pub fn event_not_found(id: impl std::fmt::Display) -> Self {
        Error::NotFound(format!("Event with ID {} not found", id))
    }
}
