//! Error types for qualeval

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Common result type for qualeval operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy: configuration, client input, storage, lookup, internal.
#[derive(Error, Debug)]
pub enum Error {
    /// Storage credentials missing or collaborator misconfigured
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The upsert/sequence call failed or returned an error payload
    #[error("Storage error: {0}")]
    Storage(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sqlx::Error> for Error {
    fn from(e: sqlx::Error) -> Self {
        Error::Storage(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Storage(e.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Error::Config(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, format!("Storage not initialized: {}", msg))
            }
            Error::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            Error::Storage(detail) => {
                // Full detail stays server-side; the client gets a generic message
                tracing::error!("Storage operation failed: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An error occurred while saving the evaluation".to_string(),
                )
            }
            Error::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Error::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
