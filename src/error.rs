//! Error types for the storage server
//!
//! Maps failed storage operations to HTTP responses using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Storage Error Enum ==
/// Request-level failure reported by the HTTP layer.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Key not present
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Key already present (put_if_absent)
    #[error("Key already exists: {0}")]
    AlreadyExists(String),

    /// Entry can never fit into the configured capacity
    #[error("Entry of {size} bytes exceeds capacity of {capacity} bytes")]
    TooLarge { size: usize, capacity: usize },

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for StorageError {
    fn into_response(self) -> Response {
        let status = match &self {
            StorageError::NotFound(_) => StatusCode::NOT_FOUND,
            StorageError::AlreadyExists(_) => StatusCode::CONFLICT,
            StorageError::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            StorageError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        };

        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for request handlers.
pub type Result<T> = std::result::Result<T, StorageError>;
