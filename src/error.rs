//! Error types for the photo cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Storage Error ==
/// Failure raised by a key-value persistence adapter.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Underlying file or device failure
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The backing document could not be read or written as JSON
    #[error("Storage document is malformed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Adapter refused the operation
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

// == Cache Error ==
/// Failure converting a cache entry to or from its persisted form.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Payload cannot be represented as JSON
    #[error("Cannot encode cache entry: {0}")]
    Encode(String),

    /// Persisted string is not a well-formed cache entry
    #[error("Cannot decode cache entry: {0}")]
    Decode(String),
}

// == Remote Error ==
/// Failure reported by the remote catalog service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// Transport-level failure reaching the service
    #[error("Network error: {0}")]
    Network(String),

    /// Requested record does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Service answered with an error
    #[error("Server error: {0}")]
    Server(String),
}

// == Catalog Error ==
/// Failure of a read-through lookup: no cached data and no remote data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Remote catalog unavailable: {0}")]
    Remote(#[from] RemoteError),
}

// == API Error ==
/// Errors surfaced by the diagnostic HTTP API.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Unknown resource or record
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Remote catalog failed and nothing was cached
    #[error("Upstream failure: {0}")]
    Upstream(String),
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Remote(RemoteError::NotFound(msg)) => ApiError::NotFound(msg),
            other => ApiError::Upstream(other.to_string()),
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
        };

        let body = Json(ErrorResponse::new(message));

        (status, body).into_response()
    }
}

// == Result Type Aliases ==
/// Result of a persistence adapter call.
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Result of an HTTP handler.
pub type ApiResult<T> = std::result::Result<T, ApiError>;
