//! Response DTOs for the diagnostic API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::CacheStatus;

/// Response body for single-key invalidation (DELETE /cache/:key)
#[derive(Debug, Clone, Serialize)]
pub struct InvalidateResponse {
    /// Success message
    pub message: String,
    /// The key that was invalidated
    pub key: String,
}

impl InvalidateResponse {
    /// Creates a new InvalidateResponse
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' invalidated", key),
            key,
        }
    }
}

/// Response body for bulk invalidation (DELETE /cache)
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    /// Success message
    pub message: String,
    /// Number of cache keys removed
    pub removed: usize,
}

impl ClearResponse {
    /// Creates a new ClearResponse
    pub fn new(removed: usize) -> Self {
        Self {
            message: format!("Cleared {} cache entries", removed),
            removed,
        }
    }
}

/// Response body for the status endpoint (GET /cache/status)
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    #[serde(flatten)]
    pub status: CacheStatus,
    /// Fraction of known keys populated
    pub coverage: f64,
    /// Report time in ISO 8601 format
    pub generated_at: String,
}

impl StatusResponse {
    /// Creates a new StatusResponse from a collected report
    pub fn new(status: CacheStatus) -> Self {
        Self {
            coverage: status.coverage(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            status,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
