//! Request and Response models for the diagnostic API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP query strings and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{FreshParams, PhotosParams, MAX_PAGE_LIMIT};
pub use responses::{
    ClearResponse, ErrorResponse, HealthResponse, InvalidateResponse, StatusResponse,
};
