//! API Module
//!
//! HTTP handlers and routing for cache diagnostics and the cached catalog.
//!
//! # Endpoints
//! - `GET /health` - Health check endpoint
//! - `GET /cache/status` - Known-key cache report
//! - `DELETE /cache` - Invalidate every cache key
//! - `DELETE /cache/:key` - Invalidate one cache key
//! - `GET /lookups/:resource` - Lookup table via the cache
//! - `GET /photos` - Listing page via the cache
//! - `GET /photos/:id` - Single photo via the cache

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
