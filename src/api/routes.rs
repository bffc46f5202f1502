//! API Routes
//!
//! Configures the Axum router with all diagnostic and catalog endpoints.

use axum::{
    routing::{delete, get},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    health_handler, invalidate_all_handler, invalidate_handler, lookup_handler, photo_handler,
    photos_handler, status_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /health` - Health check endpoint
/// - `GET /cache/status` - Known-key cache report
/// - `DELETE /cache` - Invalidate every cache key
/// - `DELETE /cache/:key` - Invalidate one cache key
/// - `GET /lookups/:resource` - Lookup table, read through the cache
/// - `GET /photos` - Listing page, read through the cache
/// - `GET /photos/:id` - Single photo, read through the cache
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router with all endpoints
    Router::new()
        .route("/health", get(health_handler))
        .route("/cache/status", get(status_handler))
        .route("/cache", delete(invalidate_all_handler))
        .route("/cache/:key", delete(invalidate_handler))
        .route("/lookups/:resource", get(lookup_handler))
        .route("/photos", get(photos_handler))
        .route("/photos/:id", get(photo_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
