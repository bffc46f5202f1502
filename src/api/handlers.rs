//! API Handlers
//!
//! HTTP request handlers for the cache diagnostics and catalog endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::cache::{CacheStatus, TtlCache};
use crate::catalog::{
    known_cache_keys, CachedCatalog, Fetched, LookupKind, LookupRecord, Photo, PhotoPage,
    RemoteCatalog, SampleCatalog,
};
use crate::clock::SystemClock;
use crate::config::Config;
use crate::error::{ApiError, ApiResult};
use crate::models::{
    ClearResponse, FreshParams, HealthResponse, InvalidateResponse, PhotosParams, StatusResponse,
};
use crate::storage::{FileKvStore, KvStore, MemoryKvStore};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Read-through catalog, which also owns the cache
    pub catalog: CachedCatalog,
    /// Keys reported on by the status endpoint
    pub known_keys: Arc<Vec<String>>,
    /// Listing page size when a request gives none
    pub page_size: u32,
}

impl AppState {
    /// Creates a new AppState around a read-through catalog.
    pub fn new(catalog: CachedCatalog, page_size: u32) -> Self {
        Self {
            catalog,
            known_keys: Arc::new(known_cache_keys(page_size)),
            page_size,
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Picks file or in-memory storage, seeds the demo catalog, and enables
    /// single-flight fetching.
    pub fn from_config(config: &Config) -> Self {
        let storage: Arc<dyn KvStore> = match &config.storage_path {
            Some(path) => Arc::new(FileKvStore::new(path)),
            None => Arc::new(MemoryKvStore::new()),
        };
        let cache = TtlCache::with_clock(
            storage,
            Arc::new(SystemClock),
            config.cache_prefix.clone(),
        );
        let remote: Arc<dyn RemoteCatalog> = Arc::new(SampleCatalog::new());
        let catalog = CachedCatalog::new(cache, remote).with_single_flight();
        Self::new(catalog, config.page_size)
    }

    /// The cache behind the catalog.
    pub fn cache(&self) -> &TtlCache {
        self.catalog.cache()
    }
}

/// Handler for GET /cache/status
///
/// Reports which known keys are cached, without evicting anything.
pub async fn status_handler(State(state): State<AppState>) -> Json<StatusResponse> {
    let status = CacheStatus::collect(state.cache(), state.known_keys.iter()).await;
    Json(StatusResponse::new(status))
}

/// Handler for DELETE /cache/:key
///
/// Invalidates one cache key. Absent keys succeed.
pub async fn invalidate_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ApiResult<Json<InvalidateResponse>> {
    if key.trim().is_empty() {
        return Err(ApiError::InvalidRequest("Key cannot be empty".to_string()));
    }

    state.cache().invalidate(&key).await;
    Ok(Json(InvalidateResponse::new(key)))
}

/// Handler for DELETE /cache
///
/// Invalidates every cache key; unrelated stored data is untouched.
pub async fn invalidate_all_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    let removed = state.cache().invalidate_all().await;
    Json(ClearResponse::new(removed))
}

/// Handler for GET /lookups/:resource
///
/// Serves a lookup table through the cache.
pub async fn lookup_handler(
    State(state): State<AppState>,
    Path(resource): Path<String>,
    Query(params): Query<FreshParams>,
) -> ApiResult<Json<Fetched<Vec<LookupRecord>>>> {
    let kind: LookupKind = resource.parse().map_err(ApiError::NotFound)?;
    let fetched = state.catalog.lookup(kind, params.force_fresh).await?;
    Ok(Json(fetched))
}

/// Handler for GET /photos
///
/// Serves a listing page through the cache.
pub async fn photos_handler(
    State(state): State<AppState>,
    Query(params): Query<PhotosParams>,
) -> ApiResult<Json<Fetched<PhotoPage>>> {
    if let Some(error_msg) = params.validate() {
        return Err(ApiError::InvalidRequest(error_msg));
    }

    let query = params.to_query(state.page_size);
    let fetched = state.catalog.photos(&query, params.force_fresh).await?;
    Ok(Json(fetched))
}

/// Handler for GET /photos/:id
///
/// Serves a single photo through the cache.
pub async fn photo_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Query(params): Query<FreshParams>,
) -> ApiResult<Json<Fetched<Photo>>> {
    let fetched = state.catalog.photo(id, params.force_fresh).await?;
    Ok(Json(fetched))
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
