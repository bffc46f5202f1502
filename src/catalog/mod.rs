//! Catalog Module
//!
//! Photo catalog records, the remote catalog contract, and the read-through
//! cache in front of it.

mod coalesce;
mod models;
mod read_through;
mod sample;

use async_trait::async_trait;

use crate::error::RemoteError;

pub use coalesce::Coalescer;
pub use models::{known_cache_keys, LookupKind, LookupRecord, Photo, PhotoPage, PhotoQuery};
pub use read_through::{CachedCatalog, Fetched, Source};
pub use sample::SampleCatalog;

/// Authoritative source of catalog data.
#[async_trait]
pub trait RemoteCatalog: Send + Sync {
    /// Returns every record of one lookup table.
    async fn fetch_lookup(&self, kind: LookupKind) -> Result<Vec<LookupRecord>, RemoteError>;

    /// Returns one page of photos matching `query`.
    async fn fetch_photos(&self, query: &PhotoQuery) -> Result<PhotoPage, RemoteError>;

    /// Returns a single photo.
    async fn fetch_photo(&self, id: u64) -> Result<Photo, RemoteError>;
}
