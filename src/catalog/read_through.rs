//! Read-Through Catalog
//!
//! Serves catalog data from the TTL cache when possible and from the remote
//! catalog otherwise, populating the cache on every successful remote fetch.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use super::{Coalescer, LookupKind, LookupRecord, Photo, PhotoPage, PhotoQuery, RemoteCatalog};
use crate::cache::TtlCache;
use crate::error::{CatalogError, RemoteError};

type LookupResult = Result<Fetched<Vec<LookupRecord>>, CatalogError>;

// == Source ==
/// Where a read-through result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Served from a fresh cache entry
    Cache,
    /// Fetched from the remote catalog and written to the cache
    Remote,
}

// == Fetched ==
/// Data returned by the read-through catalog, tagged with its source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fetched<T> {
    /// The requested data
    pub data: T,
    /// Where `data` came from
    pub source: Source,
}

impl<T> Fetched<T> {
    /// True if the data was served without a remote call.
    pub fn is_cached(&self) -> bool {
        self.source == Source::Cache
    }

    /// Discards the source tag and returns the data.
    pub fn into_inner(self) -> T {
        self.data
    }
}

// == Cached Catalog ==
/// Read-through cache over a `RemoteCatalog`.
#[derive(Clone)]
pub struct CachedCatalog {
    cache: TtlCache,
    remote: Arc<dyn RemoteCatalog>,
    /// Present when concurrent misses on one key should share a fetch
    coalescer: Option<Arc<Coalescer>>,
}

impl CachedCatalog {
    /// Creates a read-through catalog. Concurrent misses each fetch remotely.
    pub fn new(cache: TtlCache, remote: Arc<dyn RemoteCatalog>) -> Self {
        Self {
            cache,
            remote,
            coalescer: None,
        }
    }

    /// Serializes remote fetches per key, so simultaneous misses on one key
    /// make a single remote call.
    pub fn with_single_flight(mut self) -> Self {
        self.coalescer = Some(Arc::new(Coalescer::new()));
        self
    }

    /// The cache this catalog reads through.
    pub fn cache(&self) -> &TtlCache {
        &self.cache
    }

    async fn read_through<T, F, Fut>(
        &self,
        key: &str,
        ttl: Duration,
        force_fresh: bool,
        fetch: F,
    ) -> Result<Fetched<T>, CatalogError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, RemoteError>>,
    {
        if !force_fresh {
            if let Some(data) = self.cache.get(key).await {
                return Ok(Fetched {
                    data,
                    source: Source::Cache,
                });
            }
        }

        let flight = match &self.coalescer {
            Some(coalescer) => Some(coalescer.acquire(key).await),
            None => None,
        };

        // Another caller may have filled the key while this one waited.
        if flight.is_some() && !force_fresh {
            if let Some(data) = self.cache.get(key).await {
                debug!("'{}' filled by a concurrent fetch", key);
                return Ok(Fetched {
                    data,
                    source: Source::Cache,
                });
            }
        }

        let data = fetch().await.map_err(|err| {
            warn!("Remote fetch for '{}' failed: {}", key, err);
            err
        })?;

        if let Err(err) = self.cache.put(key, &data, ttl).await {
            warn!("Not caching '{}': {}", key, err);
        }

        Ok(Fetched {
            data,
            source: Source::Remote,
        })
    }

    // == Lookups ==
    /// Fetches one lookup table through the cache.
    pub async fn lookup(&self, kind: LookupKind, force_fresh: bool) -> LookupResult {
        self.read_through(kind.cache_key(), kind.ttl(), force_fresh, || {
            self.remote.fetch_lookup(kind)
        })
        .await
    }

    pub async fn categories(&self, force_fresh: bool) -> LookupResult {
        self.lookup(LookupKind::Categories, force_fresh).await
    }

    pub async fn photographers(&self, force_fresh: bool) -> LookupResult {
        self.lookup(LookupKind::Photographers, force_fresh).await
    }

    pub async fn locations(&self, force_fresh: bool) -> LookupResult {
        self.lookup(LookupKind::Locations, force_fresh).await
    }

    pub async fn organisations(&self, force_fresh: bool) -> LookupResult {
        self.lookup(LookupKind::Organisations, force_fresh).await
    }

    pub async fn gauges(&self, force_fresh: bool) -> LookupResult {
        self.lookup(LookupKind::Gauges, force_fresh).await
    }

    pub async fn collections(&self, force_fresh: bool) -> LookupResult {
        self.lookup(LookupKind::Collections, force_fresh).await
    }

    pub async fn countries(&self, force_fresh: bool) -> LookupResult {
        self.lookup(LookupKind::Countries, force_fresh).await
    }

    pub async fn routes(&self, force_fresh: bool) -> LookupResult {
        self.lookup(LookupKind::Routes, force_fresh).await
    }

    pub async fn corporate_bodies(&self, force_fresh: bool) -> LookupResult {
        self.lookup(LookupKind::CorporateBodies, force_fresh).await
    }

    pub async fn facilities(&self, force_fresh: bool) -> LookupResult {
        self.lookup(LookupKind::Facilities, force_fresh).await
    }

    pub async fn builders(&self, force_fresh: bool) -> LookupResult {
        self.lookup(LookupKind::Builders, force_fresh).await
    }

    // == Photos ==
    /// Fetches one listing page through the cache.
    pub async fn photos(
        &self,
        query: &PhotoQuery,
        force_fresh: bool,
    ) -> Result<Fetched<PhotoPage>, CatalogError> {
        self.read_through(&query.cache_key(), PhotoQuery::ttl(), force_fresh, || {
            self.remote.fetch_photos(query)
        })
        .await
    }

    /// Fetches a single photo through the cache.
    pub async fn photo(&self, id: u64, force_fresh: bool) -> Result<Fetched<Photo>, CatalogError> {
        self.read_through(&Photo::cache_key(id), Photo::ttl(), force_fresh, || {
            self.remote.fetch_photo(id)
        })
        .await
    }
}
