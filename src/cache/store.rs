//! Cache Store Module
//!
//! TTL cache layered over a key-value storage adapter. Faults in the storage
//! layer are logged and degrade to a miss or a dropped write; only payloads
//! that cannot be encoded are reported to the caller.

use std::sync::Arc;
use std::time::Duration;

use serde::{de::DeserializeOwned, de::IgnoredAny, Serialize};
use tracing::{debug, warn};

use crate::cache::{codec, CacheEntry, DEFAULT_PREFIX};
use crate::clock::{Clock, SystemClock};
use crate::error::CacheError;
use crate::storage::KvStore;

// == Entry Info ==
/// Metadata of a persisted entry, read without touching its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryInfo {
    /// Write time (Unix milliseconds)
    pub timestamp: u64,
    /// Expiry time (Unix milliseconds)
    pub expiry: u64,
    /// Whole seconds since write
    pub age_seconds: u64,
    /// True once the entry may no longer be served
    pub is_stale: bool,
}

// == TTL Cache ==
/// Namespaced TTL cache over a shared key-value store.
///
/// Holds no state of its own; cloning shares the underlying storage.
#[derive(Clone)]
pub struct TtlCache {
    /// Persistence adapter
    storage: Arc<dyn KvStore>,
    /// Time source for timestamps and expiry checks
    clock: Arc<dyn Clock>,
    /// Namespace prepended to every key
    prefix: String,
}

impl std::fmt::Debug for TtlCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtlCache")
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}

impl TtlCache {
    // == Constructors ==
    /// Creates a cache using the system clock and the default namespace.
    pub fn new(storage: Arc<dyn KvStore>) -> Self {
        Self::with_clock(storage, Arc::new(SystemClock), DEFAULT_PREFIX)
    }

    /// Creates a cache with an explicit clock and namespace.
    pub fn with_clock(
        storage: Arc<dyn KvStore>,
        clock: Arc<dyn Clock>,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            storage,
            clock,
            prefix: prefix.into(),
        }
    }

    /// Returns the namespace prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns the current time according to the cache clock.
    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    fn storage_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    // == Put ==
    /// Stores `data` under `key` for `ttl`, replacing any previous entry.
    ///
    /// A zero `ttl` removes the key instead, since such an entry could never
    /// be served. Storage failures are logged and swallowed.
    pub async fn put<T: Serialize>(
        &self,
        key: &str,
        data: &T,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        if ttl.is_zero() {
            debug!("Zero TTL for '{}', removing instead of writing", key);
            self.invalidate(key).await;
            return Ok(());
        }

        let raw = codec::encode(&CacheEntry::new(data, self.clock.now_ms(), ttl))?;

        match self.storage.set_item(&self.storage_key(key), &raw).await {
            Ok(()) => debug!("Cached '{}' for {}ms", key, ttl.as_millis()),
            Err(err) => warn!("Failed to write cache entry '{}': {}", key, err),
        }
        Ok(())
    }

    // == Get ==
    /// Returns the cached payload if present and not expired.
    ///
    /// Expired and undecodable entries are deleted as a side effect. Every
    /// failure reads as a miss.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let storage_key = self.storage_key(key);

        let raw = match self.storage.get_item(&storage_key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("Cache miss for '{}'", key);
                return None;
            }
            Err(err) => {
                warn!("Failed to read cache entry '{}': {}", key, err);
                return None;
            }
        };

        let entry: CacheEntry<T> = match codec::decode(&raw) {
            Ok(entry) => entry,
            Err(err) => {
                warn!("Discarding corrupt cache entry '{}': {}", key, err);
                self.remove_quietly(&storage_key).await;
                return None;
            }
        };

        if !entry.is_valid_at(self.clock.now_ms()) {
            debug!("Cache entry '{}' expired, evicting", key);
            self.remove_quietly(&storage_key).await;
            return None;
        }

        debug!("Cache hit for '{}'", key);
        Some(entry.data)
    }

    async fn remove_quietly(&self, storage_key: &str) {
        if let Err(err) = self.storage.remove_item(storage_key).await {
            debug!("Lazy eviction of '{}' failed: {}", storage_key, err);
        }
    }

    // == Peek ==
    /// Reads entry metadata without evicting anything.
    ///
    /// Returns `None` if the key is absent, unreadable or corrupt.
    pub async fn peek(&self, key: &str) -> Option<EntryInfo> {
        let raw = match self.storage.get_item(&self.storage_key(key)).await {
            Ok(raw) => raw?,
            Err(err) => {
                warn!("Failed to read cache entry '{}': {}", key, err);
                return None;
            }
        };

        let entry: CacheEntry<IgnoredAny> = codec::decode(&raw).ok()?;
        let now = self.clock.now_ms();
        Some(EntryInfo {
            timestamp: entry.timestamp,
            expiry: entry.expiry,
            age_seconds: entry.age_seconds_at(now),
            is_stale: !entry.is_valid_at(now),
        })
    }

    // == Age ==
    /// Seconds since `key` was written, whether or not it has expired.
    pub async fn age_seconds(&self, key: &str) -> Option<u64> {
        self.peek(key).await.map(|info| info.age_seconds)
    }

    // == Invalidate ==
    /// Removes `key` from the cache. Absent keys are ignored.
    pub async fn invalidate(&self, key: &str) {
        if let Err(err) = self.storage.remove_item(&self.storage_key(key)).await {
            warn!("Failed to invalidate cache entry '{}': {}", key, err);
        }
    }

    // == Invalidate All ==
    /// Removes every key in this cache's namespace in one batch.
    ///
    /// Keys outside the namespace are never touched. Returns the number of
    /// keys targeted, or zero if the keys could not be listed.
    pub async fn invalidate_all(&self) -> usize {
        let keys = match self.storage.get_all_keys().await {
            Ok(keys) => keys,
            Err(err) => {
                warn!("Failed to list keys for cache clear: {}", err);
                return 0;
            }
        };

        let ours: Vec<String> = keys
            .into_iter()
            .filter(|k| k.starts_with(&self.prefix))
            .collect();

        if ours.is_empty() {
            return 0;
        }

        match self.storage.multi_remove(&ours).await {
            Ok(()) => debug!("Cleared {} cache entries", ours.len()),
            Err(err) => warn!(
                "Cache clear of {} entries did not complete: {}",
                ours.len(),
                err
            ),
        }
        ours.len()
    }
}
