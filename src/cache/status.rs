//! Cache Status Module
//!
//! Read-only report on which known cache keys are populated, and how old they are.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cache::TtlCache;

// == Key Status ==
/// Status of one known cache key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyStatus {
    /// Logical cache key (without namespace)
    pub key: String,
    /// An entry is persisted under the key, fresh or stale
    pub exists: bool,
    /// The entry is past its expiry and will be evicted on next read
    pub is_stale: bool,
    /// Whole seconds since the entry was written
    pub age_seconds: Option<u64>,
    /// Write time in RFC 3339
    pub last_updated: Option<String>,
    #[serde(skip)]
    timestamp: Option<u64>,
}

impl KeyStatus {
    fn absent(key: &str) -> Self {
        Self {
            key: key.to_string(),
            exists: false,
            is_stale: false,
            age_seconds: None,
            last_updated: None,
            timestamp: None,
        }
    }

    /// True if the entry exists and may still be served.
    pub fn is_fresh(&self) -> bool {
        self.exists && !self.is_stale
    }
}

// == Cache Status ==
/// Aggregate status across a fixed set of cache keys.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStatus {
    /// Per-key detail, in the order the keys were given
    pub entries: Vec<KeyStatus>,
    /// Number of keys inspected
    pub total_keys: usize,
    /// Keys with an entry present, fresh or stale
    pub populated: usize,
    /// Keys with a servable entry
    pub fresh: usize,
    /// Key with the earliest write time
    pub oldest: Option<String>,
    /// Key with the latest write time
    pub newest: Option<String>,
}

impl CacheStatus {
    // == Collect ==
    /// Inspects every key in `keys` without evicting anything.
    pub async fn collect<I, S>(cache: &TtlCache, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut entries = Vec::new();

        for key in keys {
            let key = key.as_ref();
            let status = match cache.peek(key).await {
                Some(info) => KeyStatus {
                    key: key.to_string(),
                    exists: true,
                    is_stale: info.is_stale,
                    age_seconds: Some(info.age_seconds),
                    last_updated: format_timestamp(info.timestamp),
                    timestamp: Some(info.timestamp),
                },
                None => KeyStatus::absent(key),
            };
            entries.push(status);
        }

        Self::from_entries(entries)
    }

    fn from_entries(entries: Vec<KeyStatus>) -> Self {
        let populated = entries.iter().filter(|e| e.exists).count();
        let fresh = entries.iter().filter(|e| e.is_fresh()).count();

        let written = || entries.iter().filter_map(|e| e.timestamp.map(|ts| (ts, e)));
        let oldest = written().min_by_key(|(ts, _)| *ts).map(|(_, e)| e.key.clone());
        let newest = written().max_by_key(|(ts, _)| *ts).map(|(_, e)| e.key.clone());

        Self {
            total_keys: entries.len(),
            populated,
            fresh,
            oldest,
            newest,
            entries,
        }
    }

    // == Coverage ==
    /// Fraction of known keys that are populated.
    ///
    /// Returns 0.0 if no keys were inspected.
    pub fn coverage(&self) -> f64 {
        if self.total_keys == 0 {
            0.0
        } else {
            self.populated as f64 / self.total_keys as f64
        }
    }

    /// Looks up the status of one key.
    pub fn get(&self, key: &str) -> Option<&KeyStatus> {
        self.entries.iter().find(|e| e.key == key)
    }
}

fn format_timestamp(ms: u64) -> Option<String> {
    let ms = i64::try_from(ms).ok()?;
    DateTime::<Utc>::from_timestamp_millis(ms).map(|dt| dt.to_rfc3339())
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::DEFAULT_PREFIX;
    use crate::clock::ManualClock;
    use crate::storage::{KvStore, MemoryKvStore};
    use std::sync::Arc;
    use std::time::Duration;

    // 2024-01-01T00:00:00Z
    const T0: u64 = 1_704_067_200_000;

    fn setup() -> (TtlCache, Arc<MemoryKvStore>, Arc<ManualClock>) {
        let storage = Arc::new(MemoryKvStore::new());
        let clock = Arc::new(ManualClock::new(T0));
        let cache = TtlCache::with_clock(storage.clone(), clock.clone(), DEFAULT_PREFIX);
        (cache, storage, clock)
    }

    #[tokio::test]
    async fn test_status_empty_cache() {
        let (cache, _, _) = setup();
        let status = CacheStatus::collect(&cache, &["categories", "countries"]).await;

        assert_eq!(status.total_keys, 2);
        assert_eq!(status.populated, 0);
        assert_eq!(status.fresh, 0);
        assert!(status.oldest.is_none());
        assert!(status.newest.is_none());
        assert_eq!(status.coverage(), 0.0);
    }

    #[tokio::test]
    async fn test_status_counts_and_extremes() {
        let (cache, _, clock) = setup();

        cache.put("categories", &vec!["steam"], Duration::from_secs(10)).await.unwrap();
        clock.advance(Duration::from_secs(30));
        cache.put("countries", &vec!["uk"], Duration::from_secs(3600)).await.unwrap();

        let status =
            CacheStatus::collect(&cache, &["categories", "countries", "builders"]).await;

        assert_eq!(status.populated, 2);
        assert_eq!(status.fresh, 1);
        assert_eq!(status.oldest.as_deref(), Some("categories"));
        assert_eq!(status.newest.as_deref(), Some("countries"));

        let categories = status.get("categories").unwrap();
        assert!(categories.exists);
        assert!(categories.is_stale);
        assert_eq!(categories.age_seconds, Some(30));
        assert_eq!(
            categories.last_updated.as_deref(),
            Some("2024-01-01T00:00:00+00:00")
        );

        let builders = status.get("builders").unwrap();
        assert!(!builders.exists);
        assert!(builders.age_seconds.is_none());
        assert!((status.coverage() - 2.0 / 3.0).abs() < 0.001);
    }

    #[tokio::test]
    async fn test_status_does_not_evict_stale_entries() {
        let (cache, storage, clock) = setup();

        cache.put("gauges", &vec!["narrow"], Duration::from_secs(1)).await.unwrap();
        clock.advance(Duration::from_secs(10));

        let status = CacheStatus::collect(&cache, &["gauges"]).await;
        assert!(status.get("gauges").unwrap().is_stale);
        assert!(storage.get_item("filter_cache_gauges").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_status_serializes_without_internal_fields() {
        let (cache, _, _) = setup();
        cache.put("routes", &vec!["ecml"], Duration::from_secs(60)).await.unwrap();

        let status = CacheStatus::collect(&cache, &["routes"]).await;
        let json = serde_json::to_value(&status).unwrap();

        assert_eq!(json["populated"], 1);
        assert_eq!(json["entries"][0]["key"], "routes");
        assert!(json["entries"][0].get("timestamp").is_none());
    }
}
