//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the TTL, eviction and namespace guarantees under
//! virtual time.

use proptest::prelude::*;
use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{codec, CacheEntry, TtlCache, DEFAULT_PREFIX};
use crate::clock::ManualClock;
use crate::storage::{KvStore, MemoryKvStore};

// == Test Configuration ==
const T0: u64 = 1_700_000_000_000;

fn block_on<F: Future>(fut: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime")
        .block_on(fut)
}

fn setup() -> (TtlCache, Arc<MemoryKvStore>, Arc<ManualClock>) {
    let storage = Arc::new(MemoryKvStore::new());
    let clock = Arc::new(ManualClock::new(T0));
    let cache = TtlCache::with_clock(storage.clone(), clock.clone(), DEFAULT_PREFIX);
    (cache, storage, clock)
}

// == Strategies ==
/// Generates cache keys the way callers build them
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,40}"
}

/// Generates lookup-list payloads
fn payload_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-zA-Z0-9 \\-']{0,24}", 0..12)
}

/// Generates keys outside the cache namespace
fn foreign_key_strategy() -> impl Strategy<Value = String> {
    "[a-z]{1,12}_[a-z]{1,12}".prop_filter("must not carry the cache prefix", |k| {
        !k.starts_with(DEFAULT_PREFIX)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // A fresh entry is served at every instant up to and including its expiry,
    // and is gone one millisecond later.
    #[test]
    fn prop_ttl_correctness(
        key in key_strategy(),
        value in payload_strategy(),
        ttl_ms in 1u64..=30 * 24 * 3_600_000,
        fraction in 0.0f64..=1.0,
    ) {
        block_on(async {
            let (cache, _, clock) = setup();
            cache.put(&key, &value, Duration::from_millis(ttl_ms)).await.unwrap();

            prop_assert_eq!(cache.get::<Vec<String>>(&key).await, Some(value.clone()));

            clock.set(T0 + (ttl_ms as f64 * fraction) as u64);
            prop_assert_eq!(cache.get::<Vec<String>>(&key).await, Some(value.clone()));

            clock.set(T0 + ttl_ms + 1);
            prop_assert_eq!(cache.get::<Vec<String>>(&key).await, None);
            Ok(())
        })?;
    }

    // An expired read deletes the persisted entry.
    #[test]
    fn prop_lazy_eviction(
        key in key_strategy(),
        value in payload_strategy(),
        ttl_ms in 1u64..100_000,
        overshoot in 1u64..1_000_000,
    ) {
        block_on(async {
            let (cache, storage, clock) = setup();
            cache.put(&key, &value, Duration::from_millis(ttl_ms)).await.unwrap();

            clock.advance(Duration::from_millis(ttl_ms + overshoot));
            prop_assert!(cache.get::<Vec<String>>(&key).await.is_none());

            let raw = storage.get_item(&format!("{}{}", DEFAULT_PREFIX, key)).await.unwrap();
            prop_assert!(raw.is_none(), "Expired entry should have been deleted");
            Ok(())
        })?;
    }

    // Encoding then decoding reproduces the entry.
    #[test]
    fn prop_codec_round_trip(
        data in prop::collection::vec((any::<u32>(), "[ -~]{0,32}"), 0..16),
        timestamp in 0u64..=T0 * 2,
        ttl_ms in 0u64..=1_000_000_000,
    ) {
        let entry = CacheEntry::new(data, timestamp, Duration::from_millis(ttl_ms));
        let decoded: CacheEntry<Vec<(u32, String)>> =
            codec::decode(&codec::encode(&entry).unwrap()).unwrap();
        prop_assert_eq!(decoded, entry);
    }

    // Arbitrary strings under a cache key never surface as data.
    #[test]
    fn prop_garbage_reads_as_miss(key in key_strategy(), junk in "\\PC{0,64}") {
        block_on(async {
            let (cache, storage, _) = setup();
            storage.set_item(&format!("{}{}", DEFAULT_PREFIX, key), &junk).await.unwrap();

            prop_assert!(cache.get::<Vec<String>>(&key).await.is_none());
            Ok(())
        })?;
    }

    // Clearing the cache removes exactly the namespaced keys.
    #[test]
    fn prop_namespace_isolation(
        cache_keys in prop::collection::hash_set(key_strategy(), 0..20),
        foreign in prop::collection::hash_map(foreign_key_strategy(), "[a-z0-9]{1,16}", 0..20),
    ) {
        block_on(async {
            let (cache, storage, _) = setup();
            for (k, v) in &foreign {
                storage.set_item(k, v).await.unwrap();
            }
            for k in &cache_keys {
                cache.put(k, &vec![k.clone()], Duration::from_secs(60)).await.unwrap();
            }

            let removed = cache.invalidate_all().await;
            prop_assert_eq!(removed, cache_keys.len());

            let remaining: HashSet<String> =
                storage.get_all_keys().await.unwrap().into_iter().collect();
            let expected: HashSet<String> = foreign.keys().cloned().collect();
            prop_assert_eq!(remaining, expected);

            for (k, v) in &foreign {
                let stored = storage.get_item(k).await.unwrap();
                prop_assert_eq!(stored.as_ref(), Some(v));
            }
            Ok(())
        })?;
    }

    // Age never decreases while time moves forward and the key is not rewritten.
    #[test]
    fn prop_age_monotonic(
        key in key_strategy(),
        steps in prop::collection::vec(0u64..120_000, 1..20),
    ) {
        block_on(async {
            let (cache, _, clock) = setup();
            cache.put(&key, &vec!["x"], Duration::from_secs(60)).await.unwrap();

            let mut elapsed = 0u64;
            let mut last = cache.age_seconds(&key).await.unwrap();
            prop_assert_eq!(last, 0);

            for step in steps {
                clock.advance(Duration::from_millis(step));
                elapsed += step;

                let age = cache.age_seconds(&key).await.unwrap();
                prop_assert!(age >= last, "age went from {} to {}", last, age);
                prop_assert_eq!(age, elapsed / 1000);
                last = age;
            }
            Ok(())
        })?;
    }
}
