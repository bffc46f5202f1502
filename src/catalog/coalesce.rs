//! Coalesce Module
//!
//! Per-key serialization of remote fetches, so concurrent misses on one key
//! result in a single remote call.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

// == Coalescer ==
/// Registry of per-key fetch locks.
///
/// Entries are pruned once no caller holds or waits on them.
#[derive(Debug, Default)]
pub struct Coalescer {
    /// Lock per cache key with a fetch in progress
    inflight: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl Coalescer {
    /// Creates an empty coalescer.
    pub fn new() -> Self {
        Self::default()
    }

    // == Acquire ==
    /// Waits until no other caller holds `key`, then holds it until the guard drops.
    pub async fn acquire(&self, key: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut inflight = self.inflight.lock().await;
            // Locks referenced only by the map are idle.
            inflight.retain(|_, lock| Arc::strong_count(lock) > 1);
            Arc::clone(
                inflight
                    .entry(key.to_string())
                    .or_insert_with(|| Arc::new(Mutex::new(()))),
            )
        };
        lock.lock_owned().await
    }

    /// Number of keys currently tracked.
    pub async fn tracked(&self) -> usize {
        self.inflight.lock().await.len()
    }
}
