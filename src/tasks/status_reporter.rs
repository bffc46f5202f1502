//! Cache Status Reporter
//!
//! Background task that periodically logs which known cache keys are populated.
//! It only inspects entries; expired entries stay in place until their next read.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::{CacheStatus, TtlCache};

/// Spawns a background task that logs a cache status summary every
/// `interval_secs` seconds.
///
/// # Arguments
/// * `cache` - Cache to inspect
/// * `keys` - Known cache keys to report on
/// * `interval_secs` - Interval in seconds between reports
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
///
/// # Example
/// ```ignore
/// let handle = spawn_status_reporter(cache.clone(), known_cache_keys(20), 60);
/// // Later, during shutdown:
/// handle.abort();
/// ```
pub fn spawn_status_reporter(
    cache: TtlCache,
    keys: Vec<String>,
    interval_secs: u64,
) -> JoinHandle<()> {
    let interval = Duration::from_secs(interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting cache status reporter with interval of {} seconds",
            interval_secs
        );

        loop {
            tokio::time::sleep(interval).await;

            let status = CacheStatus::collect(&cache, &keys).await;
            if status.populated > 0 {
                info!(
                    "Cache status: {}/{} keys populated, {} fresh, oldest={:?}, newest={:?}",
                    status.populated,
                    status.total_keys,
                    status.fresh,
                    status.oldest,
                    status.newest
                );
            } else {
                debug!("Cache status: no known keys populated");
            }
        }
    })
}
