//! Cache Entry Module
//!
//! Defines the persisted envelope around a cached payload.

use std::time::Duration;

use serde::{Deserialize, Serialize};

// == Cache Entry ==
/// A cached payload together with its write time and expiry.
///
/// Serialized as `{"data": ..., "timestamp": ..., "expiry": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    /// The cached payload
    pub data: T,
    /// Write time (Unix milliseconds)
    pub timestamp: u64,
    /// Time after which the entry is stale (Unix milliseconds)
    pub expiry: u64,
}

impl<T> CacheEntry<T> {
    // == Constructor ==
    /// Creates an entry written at `now_ms` that stays valid for `ttl`.
    pub fn new(data: T, now_ms: u64, ttl: Duration) -> Self {
        let ttl_ms = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);
        Self {
            data,
            timestamp: now_ms,
            expiry: now_ms.saturating_add(ttl_ms),
        }
    }

    // == Validity ==
    /// Checks whether the entry may be served at `now_ms`.
    ///
    /// An entry is valid up to and including its expiry instant. A zero-length
    /// lifetime is never valid.
    pub fn is_valid_at(&self, now_ms: u64) -> bool {
        self.expiry > self.timestamp && now_ms <= self.expiry
    }

    // == Age ==
    /// Whole seconds elapsed since the entry was written, floored.
    ///
    /// Reads as zero if the clock has moved behind the write time.
    pub fn age_seconds_at(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.timestamp) / 1000
    }

    /// Milliseconds of validity left at `now_ms`, zero once stale.
    pub fn remaining_ms_at(&self, now_ms: u64) -> u64 {
        self.expiry.saturating_sub(now_ms)
    }

    /// Lifetime the entry was written with.
    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.expiry.saturating_sub(self.timestamp))
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_creation() {
        let entry = CacheEntry::new(vec!["steam"], 1_000, Duration::from_secs(60));

        assert_eq!(entry.data, vec!["steam"]);
        assert_eq!(entry.timestamp, 1_000);
        assert_eq!(entry.expiry, 61_000);
        assert_eq!(entry.ttl(), Duration::from_secs(60));
    }

    #[test]
    fn test_valid_until_expiry_inclusive() {
        let entry = CacheEntry::new((), 0, Duration::from_millis(60_000));

        assert!(entry.is_valid_at(0));
        assert!(entry.is_valid_at(30_000));
        assert!(entry.is_valid_at(60_000), "Entry should be valid at its expiry instant");
        assert!(!entry.is_valid_at(60_001));
        assert!(!entry.is_valid_at(70_000));
    }

    #[test]
    fn test_zero_ttl_never_valid() {
        let entry = CacheEntry::new((), 5_000, Duration::ZERO);
        assert!(!entry.is_valid_at(5_000));
    }

    #[test]
    fn test_age_is_floored() {
        let entry = CacheEntry::new((), 10_000, Duration::from_secs(60));

        assert_eq!(entry.age_seconds_at(10_000), 0);
        assert_eq!(entry.age_seconds_at(10_999), 0);
        assert_eq!(entry.age_seconds_at(11_000), 1);
        assert_eq!(entry.age_seconds_at(75_500), 65);
    }

    #[test]
    fn test_age_with_clock_behind_write_time() {
        let entry = CacheEntry::new((), 10_000, Duration::from_secs(60));
        assert_eq!(entry.age_seconds_at(9_000), 0);
    }

    #[test]
    fn test_remaining_ms() {
        let entry = CacheEntry::new((), 0, Duration::from_secs(10));

        assert_eq!(entry.remaining_ms_at(4_000), 6_000);
        assert_eq!(entry.remaining_ms_at(20_000), 0);
    }

    #[test]
    fn test_huge_ttl_saturates() {
        let entry = CacheEntry::new((), 1, Duration::MAX);
        assert_eq!(entry.expiry, u64::MAX);
    }
}
