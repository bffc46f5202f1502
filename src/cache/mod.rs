//! Cache Module
//!
//! Provides TTL caching of JSON payloads over a persistent key-value store,
//! with lazy eviction of expired entries.

pub mod codec;
mod entry;
mod status;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::CacheEntry;
pub use status::{CacheStatus, KeyStatus};
pub use store::{EntryInfo, TtlCache};

// == Public Constants ==
/// Namespace prepended to every cache key in persistent storage
pub const DEFAULT_PREFIX: &str = "filter_cache_";
