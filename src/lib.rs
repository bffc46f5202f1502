//! Photo Cache - TTL read-through cache for a train photo catalog
//!
//! Keeps lookup tables and listing pages in persistent local storage with
//! expiry-based invalidation, falling back to the remote catalog on a miss.

pub mod api;
pub mod cache;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod storage;
pub mod tasks;

pub use api::AppState;
pub use cache::TtlCache;
pub use catalog::CachedCatalog;
pub use config::Config;
pub use tasks::spawn_status_reporter;
