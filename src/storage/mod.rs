//! Storage Module
//!
//! Asynchronous string-keyed persistence that the cache is layered on.
//!
//! # Adapters
//! - `MemoryKvStore`: process-local map, lost on restart
//! - `FileKvStore`: single JSON document on disk

mod file;
mod memory;

use async_trait::async_trait;

use crate::error::StorageResult;

pub use file::FileKvStore;
pub use memory::MemoryKvStore;

/// Durable key-value storage shared by the cache and unrelated application state.
///
/// Every call may fail; callers decide whether a failure matters.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Returns the stored string, or `None` if the key is absent.
    async fn get_item(&self, key: &str) -> StorageResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set_item(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Removes `key`. Removing an absent key succeeds.
    async fn remove_item(&self, key: &str) -> StorageResult<()>;

    /// Removes every key in `keys` in one batch.
    async fn multi_remove(&self, keys: &[String]) -> StorageResult<()>;

    /// Lists every stored key in unspecified order.
    async fn get_all_keys(&self) -> StorageResult<Vec<String>>;
}
