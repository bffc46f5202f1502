//! File-backed key-value adapter.
//!
//! All keys live in one JSON object on disk. The document is loaded on first
//! use and rewritten in full after every mutation.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use super::KvStore;
use crate::error::StorageResult;

type Document = HashMap<String, String>;

// == File Store ==
/// Key-value storage persisted as a JSON document.
#[derive(Debug)]
pub struct FileKvStore {
    path: PathBuf,
    /// Loaded document; `None` until first access
    items: Mutex<Option<Document>>,
}

impl FileKvStore {
    /// Creates a store persisted at `path`. Nothing is read until first access.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            items: Mutex::new(None),
        }
    }

    /// Returns the document path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> StorageResult<Document> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(Document::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!("No storage document at {}, starting empty", self.path.display());
                Ok(Document::new())
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn persist(&self, items: &Document) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        // Write then rename so a crash never leaves a truncated document.
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, serde_json::to_vec(items)?).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Runs `f` against the loaded document and persists it when `f` reports a change.
    async fn mutate<F>(&self, f: F) -> StorageResult<()>
    where
        F: FnOnce(&mut Document) -> bool + Send,
    {
        let mut guard = self.items.lock().await;
        if guard.is_none() {
            *guard = Some(self.load().await?);
        }
        let Some(items) = guard.as_mut() else {
            return Ok(());
        };

        let mut next = items.clone();
        if f(&mut next) {
            self.persist(&next).await?;
            *items = next;
        }
        Ok(())
    }

    async fn read<R, F>(&self, f: F) -> StorageResult<R>
    where
        F: FnOnce(&Document) -> R + Send,
    {
        let mut guard = self.items.lock().await;
        if guard.is_none() {
            *guard = Some(self.load().await?);
        }
        let empty = Document::new();
        Ok(f(guard.as_ref().unwrap_or(&empty)))
    }
}

#[async_trait]
impl KvStore for FileKvStore {
    async fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        self.read(|items| items.get(key).cloned()).await
    }

    async fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        self.mutate(|items| {
            items.insert(key.to_string(), value.to_string());
            true
        })
        .await
    }

    async fn remove_item(&self, key: &str) -> StorageResult<()> {
        self.mutate(|items| items.remove(key).is_some()).await
    }

    async fn multi_remove(&self, keys: &[String]) -> StorageResult<()> {
        self.mutate(|items| {
            let before = items.len();
            for key in keys {
                items.remove(key);
            }
            items.len() != before
        })
        .await
    }

    async fn get_all_keys(&self) -> StorageResult<Vec<String>> {
        self.read(|items| items.keys().cloned().collect()).await
    }
}
