//! File-backed key-value store.
//!
//! All keys live in one JSON object file (`storage.json`). Every mutation is a
//! locked read-modify-write through [`AtomicJsonFile`], run on the blocking
//! thread pool. An unparseable file is replaced on the next write.

use crate::storage::AtomicJsonFile;
use async_trait::async_trait;
use servimarket_core::error::{MarketError, Result};
use servimarket_core::storage::KeyValueStore;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

type Entries = BTreeMap<String, String>;

#[derive(Clone)]
pub struct FileKeyValueStore {
    file: Arc<AtomicJsonFile<Entries>>,
    /// Serializes access from this process; the file lock covers others.
    guard: Arc<Mutex<()>>,
}

impl FileKeyValueStore {
    /// Creates a store over `path`. The file is created on first write.
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: Arc::new(AtomicJsonFile::new(path).reset_corrupt()),
            guard: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    async fn run_blocking<F, R>(&self, op: F) -> Result<R>
    where
        F: FnOnce(&AtomicJsonFile<Entries>) -> Result<R> + Send + 'static,
        R: Send + 'static,
    {
        let file = self.file.clone();
        let guard = self.guard.clone();
        tokio::task::spawn_blocking(move || {
            let _held = guard
                .lock()
                .map_err(|e| MarketError::internal(format!("Storage guard poisoned: {}", e)))?;
            op(&file)
        })
            .await
            .map_err(|e| MarketError::internal(format!("Failed to join task: {}", e)))?
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let key = key.to_string();
        self.run_blocking(move |file| {
            let entries = file.load()?.unwrap_or_default();
            Ok(entries.get(&key).cloned())
        })
        .await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let key = key.to_string();
        let value = value.to_string();
        self.run_blocking(move |file| {
            file.update(Entries::new(), |entries| {
                entries.insert(key, value);
                Ok(())
            })?;
            Ok(())
        })
        .await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let key = key.to_string();
        self.run_blocking(move |file| {
            if !file.path().exists() {
                return Ok(());
            }
            file.update(Entries::new(), |entries| {
                entries.remove(&key);
                Ok(())
            })?;
            Ok(())
        })
        .await
    }
}
