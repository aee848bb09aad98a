//! Key/value persistence primitive.
//!
//! The registry is one JSON blob under one key, so the storage surface is just
//! get/set of raw bytes. [`SqliteKvStore`](crate::SqliteKvStore) is the durable
//! implementation; [`MemoryKvStore`] backs tests and ephemeral runs.

use crate::error::StoreError;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

/// Single-key get/set persistence. Whatever atomicity the implementation gives
/// a single key's value is all callers can rely on.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Returns the stored bytes for `key`, or None if the key was never set.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError>;
}

/// In-process KvStore over a HashMap. Nothing survives a restart.
#[derive(Default)]
pub struct MemoryKvStore {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KvStore for MemoryKvStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        self.entries
            .lock()
            .await
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }
}
