//! Subscription registry: channel id → last delivered puzzle timestamp.
//!
//! Persisted as one JSON object under one key. A channel present in the map is
//! subscribed; 0 means no puzzle was ever delivered to it. All mutations go
//! through [`SubscriptionStore::update`], which serializes load-modify-save
//! behind a mutex so a subscribe landing during a dispatch tick is not lost.

use crate::error::StoreError;
use crate::kv::KvStore;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// Channel id → publish timestamp of the last puzzle delivered there.
pub type Registry = HashMap<String, i64>;

/// Storage key holding the serialized registry.
pub const SUBSCRIPTIONS_KEY: &str = "subscriptions";

/// Load/save/update of the registry blob over a [`KvStore`].
pub struct SubscriptionStore {
    kv: Arc<dyn KvStore>,
    // Serializes every read-modify-write; plain load/save stay lock-free.
    write_lock: Mutex<()>,
}

impl SubscriptionStore {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self {
            kv,
            write_lock: Mutex::new(()),
        }
    }

    /// Loads the registry. A key that was never written is an empty registry,
    /// not an error; an undecodable blob is [`StoreError::Decode`].
    pub async fn load(&self) -> Result<Registry, StoreError> {
        match self.kv.get(SUBSCRIPTIONS_KEY).await? {
            Some(blob) => Ok(serde_json::from_slice(&blob)?),
            None => Ok(Registry::new()),
        }
    }

    /// Overwrites the stored registry. Prefer [`update`](Self::update) for any
    /// read-modify-write; bare save is last-writer-wins.
    pub async fn save(&self, registry: &Registry) -> Result<(), StoreError> {
        let blob = serde_json::to_vec(registry)?;
        self.kv.set(SUBSCRIPTIONS_KEY, &blob).await
    }

    /// Serialized read-modify-write: loads the registry, applies `f`, saves,
    /// and returns the saved registry. Holding the mutex across the whole
    /// sequence is what closes the lost-update race between the command
    /// surface and the dispatcher.
    pub async fn update<F>(&self, f: F) -> Result<Registry, StoreError>
    where
        F: FnOnce(&mut Registry),
    {
        let _guard = self.write_lock.lock().await;
        let mut registry = self.load().await?;
        f(&mut registry);
        self.save(&registry).await?;
        debug!(channels = registry.len(), "Registry updated");
        Ok(registry)
    }
}
