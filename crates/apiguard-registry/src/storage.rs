//! # Store Capability Interface
//!
//! The registry talks to its two backing stores through a single key-value
//! capability trait. The durable role is expected to survive restarts; the
//! cache role is expected to be fast and is allowed to lose data (the
//! registry self-heals it on read). Both roles provide per-key atomic
//! put/get/delete; no cross-key transactions are assumed, and consistency
//! between the two stores is the coordinator's job, not the stores'.
//!
//! Two reference implementations ship with the crate:
//!
//! | Implementation | Role | Backing |
//! |----------------|------|---------|
//! | [`SledStore`] | durable | embedded sled tree |
//! | [`MemoryCache`] | cache | in-process `HashMap` |

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;

/// Errors surfaced by a backing store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store backend rejected or failed the operation.
    #[error("store backend error: {0}")]
    Backend(String),

    /// A value could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<sled::Error> for StoreError {
    fn from(err: sled::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}

/// A key-value store capability: per-key atomic upsert, lookup and delete.
///
/// The registry holds one handle in the durable role and one in the cache
/// role; the trait is identical for both because the coordinator, not the
/// store, owns the consistency protocol.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Stores `value` under `key`, replacing any prior value.
    async fn put(&self, key: &str, value: &[u8]) -> Result<(), StoreError>;

    /// Returns the value stored under `key`, or `None` if absent.
    ///
    /// A backend failure is an error, never `None`.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Removes `key`. Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<(), StoreError>;
}

/// Tree name for model records.
const MODEL_TREE: &str = "models";

/// Durable store backed by an embedded sled database.
///
/// Stands in for the document store of a networked deployment. Sled
/// guarantees per-key atomic writes, which is all the coordinator needs.
#[derive(Clone)]
pub struct SledStore {
    db: sled::Db,
    models: sled::Tree,
}

impl SledStore {
    /// Opens or creates a database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let db = sled::open(path)?;
        let models = db.open_tree(MODEL_TREE)?;
        Ok(SledStore { db, models })
    }

    /// Creates a temporary in-memory database, discarded on drop.
    pub fn temporary() -> Result<Self, StoreError> {
        let config = sled::Config::new().temporary(true);
        let db = config.open()?;
        let models = db.open_tree(MODEL_TREE)?;
        Ok(SledStore { db, models })
    }

    /// Flushes pending writes to disk.
    pub fn flush(&self) -> Result<(), StoreError> {
        self.db.flush()?;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for SledStore {
    async fn put(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        self.models.insert(key.as_bytes(), value)?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.models.get(key.as_bytes())?.map(|ivec| ivec.to_vec()))
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.models.remove(key.as_bytes())?;
        Ok(())
    }
}

impl std::fmt::Debug for SledStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SledStore")
            .field("records", &self.models.len())
            .finish()
    }
}

/// In-process cache store.
///
/// Stands in for the read cache (Redis in a networked deployment). Losing
/// its contents is safe: the registry backfills it from the durable store
/// on the next resolve.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached records.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// True if nothing is cached.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Drops every cached record, simulating a cache restart.
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }
}

#[async_trait]
impl KeyValueStore for MemoryCache {
    async fn put(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}
