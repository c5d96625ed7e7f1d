//! # Model Registry & Consistency Coordinator
//!
//! Owns the lifecycle of a validation model: build its schema index, write
//! the record to both backing stores, read it back cache-first, and delete
//! it as a compensating action when a dual-write half-fails.
//!
//! ## Consistency protocol
//!
//! Registration writes to the durable store and the cache store
//! concurrently and independently. The four outcomes:
//!
//! | Durable | Cache | Action |
//! |---------|-------|--------|
//! | ok | ok | commit |
//! | err | err | nothing to roll back; report failure |
//! | ok | err | compensating delete against the durable store |
//! | err | ok | compensating delete against the cache store |
//!
//! The compensating delete is best-effort: its own failure is logged, not
//! retried, and the original failure is what the caller sees. A double
//! failure can therefore leave one store stale. Callers must treat
//! `RegistrationFailed` as "state not guaranteed consistent; re-register
//! to converge."
//!
//! Reads are cache-aside: cache first, durable fallback on miss, and a
//! best-effort cache backfill on a durable hit so the cache self-heals
//! after a restart.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::index::SchemaIndex;
use crate::models::{storage_key, HttpMethod, Model, RegistryError, Result};
use crate::storage::KeyValueStore;

/// A model together with its pre-built schema index, as persisted in both
/// stores. The index's required-field lists travel with the record; the
/// per-request seen flags never do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelRecord {
    /// The registered model.
    pub model: Model,

    /// Lookup structures derived from the model at registration time.
    pub index: SchemaIndex,
}

impl ModelRecord {
    /// Indexes a model for registration.
    pub fn new(model: Model) -> Self {
        ModelRecord {
            index: SchemaIndex::build(&model),
            model,
        }
    }
}

/// Which backing store a single-store operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreRole {
    /// The store that survives restarts.
    Durable,
    /// The fast read cache.
    Cache,
}

impl StoreRole {
    fn as_str(&self) -> &'static str {
        match self {
            StoreRole::Durable => "durable",
            StoreRole::Cache => "cache",
        }
    }
}

/// The registry coordinator.
///
/// Holds one handle per store role. No lock is held across the dual-write:
/// correctness comes from the compensating-delete protocol, at the cost of
/// a narrow window where one store briefly has a record the other lacks.
pub struct ModelRegistry {
    durable: Arc<dyn KeyValueStore>,
    cache: Arc<dyn KeyValueStore>,
}

impl ModelRegistry {
    /// Creates a registry over the given durable and cache stores.
    pub fn new(durable: Arc<dyn KeyValueStore>, cache: Arc<dyn KeyValueStore>) -> Self {
        ModelRegistry { durable, cache }
    }

    /// Registers a model, replacing any prior model for the same
    /// `(path, method)` pair in both stores.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::RegistrationFailed`] when either write
    /// fails. By that point the compensating delete has already restored
    /// "model absent" in the store whose write succeeded, as far as it
    /// could.
    pub async fn register(&self, model: Model) -> Result<()> {
        let key = model.storage_key();
        let record = ModelRecord::new(model);
        let bytes = serde_json::to_vec(&record)
            .map_err(crate::storage::StoreError::Serialization)
            .map_err(RegistryError::Store)?;

        // Both writes run concurrently; each outcome is observed
        // independently. Failure of one must not cancel the other.
        let (durable_result, cache_result) = tokio::join!(
            self.durable.put(&key, &bytes),
            self.cache.put(&key, &bytes),
        );

        match (durable_result, cache_result) {
            (Ok(()), Ok(())) => {
                info!(key = %key, "model registered in both stores");
                Ok(())
            }
            (Err(durable_err), Err(cache_err)) => {
                // Neither store took the write; nothing to roll back.
                warn!(
                    key = %key,
                    durable_error = %durable_err,
                    cache_error = %cache_err,
                    "both store writes failed"
                );
                Err(RegistryError::RegistrationFailed { key })
            }
            (Ok(()), Err(cache_err)) => {
                warn!(key = %key, error = %cache_err, "cache write failed, rolling back durable store");
                self.compensate(StoreRole::Durable, &key).await;
                Err(RegistryError::RegistrationFailed { key })
            }
            (Err(durable_err), Ok(())) => {
                warn!(key = %key, error = %durable_err, "durable write failed, rolling back cache store");
                self.compensate(StoreRole::Cache, &key).await;
                Err(RegistryError::RegistrationFailed { key })
            }
        }
    }

    /// Resolves the indexed model for `(path, method)`.
    ///
    /// Cache-first: a cache hit returns immediately. On a cache miss the
    /// durable store is consulted; a hit there backfills the cache
    /// (best-effort) before returning. `Ok(None)` strictly means "no such
    /// model"; store failures surface as errors.
    pub async fn resolve(&self, path: &str, method: HttpMethod) -> Result<Option<ModelRecord>> {
        let key = storage_key(path, method);

        if let Some(bytes) = self.cache.get(&key).await? {
            debug!(key = %key, "cache hit");
            return decode_record(&key, &bytes).map(Some);
        }

        let Some(bytes) = self.durable.get(&key).await? else {
            debug!(key = %key, "model absent from both stores");
            return Ok(None);
        };

        let record = decode_record(&key, &bytes)?;

        // Self-healing after cache loss: repopulate before returning. The
        // model was found, so a backfill failure must not fail the read.
        if let Err(err) = self.cache.put(&key, &bytes).await {
            warn!(key = %key, error = %err, "cache backfill failed");
        } else {
            debug!(key = %key, "cache backfilled from durable store");
        }

        Ok(Some(record))
    }

    /// Removes a model key from exactly one store.
    ///
    /// This is the compensating action of the dual-write protocol, exposed
    /// for integrators that manage store contents directly.
    pub async fn delete(&self, role: StoreRole, path: &str, method: HttpMethod) -> Result<()> {
        let key = storage_key(path, method);
        self.store(role).delete(&key).await?;
        Ok(())
    }

    fn store(&self, role: StoreRole) -> &dyn KeyValueStore {
        match role {
            StoreRole::Durable => self.durable.as_ref(),
            StoreRole::Cache => self.cache.as_ref(),
        }
    }

    /// Issues the compensating delete against one store.
    ///
    /// Best-effort: a failure here is logged and swallowed so the caller
    /// still sees the original registration failure.
    async fn compensate(&self, role: StoreRole, key: &str) {
        if let Err(err) = self.store(role).delete(key).await {
            warn!(
                key = %key,
                store = role.as_str(),
                error = %err,
                "compensating delete failed; store may hold a stale record"
            );
        }
    }
}

impl std::fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelRegistry").finish_non_exhaustive()
    }
}

fn decode_record(key: &str, bytes: &[u8]) -> Result<ModelRecord> {
    serde_json::from_slice(bytes).map_err(|source| RegistryError::CorruptRecord {
        key: key.to_string(),
        source,
    })
}
