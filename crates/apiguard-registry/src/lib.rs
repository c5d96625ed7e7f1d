//! # ApiGuard Model Registry
//!
//! Durable + cached persistence for request-validation models, coordinated
//! for consistency under partial failure.
//!
//! ## Purpose
//!
//! This crate implements three tightly coupled pieces:
//!
//! 1. **Schema vocabulary**: the `Model` / `FieldTemplate` data model and
//!    the closed `FieldType` tag set shared with the validator.
//!
//! 2. **Schema Index**: per-group name→template maps and required-field
//!    lists, built once per registration and persisted alongside the model
//!    so reads never rebuild them.
//!
//! 3. **Consistency Coordinator**: the dual-write / compensating-delete
//!    protocol over two [`KeyValueStore`] capabilities, plus cache-aside
//!    reads with durable fallback and self-healing backfill.
//!
//! ## Architecture
//!
//! ```text
//!                 ┌──────────────────┐
//!                 │  ModelRegistry   │
//!                 │  (coordinator)   │
//!                 └───────┬──────────┘
//!             dual write  │  cache-aside read
//!          ┌──────────────┴──────────────┐
//!          ▼                             ▼
//!    ┌───────────┐                ┌────────────┐
//!    │ SledStore │                │MemoryCache │
//!    │ (durable) │ ── backfill ─▶ │  (cache)   │
//!    └───────────┘                └────────────┘
//! ```
//!
//! ## Consistency Notes
//!
//! - The two writes of a registration run concurrently; neither can cancel
//!   the other, and each outcome is observed independently.
//! - A half-failed registration triggers a compensating delete against the
//!   store that succeeded. The delete itself is best-effort: its failure is
//!   logged and the original failure reported. One store can end up stale
//!   after such a double failure; re-registering converges the state.
//! - No retries happen inside this crate; retry policy belongs to the
//!   integration boundary.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use apiguard_registry::{Model, ModelRegistry, MemoryCache, SledStore};
//! use std::sync::Arc;
//!
//! let registry = ModelRegistry::new(
//!     Arc::new(SledStore::open("./models.db")?),
//!     Arc::new(MemoryCache::new()),
//! );
//!
//! registry.register(model).await?;
//! if let Some(record) = registry.resolve("/orders/update", HttpMethod::Patch).await? {
//!     // record.index is ready for the validator
//! }
//! ```

pub mod index;
pub mod models;
pub mod registry;
pub mod storage;

pub use index::{GroupIndex, SchemaIndex};
pub use models::{
    storage_key, FieldTemplate, FieldType, HttpMethod, Model, ParamGroup, RegistryError, Result,
};
pub use registry::{ModelRecord, ModelRegistry, StoreRole};
pub use storage::{KeyValueStore, MemoryCache, SledStore, StoreError};
