//! # ApiGuard Core
//!
//! Unified facade for API request validation.
//! Orchestrates the Model Registry and the Request Validator.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        APIGUARD CORE                            │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                                                                 │
//! │                    ┌─────────────────┐                          │
//! │                    │      Guard      │  ← Unified Facade        │
//! │                    └────────┬────────┘                          │
//! │                             │                                   │
//! │              ┌──────────────┴──────────────┐                    │
//! │              ▼                             ▼                    │
//! │       ┌─────────────┐               ┌─────────────┐             │
//! │       │    Model    │               │   Request   │             │
//! │       │   Registry  │               │  Validator  │             │
//! │       └──────┬──────┘               └─────────────┘             │
//! │              │                                                  │
//! │      ┌───────┴───────┐                                          │
//! │      ▼               ▼                                          │
//! │  ┌────────┐     ┌────────┐                                      │
//! │  │ durable│     │ cache  │                                      │
//! │  │ store  │     │ store  │                                      │
//! │  └────────┘     └────────┘                                      │
//! │                                                                 │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use apiguard_core::{Guard, GuardConfig};
//!
//! let guard = Guard::new(GuardConfig::default())?;
//!
//! // Register a validation model for an endpoint
//! guard.register_model(model).await?;
//!
//! // Validate a request; anomalies come back as data
//! let report = guard.validate_request(&request).await?;
//! if report.is_abnormal {
//!     quarantine(report.abnormal_fields);
//! }
//! ```
//!
//! ## Consistency Notes
//!
//! - Registration writes to both stores concurrently; a partial failure
//!   triggers a compensating delete on the store that succeeded
//! - Resolution is cache-aside: cache first, durable on miss, with a
//!   best-effort cache backfill
//! - Validation never mutates the registered model; per-request scratch
//!   state is minted fresh on every call

mod config;
mod error;
mod guard;

pub use config::{GuardConfig, RegistryConfig, UnknownEndpointPolicy, ValidationConfig};
pub use error::GuardError;
pub use guard::Guard;

// Re-export component types for convenience
pub use apiguard_registry::{
    storage_key, FieldTemplate, FieldType, HttpMethod, KeyValueStore, MemoryCache, Model,
    ModelRecord, ModelRegistry, ParamGroup, SledStore, StoreRole,
};
pub use apiguard_validator::{
    Abnormality, AbnormalityKind, IncomingRequest, RequestField, RequestValidator,
    ValidationReport,
};

/// Core result type for guard operations.
pub type Result<T> = std::result::Result<T, GuardError>;
