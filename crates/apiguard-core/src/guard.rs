//! The unified Guard facade.
//!
//! This module provides the main entry point for ApiGuard. The [`Guard`]
//! struct wires the model registry and the request validator together and
//! exposes the two logical operations of the system: register a model,
//! validate a request.

use std::sync::Arc;

use tracing::{debug, info};

use apiguard_registry::{
    HttpMethod, KeyValueStore, MemoryCache, Model, ModelRegistry, SledStore,
};
use apiguard_validator::{IncomingRequest, RequestValidator, ValidationReport};

use crate::{
    config::{GuardConfig, UnknownEndpointPolicy},
    error::GuardError,
    Result,
};

/// The ApiGuard facade.
///
/// Owns a [`ModelRegistry`] (dual-store persistence) and a
/// [`RequestValidator`] (per-field matching). Registration and validation
/// calls are independent; the only shared state is the backing stores.
///
/// # Example
///
/// ```rust,ignore
/// let guard = Guard::new(GuardConfig::default())?;
///
/// guard.register_model(model).await?;
///
/// let report = guard.validate_request(&request).await?;
/// if report.is_abnormal {
///     // anomalies are data; inspect report.abnormal_fields
/// }
/// ```
pub struct Guard {
    /// Configuration.
    config: GuardConfig,

    /// Dual-store model registry.
    registry: ModelRegistry,

    /// Per-field matcher.
    validator: RequestValidator,
}

impl Guard {
    /// Creates a Guard with the default store wiring: a sled-backed
    /// durable store at the configured path and an in-process cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the durable database cannot be opened.
    pub fn new(config: GuardConfig) -> Result<Self> {
        let durable = SledStore::open(&config.registry.db_path)
            .map_err(apiguard_registry::RegistryError::Store)?;

        info!(db_path = %config.registry.db_path.display(), "guard initialized");

        Ok(Self::with_stores(
            config,
            Arc::new(durable),
            Arc::new(MemoryCache::new()),
        ))
    }

    /// Creates a Guard over caller-supplied stores.
    ///
    /// The injection seam for tests and for deployments with networked
    /// store clients.
    pub fn with_stores(
        config: GuardConfig,
        durable: Arc<dyn KeyValueStore>,
        cache: Arc<dyn KeyValueStore>,
    ) -> Self {
        Guard {
            config,
            registry: ModelRegistry::new(durable, cache),
            validator: RequestValidator::new(),
        }
    }

    /// Registers a validation model for its `(path, method)` endpoint,
    /// replacing any prior model for the same pair.
    ///
    /// # Errors
    ///
    /// - [`GuardError::InvalidModel`] if the model violates a structural
    ///   invariant; nothing was written.
    /// - [`GuardError::Registry`] if the dual write could not be completed;
    ///   the compensating delete has already run.
    pub async fn register_model(&self, model: Model) -> Result<()> {
        model.validate().map_err(|err| match err {
            apiguard_registry::RegistryError::InvalidModel(msg) => GuardError::InvalidModel(msg),
            other => GuardError::Registry(other),
        })?;

        let key = model.storage_key();
        self.registry.register(model).await?;
        info!(key = %key, "model registered");
        Ok(())
    }

    /// Validates a request against the model registered for its
    /// `(path, method)` pair.
    ///
    /// Always succeeds for well-formed requests with a registered model:
    /// anomalies are returned in the report, never as errors. When no
    /// model exists, the configured [`UnknownEndpointPolicy`] decides
    /// between an empty report and [`GuardError::UnknownEndpoint`].
    pub async fn validate_request(&self, request: &IncomingRequest) -> Result<ValidationReport> {
        let Some(record) = self.registry.resolve(&request.path, request.method).await? else {
            return match self.config.validation.unknown_endpoint {
                UnknownEndpointPolicy::EmptyReport => {
                    debug!(path = %request.path, method = %request.method, "no model registered; returning empty report");
                    Ok(ValidationReport::new())
                }
                UnknownEndpointPolicy::Reject => Err(GuardError::UnknownEndpoint {
                    path: request.path.clone(),
                    method: request.method,
                }),
            };
        };

        let report = self.validator.validate(request, &record);
        debug!(
            path = %request.path,
            method = %request.method,
            abnormal = report.is_abnormal,
            "request validated"
        );
        Ok(report)
    }

    /// The active configuration.
    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    /// Removes a model from one backing store.
    ///
    /// Exposed for operational tooling; everyday consistency is handled by
    /// the registry's own compensating deletes.
    pub async fn delete_model(
        &self,
        role: apiguard_registry::StoreRole,
        path: &str,
        method: HttpMethod,
    ) -> Result<()> {
        self.registry.delete(role, path, method).await?;
        Ok(())
    }
}

impl std::fmt::Debug for Guard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Guard")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
