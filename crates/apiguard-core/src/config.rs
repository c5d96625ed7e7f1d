//! Configuration types for the ApiGuard facade.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the [`Guard`](crate::Guard) facade.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GuardConfig {
    /// Model registry configuration.
    pub registry: RegistryConfig,

    /// Request validation configuration.
    pub validation: ValidationConfig,
}

/// Model registry configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Path to the durable model database.
    pub db_path: PathBuf,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("./apiguard_models.db"),
        }
    }
}

/// Request validation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// What to do when a request arrives for a `(path, method)` with no
    /// registered model.
    pub unknown_endpoint: UnknownEndpointPolicy,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            unknown_endpoint: UnknownEndpointPolicy::EmptyReport,
        }
    }
}

/// Policy for requests against unregistered endpoints.
///
/// With no model there is nothing to validate against; integrators choose
/// whether that is benign or an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownEndpointPolicy {
    /// Return an empty, non-abnormal report (default).
    EmptyReport,

    /// Fail the call with an unknown-endpoint error.
    Reject,
}
