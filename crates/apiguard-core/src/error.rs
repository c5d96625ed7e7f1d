//! Error types for the ApiGuard facade.

use apiguard_registry::HttpMethod;
use thiserror::Error;

/// Facade-level error type.
///
/// Distinguishes "the model was rejected before any write" from "storage
/// failed": callers react differently (fix the payload vs. retry the
/// registration).
#[derive(Debug, Error)]
pub enum GuardError {
    /// The model violates a structural invariant; nothing was written.
    #[error("model rejected: {0}")]
    InvalidModel(String),

    /// Registry error passthrough (registration failure or store fault).
    #[error("registry error: {0}")]
    Registry(#[from] apiguard_registry::RegistryError),

    /// A request named an endpoint with no registered model and the
    /// configured policy rejects such requests.
    #[error("no model registered for {method} {path}")]
    UnknownEndpoint {
        /// Requested path.
        path: String,
        /// Requested method.
        method: HttpMethod,
    },
}
