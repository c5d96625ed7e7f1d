//! # ApiGuard Request Validator
//!
//! Per-field anomaly detection: checks a concrete incoming request against
//! a registered model's schema index and reports every deviation found.
//!
//! ## Anomaly taxonomy
//!
//! | Kind | Meaning |
//! |------|---------|
//! | `template_missing` | the request carried a field no template describes |
//! | `type_mismatch` | the value satisfied none of the declared types |
//! | `required_missing` | a required field never appeared in the request |
//!
//! Abnormality is data, not a fault: validation succeeds whenever it can
//! run, and the report says what deviated.
//!
//! ## Usage
//!
//! ```rust
//! use apiguard_registry::{FieldTemplate, FieldType, HttpMethod, Model, ModelRecord};
//! use apiguard_validator::{IncomingRequest, RequestField, RequestValidator};
//! use serde_json::json;
//!
//! let record = ModelRecord::new(Model {
//!     path: "/orders/update".to_string(),
//!     method: HttpMethod::Patch,
//!     query_params: vec![],
//!     headers: vec![],
//!     body: vec![FieldTemplate {
//!         name: "order_id".to_string(),
//!         required: true,
//!         types: vec![FieldType::Int, FieldType::Uuid],
//!     }],
//! });
//!
//! let request = IncomingRequest {
//!     path: "/orders/update".to_string(),
//!     method: HttpMethod::Patch,
//!     query_params: vec![],
//!     headers: vec![],
//!     body: vec![RequestField { name: "order_id".to_string(), value: json!(42) }],
//! };
//!
//! let report = RequestValidator::new().validate(&request, &record);
//! assert!(!report.is_abnormal);
//! ```

pub mod models;
pub mod predicates;
pub mod validator;

pub use models::{
    Abnormality, AbnormalityKind, IncomingRequest, RequestField, ValidationReport,
};
pub use validator::RequestValidator;
