//! # Core Data Models for the Model Registry
//!
//! This module defines the schema vocabulary shared by the registry and the
//! request validator: HTTP methods, the closed field-type tag set, per-field
//! validation templates and the `Model` aggregate keyed by `(path, method)`.
//!
//! ## Invariants
//!
//! - A template `name` is 1..=255 characters.
//! - A template declares at least one acceptable type (duplicates are
//!   redundant but allowed).
//! - `(path, method)` is the natural partition key: registering the same
//!   pair again fully replaces the prior model (upsert semantics).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::storage::StoreError;

/// HTTP methods accepted as the second half of a model key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl HttpMethod {
    /// Wire form of the method, as used in storage keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The closed vocabulary of field types a template may declare.
///
/// The set is closed: matching is a tagged-variant dispatch, not
/// open-ended. Wire tags match the original registration payloads
/// (`"UUID"`, `"Auth-Token"`, etc.), and `Display` reproduces them so
/// type-mismatch descriptions list the declared types verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    String,
    Boolean,
    Int,
    List,
    #[serde(rename = "UUID")]
    Uuid,
    Email,
    Date,
    #[serde(rename = "Auth-Token")]
    AuthToken,
}

impl FieldType {
    /// Wire tag for the type.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::String => "String",
            FieldType::Boolean => "Boolean",
            FieldType::Int => "Int",
            FieldType::List => "List",
            FieldType::Uuid => "UUID",
            FieldType::Email => "Email",
            FieldType::Date => "Date",
            FieldType::AuthToken => "Auth-Token",
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of the three fixed parameter groups carried by models and requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamGroup {
    QueryParams,
    Headers,
    Body,
}

impl ParamGroup {
    /// All groups, in the order they are scanned during validation.
    pub const ALL: [ParamGroup; 3] = [
        ParamGroup::QueryParams,
        ParamGroup::Headers,
        ParamGroup::Body,
    ];

    /// Group name as it appears in result keys (`"body:order_id"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamGroup::QueryParams => "query_params",
            ParamGroup::Headers => "headers",
            ParamGroup::Body => "body",
        }
    }
}

impl std::fmt::Display for ParamGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One schema field rule: the field's name, whether it must be present, and
/// the set of types any submitted value may satisfy (logical OR).
///
/// Immutable once part of a registered model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldTemplate {
    /// Field name, unique within its group.
    pub name: String,

    /// Whether the field must appear in every request.
    pub required: bool,

    /// Acceptable types; a value matching any of them passes.
    pub types: Vec<FieldType>,
}

impl FieldTemplate {
    /// Checks the structural invariants of a single template.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(RegistryError::InvalidModel(
                "template name must not be empty".to_string(),
            ));
        }
        if self.name.len() > 255 {
            return Err(RegistryError::InvalidModel(format!(
                "template name of {} characters exceeds the 255 limit",
                self.name.len()
            )));
        }
        if self.types.is_empty() {
            return Err(RegistryError::InvalidModel(format!(
                "template {} declares no types",
                self.name
            )));
        }
        Ok(())
    }
}

/// A registered validation model for one `(path, method)` endpoint.
///
/// Owns three ordered groups of [`FieldTemplate`]s. The storage key for both
/// backing stores is derived from the pair via [`Model::storage_key`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    /// Endpoint path, e.g. `/users/create`.
    pub path: String,

    /// Endpoint method.
    pub method: HttpMethod,

    /// Templates for URL query parameters.
    pub query_params: Vec<FieldTemplate>,

    /// Templates for HTTP headers.
    pub headers: Vec<FieldTemplate>,

    /// Templates for body fields.
    pub body: Vec<FieldTemplate>,
}

impl Model {
    /// Templates for the given group.
    pub fn group(&self, group: ParamGroup) -> &[FieldTemplate] {
        match group {
            ParamGroup::QueryParams => &self.query_params,
            ParamGroup::Headers => &self.headers,
            ParamGroup::Body => &self.body,
        }
    }

    /// Derives the store lookup key: path and method joined by `:`.
    ///
    /// Unique because `(path, method)` is the domain's partition key.
    pub fn storage_key(&self) -> String {
        storage_key(&self.path, self.method)
    }

    /// Checks the structural invariants of the model and every template.
    pub fn validate(&self) -> Result<()> {
        if self.path.is_empty() || self.path.len() > 255 {
            return Err(RegistryError::InvalidModel(
                "path must be 1..=255 characters".to_string(),
            ));
        }
        for group in ParamGroup::ALL {
            for template in self.group(group) {
                template.validate()?;
            }
        }
        Ok(())
    }
}

/// Derives the store lookup key for a `(path, method)` pair.
pub fn storage_key(path: &str, method: HttpMethod) -> String {
    format!("{path}:{method}")
}

/// Errors that can occur during registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The model violates a structural invariant and was never written.
    #[error("invalid model: {0}")]
    InvalidModel(String),

    /// The dual-write could not be made consistent.
    ///
    /// Both stores were restored to "model absent" as far as possible;
    /// callers should treat the state as not guaranteed consistent and
    /// re-register to converge.
    #[error("failed to register model {key}: dual write could not be completed")]
    RegistrationFailed {
        /// The storage key of the model that failed to register.
        key: String,
    },

    /// An unexpected store failure during a read. Never conflated with
    /// "model absent".
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// A stored record could not be decoded.
    #[error("corrupt record for key {key}: {source}")]
    CorruptRecord {
        /// The storage key of the unreadable record.
        key: String,
        /// The underlying decode failure.
        source: serde_json::Error,
    },
}

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
