//! Request and report types for the validator.
//!
//! Wire names (`isAbnormal`, `abnormalFields`, group-prefixed field keys)
//! match the registration service's JSON contract.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use apiguard_registry::{HttpMethod, ParamGroup};

/// One observed field from an incoming request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestField {
    /// Field name, as submitted.
    pub name: String,

    /// Submitted value; any JSON shape.
    pub value: Value,
}

/// A concrete incoming request to validate: the endpoint key plus the three
/// parameter groups, each an ordered list of observed fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomingRequest {
    /// Endpoint path.
    pub path: String,

    /// Endpoint method.
    pub method: HttpMethod,

    /// Observed URL query parameters.
    pub query_params: Vec<RequestField>,

    /// Observed HTTP headers.
    pub headers: Vec<RequestField>,

    /// Observed body fields.
    pub body: Vec<RequestField>,
}

impl IncomingRequest {
    /// Observed fields for the given group.
    pub fn group(&self, group: ParamGroup) -> &[RequestField] {
        match group {
            ParamGroup::QueryParams => &self.query_params,
            ParamGroup::Headers => &self.headers,
            ParamGroup::Body => &self.body,
        }
    }
}

/// The kind of deviation detected for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbnormalityKind {
    /// The request carried a field no template describes.
    TemplateMissing,

    /// The field's value satisfied none of its template's declared types.
    TypeMismatch,

    /// A required field never appeared in the request.
    RequiredMissing,
}

/// A single detected deviation between a request and its model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Abnormality {
    /// Classification of the deviation.
    #[serde(rename = "type")]
    pub kind: AbnormalityKind,

    /// Human-readable description naming the field (and, for type
    /// mismatches, every declared type in declaration order).
    pub description: String,
}

/// The structured outcome of validating one request.
///
/// Abnormality is data, not a fault: a report with `is_abnormal == true` is
/// still a successful validation. Keys of `abnormal_fields` are prefixed
/// with the group name (`"body:order_id"`) so identically named fields in
/// different groups never collide; reasons for a key accumulate as an
/// ordered list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    /// True if any anomaly was recorded in any group.
    pub is_abnormal: bool,

    /// `"group:field"` → ordered reasons.
    pub abnormal_fields: HashMap<String, Vec<Abnormality>>,
}

impl ValidationReport {
    /// An empty, non-abnormal report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one reason under `key`, appending to any reasons already
    /// held for it.
    pub fn record(&mut self, key: impl Into<String>, kind: AbnormalityKind, description: String) {
        self.is_abnormal = true;
        self.abnormal_fields
            .entry(key.into())
            .or_default()
            .push(Abnormality { kind, description });
    }

    /// Folds a per-group report into this one, prefixing each field key
    /// with the group name.
    pub fn merge_group(&mut self, group: ParamGroup, group_report: ValidationReport) {
        if !group_report.is_abnormal {
            return;
        }
        self.is_abnormal = true;
        for (field, reasons) in group_report.abnormal_fields {
            self.abnormal_fields
                .entry(format!("{group}:{field}"))
                .or_default()
                .extend(reasons);
        }
    }
}
