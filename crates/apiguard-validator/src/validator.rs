//! # Request Validator
//!
//! Runs the per-field matching algorithm: one linear pass over each
//! parameter group of an incoming request against the model's pre-built
//! schema index, producing a [`ValidationReport`].
//!
//! ## Algorithm (per group)
//!
//! 1. Mint a fresh all-`false` seen map for the group's required fields.
//! 2. Scan the request's fields in input order:
//!    - no template for the name → record `template_missing`, skip the
//!      unit (no type check is possible without a template);
//!    - template is required → flip its seen flag;
//!    - value satisfies none of the declared types → record
//!      `type_mismatch` naming every declared type in order.
//! 3. Sweep the seen map: any required field still unseen gets a
//!    `required_missing` entry. This rides the same pass's bookkeeping, so
//!    missing-field detection costs no second scan of the request.
//! 4. Fold the group report into the overall one under `"group:"`-prefixed
//!    keys.
//!
//! The seen map lives on the stack of one `validate` call. Concurrent
//! validations against the same cached index never share flag state.

use apiguard_registry::{GroupIndex, ModelRecord, ParamGroup};

use crate::models::{AbnormalityKind, IncomingRequest, RequestField, ValidationReport};
use crate::predicates;

/// Stateless validator; one instance serves any number of concurrent calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestValidator;

impl RequestValidator {
    /// Creates a validator.
    pub fn new() -> Self {
        RequestValidator
    }

    /// Validates a request against an indexed model.
    ///
    /// Never fails on data shape: a mismatched value is an anomaly in the
    /// report, not an error.
    pub fn validate(&self, request: &IncomingRequest, record: &ModelRecord) -> ValidationReport {
        let mut report = ValidationReport::new();
        for group in ParamGroup::ALL {
            let group_report =
                self.validate_group(request.group(group), record.index.group(group));
            report.merge_group(group, group_report);
        }
        report
    }

    fn validate_group(&self, fields: &[RequestField], index: &GroupIndex) -> ValidationReport {
        let mut report = ValidationReport::new();
        // Request-scoped working state; the index itself is never mutated.
        let mut seen = index.seen_flags();

        for field in fields {
            let Some(template) = index.template(&field.name) else {
                report.record(
                    field.name.clone(),
                    AbnormalityKind::TemplateMissing,
                    format!("Field {} missing validation template", field.name),
                );
                continue;
            };

            if template.required {
                seen.insert(template.name.as_str(), true);
            }

            let satisfied = template
                .types
                .iter()
                .any(|ty| predicates::matches(*ty, &field.value));
            if !satisfied {
                let allowed = template
                    .types
                    .iter()
                    .map(|ty| ty.as_str())
                    .collect::<Vec<_>>()
                    .join(",");
                report.record(
                    field.name.clone(),
                    AbnormalityKind::TypeMismatch,
                    format!("Field {} must be of type[s] {}", field.name, allowed),
                );
            }
        }

        for name in index.required_fields() {
            if !seen[name.as_str()] {
                report.record(
                    name.clone(),
                    AbnormalityKind::RequiredMissing,
                    format!("Required field {name} is missing"),
                );
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apiguard_registry::{FieldTemplate, FieldType, HttpMethod, Model};
    use serde_json::{json, Value};

    fn template(name: &str, required: bool, types: Vec<FieldType>) -> FieldTemplate {
        FieldTemplate {
            name: name.to_string(),
            required,
            types,
        }
    }

    fn field(name: &str, value: Value) -> RequestField {
        RequestField {
            name: name.to_string(),
            value,
        }
    }

    fn orders_record() -> ModelRecord {
        ModelRecord::new(Model {
            path: "/orders/update".to_string(),
            method: HttpMethod::Patch,
            query_params: vec![],
            headers: vec![],
            body: vec![
                template("order_id", true, vec![FieldType::Int, FieldType::Uuid]),
                template("items", false, vec![FieldType::List]),
            ],
        })
    }

    fn orders_request(body: Vec<RequestField>) -> IncomingRequest {
        IncomingRequest {
            path: "/orders/update".to_string(),
            method: HttpMethod::Patch,
            query_params: vec![],
            headers: vec![],
            body,
        }
    }

    #[test]
    fn test_conforming_request_yields_clean_report() {
        let record = orders_record();
        let request = orders_request(vec![
            field("order_id", json!(8821)),
            field("items", json!(["sku-1", "sku-2"])),
        ]);

        let report = RequestValidator::new().validate(&request, &record);
        assert!(!report.is_abnormal);
        assert!(report.abnormal_fields.is_empty());
    }

    #[test]
    fn test_type_disjunction_accepts_any_declared_type() {
        let record = orders_record();

        // Int arm.
        let report = RequestValidator::new()
            .validate(&orders_request(vec![field("order_id", json!(7))]), &record);
        assert!(!report.is_abnormal);

        // UUID arm.
        let report = RequestValidator::new().validate(
            &orders_request(vec![field(
                "order_id",
                json!("6ec0bd7f-11c0-43da-975e-2a8ad9ebae0b"),
            )]),
            &record,
        );
        assert!(!report.is_abnormal);
    }

    #[test]
    fn test_type_mismatch_names_all_declared_types_in_order() {
        let record = orders_record();
        let request = orders_request(vec![field("order_id", json!("d9b96787786b"))]);

        let report = RequestValidator::new().validate(&request, &record);
        assert!(report.is_abnormal);

        let reasons = &report.abnormal_fields["body:order_id"];
        assert_eq!(reasons.len(), 1);
        assert_eq!(reasons[0].kind, AbnormalityKind::TypeMismatch);
        assert_eq!(
            reasons[0].description,
            "Field order_id must be of type[s] Int,UUID"
        );
    }

    #[test]
    fn test_unknown_field_skips_type_check() {
        let record = orders_record();
        // Value of a wildly wrong shape: only template_missing may appear,
        // since no template means no type check.
        let request = orders_request(vec![
            field("order_id", json!(1)),
            field("surprise", json!({"nested": true})),
        ]);

        let report = RequestValidator::new().validate(&request, &record);
        let reasons = &report.abnormal_fields["body:surprise"];
        assert_eq!(reasons.len(), 1);
        assert_eq!(reasons[0].kind, AbnormalityKind::TemplateMissing);
        assert_eq!(
            reasons[0].description,
            "Field surprise missing validation template"
        );
    }

    #[test]
    fn test_missing_required_field_reported_once() {
        let record = orders_record();
        let request = orders_request(vec![field("items", json!([1, 2]))]);

        let report = RequestValidator::new().validate(&request, &record);
        let reasons = &report.abnormal_fields["body:order_id"];
        assert_eq!(reasons.len(), 1);
        assert_eq!(reasons[0].kind, AbnormalityKind::RequiredMissing);
        assert_eq!(reasons[0].description, "Required field order_id is missing");
    }

    #[test]
    fn test_spec_scenario_items_mismatch_and_order_id_missing() {
        let record = orders_record();
        let request = orders_request(vec![field("items", json!(55))]);

        let report = RequestValidator::new().validate(&request, &record);
        assert!(report.is_abnormal);
        assert_eq!(report.abnormal_fields.len(), 2);
        assert_eq!(
            report.abnormal_fields["body:items"][0].kind,
            AbnormalityKind::TypeMismatch
        );
        assert_eq!(
            report.abnormal_fields["body:order_id"][0].kind,
            AbnormalityKind::RequiredMissing
        );
    }

    #[test]
    fn test_same_name_in_different_groups_never_collides() {
        let record = ModelRecord::new(Model {
            path: "/x".to_string(),
            method: HttpMethod::Post,
            query_params: vec![template("id", false, vec![FieldType::Int])],
            headers: vec![],
            body: vec![template("id", false, vec![FieldType::Uuid])],
        });

        let request = IncomingRequest {
            path: "/x".to_string(),
            method: HttpMethod::Post,
            query_params: vec![field("id", json!("not-an-int"))],
            headers: vec![],
            body: vec![field("id", json!("not-a-uuid"))],
        };

        let report = RequestValidator::new().validate(&request, &record);
        assert!(report.abnormal_fields.contains_key("query_params:id"));
        assert!(report.abnormal_fields.contains_key("body:id"));
    }

    #[test]
    fn test_repeated_field_accumulates_reasons_in_input_order() {
        let record = orders_record();
        let request = orders_request(vec![
            field("items", json!("first")),
            field("items", json!("second")),
        ]);

        let report = RequestValidator::new().validate(&request, &record);
        let reasons = &report.abnormal_fields["body:items"];
        assert_eq!(reasons.len(), 2);
        assert!(reasons
            .iter()
            .all(|r| r.kind == AbnormalityKind::TypeMismatch));
    }

    #[test]
    fn test_required_seen_via_any_occurrence() {
        // A required field submitted with a bad value is present, not
        // missing: only the type mismatch is reported.
        let record = orders_record();
        let request = orders_request(vec![field("order_id", json!(true))]);

        let report = RequestValidator::new().validate(&request, &record);
        let reasons = &report.abnormal_fields["body:order_id"];
        assert_eq!(reasons.len(), 1);
        assert_eq!(reasons[0].kind, AbnormalityKind::TypeMismatch);
    }

    #[test]
    fn test_consecutive_validations_reset_seen_flags() {
        let record = orders_record();
        let validator = RequestValidator::new();

        // First run sees order_id.
        let ok = validator.validate(
            &orders_request(vec![field("order_id", json!(1))]),
            &record,
        );
        assert!(!ok.is_abnormal);

        // Second run against the same record must not inherit the flag.
        let missing = validator.validate(&orders_request(vec![]), &record);
        assert_eq!(
            missing.abnormal_fields["body:order_id"][0].kind,
            AbnormalityKind::RequiredMissing
        );
    }

    #[test]
    fn test_empty_groups_on_empty_model_are_clean() {
        let record = ModelRecord::new(Model {
            path: "/ping".to_string(),
            method: HttpMethod::Get,
            query_params: vec![],
            headers: vec![],
            body: vec![],
        });
        let request = IncomingRequest {
            path: "/ping".to_string(),
            method: HttpMethod::Get,
            query_params: vec![],
            headers: vec![],
            body: vec![],
        };

        let report = RequestValidator::new().validate(&request, &record);
        assert!(!report.is_abnormal);
    }
}
