//! # Type Predicate Set
//!
//! Pure functions answering "does value V satisfy primitive type T?" for
//! the closed [`FieldType`] vocabulary. Dispatch is a closed match; the
//! vocabulary is enumerated, never extended dynamically.
//!
//! Deliberate strictness: `Int` accepts only native numbers with no
//! fractional part. A digit string like `"5"` does not pass, matching the
//! reference behavior.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use uuid::{Uuid, Variant};

use apiguard_registry::FieldType;

/// Local part allows common unreserved/special characters; domain is
/// dot-separated labels of alphanumerics/hyphens.
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("email pattern is valid")
});

/// True if `value` satisfies `ty`.
pub fn matches(ty: FieldType, value: &Value) -> bool {
    match ty {
        FieldType::String => is_string(value),
        FieldType::Boolean => is_boolean(value),
        FieldType::Int => is_int(value),
        FieldType::List => is_list(value),
        FieldType::Uuid => is_uuid(value),
        FieldType::Email => is_email(value),
        FieldType::Date => is_date(value),
        FieldType::AuthToken => is_auth_token(value),
    }
}

/// The value's runtime type is string.
pub fn is_string(value: &Value) -> bool {
    value.is_string()
}

/// The value's runtime type is boolean.
pub fn is_boolean(value: &Value) -> bool {
    value.is_boolean()
}

/// The value is a native number with no fractional part. `5` and `5.0`
/// qualify; numeric-looking strings and fractional numbers do not.
pub fn is_int(value: &Value) -> bool {
    if value.is_i64() || value.is_u64() {
        return true;
    }
    value.as_f64().is_some_and(|f| f.fract() == 0.0)
}

/// The value is an ordered sequence.
pub fn is_list(value: &Value) -> bool {
    value.is_array()
}

/// The value is a string in canonical hyphenated UUID form
/// (8-4-4-4-12 hex) with a version nibble of 1..=5 and an RFC 4122
/// variant. The nil UUID is accepted.
pub fn is_uuid(value: &Value) -> bool {
    let Some(s) = value.as_str() else {
        return false;
    };
    // Uuid::try_parse also accepts un-hyphenated and URN forms; the wire
    // contract is the 36-character canonical form only.
    if s.len() != 36 {
        return false;
    }
    match Uuid::try_parse(s) {
        Ok(uuid) => {
            uuid.is_nil()
                || ((1..=5).contains(&uuid.get_version_num())
                    && uuid.get_variant() == Variant::RFC4122)
        }
        Err(_) => false,
    }
}

/// The value is a string matching a standard `local@domain` pattern.
pub fn is_email(value: &Value) -> bool {
    value.as_str().is_some_and(|s| EMAIL_RE.is_match(s))
}

/// The value is a string of exactly 10 characters in `dd-mm-yyyy` form
/// naming a real calendar date with canonical zero padding.
///
/// Validity is a round trip: the parsed day/month/year, re-formatted with
/// 2-digit padding, must reproduce the input exactly. `"32-01-2020"` and
/// `"1-01-2020"` both fail.
pub fn is_date(value: &Value) -> bool {
    let Some(s) = value.as_str() else {
        return false;
    };
    if s.len() != 10 {
        return false;
    }
    match NaiveDate::parse_from_str(s, "%d-%m-%Y") {
        Ok(date) => date.format("%d-%m-%Y").to_string() == s,
        Err(_) => false,
    }
}

/// The value is a string starting with the literal prefix `"Bearer "`.
pub fn is_auth_token(value: &Value) -> bool {
    value.as_str().is_some_and(|s| s.starts_with("Bearer "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_string_predicate() {
        assert!(is_string(&json!("hello")));
        assert!(!is_string(&json!(5)));
        assert!(!is_string(&json!(null)));
    }

    #[test]
    fn test_boolean_predicate() {
        assert!(is_boolean(&json!(true)));
        assert!(is_boolean(&json!(false)));
        assert!(!is_boolean(&json!("true")));
        assert!(!is_boolean(&json!(0)));
    }

    #[test]
    fn test_int_rejects_numeric_strings() {
        assert!(is_int(&json!(5)));
        assert!(is_int(&json!(-17)));
        assert!(is_int(&json!(0)));
        // Preserved strictness: a digit string is not an Int.
        assert!(!is_int(&json!("5")));
        assert!(!is_int(&json!(5.5)));
    }

    #[test]
    fn test_int_accepts_integral_floats() {
        assert!(is_int(&json!(5.0)));
        assert!(is_int(&json!(-3.0)));
        assert!(is_int(&json!(0.0)));
        assert!(!is_int(&json!(0.1)));
    }

    #[test]
    fn test_list_predicate() {
        assert!(is_list(&json!([1, 2, 3])));
        assert!(is_list(&json!([])));
        assert!(!is_list(&json!({"a": 1})));
        assert!(!is_list(&json!("[]")));
    }

    #[test]
    fn test_uuid_accepts_canonical_form() {
        assert!(is_uuid(&json!("6ec0bd7f-11c0-43da-975e-2a8ad9ebae0b")));
        // Nil UUID is explicitly valid.
        assert!(is_uuid(&json!("00000000-0000-0000-0000-000000000000")));
    }

    #[test]
    fn test_uuid_rejects_malformed_forms() {
        assert!(!is_uuid(&json!("6ec0bd7f11c0_43da!975e@2a8ad9ebae0b")));
        // Valid hex but not hyphenated.
        assert!(!is_uuid(&json!("6ec0bd7f11c043da975e2a8ad9ebae0b")));
        assert!(!is_uuid(&json!("d9b96787786b")));
        assert!(!is_uuid(&json!(42)));
    }

    #[test]
    fn test_uuid_rejects_versions_above_five() {
        // Well-formed v7 and v8 layouts; the version nibble must be 1..=5.
        assert!(!is_uuid(&json!("017f22e2-79b0-7cc3-98c4-dc0c0c07398f")));
        assert!(!is_uuid(&json!("320c3d4d-cc00-875b-8ec9-32d5f69181c0")));
        // The same layout with a v4 nibble passes.
        assert!(is_uuid(&json!("017f22e2-79b0-4cc3-98c4-dc0c0c07398f")));
    }

    #[test]
    fn test_email_predicate() {
        assert!(is_email(&json!("foo@bar.com")));
        assert!(is_email(&json!("john.doe+tag@mail.example.org")));
        assert!(!is_email(&json!("foo@@bar.com")));
        assert!(!is_email(&json!("@bar.com")));
        assert!(!is_email(&json!("@@doe.test")));
        assert!(!is_email(&json!(7)));
    }

    #[test]
    fn test_date_accepts_canonical_dd_mm_yyyy() {
        assert!(is_date(&json!("31-07-2023")));
        assert!(is_date(&json!("01-01-2000")));
        assert!(is_date(&json!("29-02-2020"))); // leap day
    }

    #[test]
    fn test_date_rejects_invalid_and_non_canonical() {
        assert!(!is_date(&json!("32-07-2023"))); // no 32nd day
        assert!(!is_date(&json!("29-02-2021"))); // not a leap year
        assert!(!is_date(&json!("31_07-2023")));
        assert!(!is_date(&json!("31_07_2023")));
        assert!(!is_date(&json!("3i_o7_20Q3")));
        assert!(!is_date(&json!("01-21-1980"))); // month 21
        assert!(!is_date(&json!("1-01-2020"))); // not 10 chars
        assert!(!is_date(&json!("2023-07-31"))); // wrong field order
        assert!(!is_date(&json!(20230731)));
    }

    #[test]
    fn test_auth_token_predicate() {
        assert!(is_auth_token(&json!("Bearer ebb3cbbe938c4776bd22a4ec2ea8b2ca")));
        assert!(!is_auth_token(&json!("Bearerebb3cbbe938c4776bd22a4ec2ea8b2ca")));
        assert!(!is_auth_token(&json!("bearer abc")));
        assert!(!is_auth_token(&json!(true)));
    }

    #[test]
    fn test_dispatch_covers_every_tag() {
        let cases = [
            (FieldType::String, json!("s")),
            (FieldType::Boolean, json!(true)),
            (FieldType::Int, json!(1)),
            (FieldType::List, json!([])),
            (FieldType::Uuid, json!("6ec0bd7f-11c0-43da-975e-2a8ad9ebae0b")),
            (FieldType::Email, json!("a@b.co")),
            (FieldType::Date, json!("31-07-2023")),
            (FieldType::AuthToken, json!("Bearer x")),
        ];
        for (ty, value) in cases {
            assert!(matches(ty, &value), "{ty} should accept {value}");
            assert!(!matches(ty, &json!({})), "{ty} should reject an object");
        }
    }
}
