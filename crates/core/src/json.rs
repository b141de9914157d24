//! Field-extraction helpers over `serde_json::Value`.
//!
//! Every helper follows the same defaulting contract: an absent key, a
//! JSON `null`, or a document that is not an object yields the supplied
//! default, while a present value of an incompatible JSON type yields a
//! [`DecodeError::WrongType`] naming the field and the structure being
//! decoded (`context`).

use serde_json::Value;

use crate::error::DecodeError;
use crate::types::EpochSecs;

/// Extract a string field, or `default` if the field is absent.
pub fn str_field(
    root: &Value,
    context: &'static str,
    key: &str,
    default: &str,
) -> Result<String, DecodeError> {
    match root.get(key) {
        None | Some(Value::Null) => Ok(default.to_string()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(wrong_type(context, key, "string")),
    }
}

/// Extract a signed 64-bit integer field, or `default` if absent.
pub fn i64_field(
    root: &Value,
    context: &'static str,
    key: &str,
    default: i64,
) -> Result<i64, DecodeError> {
    match root.get(key) {
        None | Some(Value::Null) => Ok(default),
        Some(v) => v.as_i64().ok_or_else(|| wrong_type(context, key, "integer")),
    }
}

/// Extract a signed 32-bit integer field, or `default` if absent.
///
/// Values outside the `i32` range count as a type mismatch.
pub fn i32_field(
    root: &Value,
    context: &'static str,
    key: &str,
    default: i32,
) -> Result<i32, DecodeError> {
    match root.get(key) {
        None | Some(Value::Null) => Ok(default),
        Some(v) => v
            .as_i64()
            .and_then(|n| i32::try_from(n).ok())
            .ok_or_else(|| wrong_type(context, key, "32-bit integer")),
    }
}

/// Extract a boolean field, or `default` if absent.
pub fn bool_field(
    root: &Value,
    context: &'static str,
    key: &str,
    default: bool,
) -> Result<bool, DecodeError> {
    match root.get(key) {
        None | Some(Value::Null) => Ok(default),
        Some(Value::Bool(b)) => Ok(*b),
        Some(_) => Err(wrong_type(context, key, "boolean")),
    }
}

/// Extract a nested object field. Absent or `null` yields `None`.
pub fn object<'a>(
    root: &'a Value,
    context: &'static str,
    key: &str,
) -> Result<Option<&'a Value>, DecodeError> {
    match root.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(v) if v.is_object() => Ok(Some(v)),
        Some(_) => Err(wrong_type(context, key, "object")),
    }
}

/// Extract a nested object field that the protocol requires to be present.
pub fn required_object<'a>(
    root: &'a Value,
    context: &'static str,
    key: &str,
) -> Result<&'a Value, DecodeError> {
    object(root, context, key)?.ok_or_else(|| DecodeError::MissingField {
        context,
        field: key.to_string(),
    })
}

/// Extract an array field. Absent or `null` yields an empty slice.
pub fn array<'a>(
    root: &'a Value,
    context: &'static str,
    key: &str,
) -> Result<&'a [Value], DecodeError> {
    match root.get(key) {
        None | Some(Value::Null) => Ok(&[]),
        Some(Value::Array(items)) => Ok(items.as_slice()),
        Some(_) => Err(wrong_type(context, key, "array")),
    }
}

/// Extract a date-valued field transmitted as an RFC 3339 UTC string and
/// convert it to epoch seconds.
///
/// An absent field or an empty string decodes to the unset sentinel `0`.
/// A non-empty string that does not parse is a hard error, matching the
/// wrong-type rule for every other field.
pub fn timestamp_field(
    root: &Value,
    context: &'static str,
    key: &str,
) -> Result<EpochSecs, DecodeError> {
    let raw = str_field(root, context, key, "")?;
    if raw.is_empty() {
        return Ok(0);
    }
    chrono::DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.timestamp())
        .map_err(|_| DecodeError::InvalidTimestamp {
            context,
            field: key.to_string(),
            value: raw,
        })
}

/// Extract a field transmitted as a JSON document *encoded in a string*
/// and parse it opportunistically.
///
/// Absent or empty yields `None`. A non-empty string that fails to parse
/// is logged and tolerated (`None`) rather than raised: these are
/// caller-supplied free-form payloads outside the protocol's control.
/// A present non-string value is still a type error.
pub fn embedded_json(
    root: &Value,
    context: &'static str,
    key: &str,
) -> Result<Option<Value>, DecodeError> {
    let raw = str_field(root, context, key, "")?;
    if raw.is_empty() {
        return Ok(None);
    }
    match serde_json::from_str(&raw) {
        Ok(parsed) => Ok(Some(parsed)),
        Err(e) => {
            tracing::warn!(
                context,
                field = key,
                error = %e,
                "Malformed embedded JSON payload, leaving field unset",
            );
            Ok(None)
        }
    }
}

fn wrong_type(context: &'static str, field: &str, expected: &'static str) -> DecodeError {
    DecodeError::WrongType {
        context,
        field: field.to_string(),
        expected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    // -- scalar defaulting ----------------------------------------------------

    #[test]
    fn absent_string_yields_default() {
        let doc = json!({});
        assert_eq!(str_field(&doc, "Test", "name", "").unwrap(), "");
        assert_eq!(str_field(&doc, "Test", "name", "x").unwrap(), "x");
    }

    #[test]
    fn null_counts_as_absent() {
        let doc = json!({"name": null, "key": null, "flag": null});
        assert_eq!(str_field(&doc, "Test", "name", "d").unwrap(), "d");
        assert_eq!(i64_field(&doc, "Test", "key", -1).unwrap(), -1);
        assert!(!bool_field(&doc, "Test", "flag", false).unwrap());
    }

    #[test]
    fn non_object_document_behaves_as_all_absent() {
        let doc = json!([1, 2, 3]);
        assert_eq!(i64_field(&doc, "Test", "key", -1).unwrap(), -1);
        assert!(array(&doc, "Test", "items").unwrap().is_empty());
        assert!(object(&doc, "Test", "nested").unwrap().is_none());
    }

    #[test]
    fn present_values_decode() {
        let doc = json!({"name": "a", "key": 7, "flag": true, "small": 12});
        assert_eq!(str_field(&doc, "Test", "name", "").unwrap(), "a");
        assert_eq!(i64_field(&doc, "Test", "key", -1).unwrap(), 7);
        assert!(bool_field(&doc, "Test", "flag", false).unwrap());
        assert_eq!(i32_field(&doc, "Test", "small", -1).unwrap(), 12);
    }

    // -- wrong-type errors ----------------------------------------------------

    #[test]
    fn wrong_primitive_type_is_an_error() {
        let doc = json!({"enabled": "yes", "key": "7", "name": 3});
        assert_matches!(
            bool_field(&doc, "Test", "enabled", false),
            Err(DecodeError::WrongType { field, .. }) if field == "enabled"
        );
        assert_matches!(
            i64_field(&doc, "Test", "key", -1),
            Err(DecodeError::WrongType { .. })
        );
        assert_matches!(
            str_field(&doc, "Test", "name", ""),
            Err(DecodeError::WrongType { .. })
        );
    }

    #[test]
    fn i32_overflow_is_a_type_error() {
        let doc = json!({"port": 5_000_000_000_i64});
        assert_matches!(
            i32_field(&doc, "Test", "port", -1),
            Err(DecodeError::WrongType { .. })
        );
    }

    #[test]
    fn float_where_integer_expected_is_an_error() {
        let doc = json!({"key": 1.5});
        assert_matches!(
            i64_field(&doc, "Test", "key", -1),
            Err(DecodeError::WrongType { .. })
        );
    }

    // -- object / array access ------------------------------------------------

    #[test]
    fn absent_array_yields_empty() {
        let doc = json!({});
        assert!(array(&doc, "Test", "items").unwrap().is_empty());
    }

    #[test]
    fn non_array_is_an_error() {
        let doc = json!({"items": "nope"});
        assert_matches!(
            array(&doc, "Test", "items"),
            Err(DecodeError::WrongType { .. })
        );
    }

    #[test]
    fn required_object_missing_is_an_error() {
        let doc = json!({});
        assert_matches!(
            required_object(&doc, "Test", "workspace"),
            Err(DecodeError::MissingField { field, .. }) if field == "workspace"
        );
    }

    #[test]
    fn required_object_present_decodes() {
        let doc = json!({"workspace": {"a": 1}});
        assert!(required_object(&doc, "Test", "workspace").is_ok());
    }

    // -- timestamps -----------------------------------------------------------

    #[test]
    fn timestamp_parses_rfc3339() {
        let doc = json!({"creationDate": "2024-05-01T12:00:00Z"});
        assert_eq!(
            timestamp_field(&doc, "Test", "creationDate").unwrap(),
            1_714_564_800
        );
    }

    #[test]
    fn timestamp_absent_or_empty_is_unset() {
        let doc = json!({"expirationDate": ""});
        assert_eq!(timestamp_field(&doc, "Test", "creationDate").unwrap(), 0);
        assert_eq!(timestamp_field(&doc, "Test", "expirationDate").unwrap(), 0);
    }

    #[test]
    fn timestamp_garbage_is_an_error() {
        let doc = json!({"creationDate": "yesterday"});
        assert_matches!(
            timestamp_field(&doc, "Test", "creationDate"),
            Err(DecodeError::InvalidTimestamp { value, .. }) if value == "yesterday"
        );
    }

    // -- embedded JSON-in-string ----------------------------------------------

    #[test]
    fn embedded_json_parses_valid_payload() {
        let doc = json!({"preferences": "{\"a\":1}"});
        let parsed = embedded_json(&doc, "Test", "preferences").unwrap().unwrap();
        assert_eq!(parsed, json!({"a": 1}));
    }

    #[test]
    fn embedded_json_empty_is_unset() {
        let doc = json!({"preferences": ""});
        assert!(embedded_json(&doc, "Test", "preferences").unwrap().is_none());
    }

    #[test]
    fn embedded_json_malformed_is_tolerated() {
        let doc = json!({"preferences": "{not json"});
        assert!(embedded_json(&doc, "Test", "preferences").unwrap().is_none());
    }

    #[test]
    fn embedded_json_non_string_is_an_error() {
        let doc = json!({"preferences": {"a": 1}});
        assert_matches!(
            embedded_json(&doc, "Test", "preferences"),
            Err(DecodeError::WrongType { .. })
        );
    }
}
