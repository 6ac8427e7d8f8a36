//! Lenient field accessors over `serde_json::Value`.
//!
//! Optional fields fall back to a default when absent or `null`; required
//! fields produce a [`TokenkitError::MalformedResponse`] naming the shape and
//! the dotted path of the field.

use serde_json::Value;

use super::ResponseShape;
use crate::{Result, TokenkitError};

/// Joins a parent path and a key into a dotted field path.
pub(crate) fn field_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

/// Reads `key` as a string, falling back to `default` when absent or null.
///
/// Scalars of other types are rendered with their JSON text.
pub(crate) fn opt_string(obj: &Value, key: &str, default: &str) -> String {
    match obj.get(key) {
        None | Some(Value::Null) => default.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Reads `key` as a boolean, falling back to `default` when absent or not a bool.
pub(crate) fn opt_bool(obj: &Value, key: &str, default: bool) -> bool {
    obj.get(key).and_then(Value::as_bool).unwrap_or(default)
}

/// Returns the nested object at `key`, if it is present and an object.
pub(crate) fn opt_object<'a>(obj: &'a Value, key: &str) -> Option<&'a Value> {
    obj.get(key).filter(|v| v.is_object())
}

/// Reads a required string field.
pub(crate) fn required_string(
    obj: &Value,
    key: &str,
    shape: ResponseShape,
    parent: &str,
) -> Result<String> {
    match obj.get(key) {
        Some(Value::String(s)) => Ok(s.clone()),
        _ => Err(TokenkitError::malformed(shape, field_path(parent, key))),
    }
}

/// Reads a required nested object.
pub(crate) fn required_object<'a>(
    obj: &'a Value,
    key: &str,
    shape: ResponseShape,
    parent: &str,
) -> Result<&'a Value> {
    opt_object(obj, key).ok_or_else(|| TokenkitError::malformed(shape, field_path(parent, key)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_opt_string_defaults() {
        let obj = json!({ "a": "x", "b": null, "c": 42 });
        assert_eq!(opt_string(&obj, "a", ""), "x");
        assert_eq!(opt_string(&obj, "b", "fallback"), "fallback");
        assert_eq!(opt_string(&obj, "missing", "fallback"), "fallback");
        assert_eq!(opt_string(&obj, "c", ""), "42");
    }

    #[test]
    fn test_required_string_names_path() {
        let obj = json!({ "nonce": 7 });
        let err = required_string(&obj, "nonce", ResponseShape::Rest, "creditCards[0]")
            .unwrap_err();
        assert_eq!(
            err,
            TokenkitError::malformed(ResponseShape::Rest, "creditCards[0].nonce")
        );
    }

    #[test]
    fn test_required_object_rejects_scalars() {
        let obj = json!({ "details": "nope" });
        assert!(required_object(&obj, "details", ResponseShape::Plain, "").is_err());
        assert!(opt_object(&obj, "details").is_none());
    }
}
