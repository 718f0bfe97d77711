//! Defensive field access on platform JSON payloads
//!
//! The platform only guarantees `data` (non-empty) and `options` (present).
//! Everything else is read through these helpers so a structurally different
//! payload degrades to "no value" instead of a panic.

use serde_json::Value;

/// Truthiness as the platform uses it: null, false, 0, "" and empty
/// containers all mean "absent"
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Returns true if `field` is present on `payload` and truthy
pub fn has_field(payload: &Value, field: &str) -> bool {
    payload.get(field).map_or(false, is_truthy)
}

/// Returns the array stored under `field`, or an empty slice
///
/// A truthy non-array value is logged and treated as empty.
pub fn items<'a>(payload: &'a Value, field: &str) -> &'a [Value] {
    match payload.get(field) {
        Some(Value::Array(values)) => values,
        Some(other) if is_truthy(other) => {
            tracing::warn!(
                "Expected an array under '{}', got {}; treating as empty",
                field,
                kind_of(other)
            );
            &[]
        }
        _ => &[],
    }
}

/// Reads an identifier or label: non-empty strings and numbers are accepted
pub fn text(value: &Value, field: &str) -> Option<String> {
    match value.get(field)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Reads `payload[outer][inner]` if it is truthy
pub fn nested<'a>(payload: &'a Value, outer: &str, inner: &str) -> Option<&'a Value> {
    payload
        .get(outer)
        .and_then(|v| v.get(inner))
        .filter(|v| is_truthy(v))
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
