//! Lenient field readers over opaque JSON payloads.
//!
//! Every reader substitutes a default instead of failing: missing or mistyped
//! arrays read as empty, booleans as `false`, numbers and strings as `None`.

use serde_json::Value;

/// Read an array field. Anything but a JSON array reads as empty.
#[must_use]
pub fn array<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    value
        .get(key)
        .and_then(Value::as_array)
        .map_or(&[][..], Vec::as_slice)
}

/// Read a boolean field. Anything but `true` reads as `false`.
#[must_use]
pub fn flag(value: &Value, key: &str) -> bool {
    value.get(key).and_then(Value::as_bool).unwrap_or(false)
}

/// Read a numeric field.
#[must_use]
pub fn number(value: &Value, key: &str) -> Option<f64> {
    value.get(key).and_then(Value::as_f64)
}

/// Read a textual field. Numbers are rendered as text; empty strings read as `None`.
#[must_use]
pub fn text(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Read an array of strings, skipping non-string elements.
#[must_use]
pub fn string_list(value: &Value, key: &str) -> Vec<String> {
    array(value, key)
        .iter()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect()
}

/// Name of a list entry that is either a bare string or an object with `name`.
#[must_use]
pub fn entry_name(item: &Value) -> Option<String> {
    match item {
        Value::String(s) => Some(s.clone()),
        Value::Object(_) => text(item, "name"),
        _ => None,
    }
}
