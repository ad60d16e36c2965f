//! Loose accessors over host-supplied JSON documents.
//!
//! Host documents are not strictly typed: numbers arrive as strings, empty
//! strings stand for "unset", and flags may be missing. These helpers
//! normalize all of that to `Option`s.

use serde_json::Value;

/// Non-empty string field.
pub fn str_field(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// First non-empty string among several candidate fields.
pub fn first_str_field(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| str_field(value, key))
}

/// Boolean flag; string `"true"` is accepted.
pub fn bool_field(value: &Value, key: &str) -> Option<bool> {
    match value.get(key)? {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.to_ascii_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Unsigned integer field; numeric strings are accepted, zero counts as unset.
pub fn u32_field(value: &Value, key: &str) -> Option<u32> {
    let parsed = match value.get(key)? {
        Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    };
    parsed.filter(|v| *v > 0)
}

/// Array field, empty when missing.
pub fn array_field<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Object field entries in document order, empty when missing.
pub fn object_entries<'a>(value: &'a Value, key: &str) -> Vec<(&'a String, &'a Value)> {
    value
        .get(key)
        .and_then(Value::as_object)
        .map(|map| map.iter().collect())
        .unwrap_or_default()
}

/// Scalar field rendered as text (strings verbatim, numbers and booleans printed).
pub fn scalar_text(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Entity-level data is split into tabs; missing tabs read as `Null`.
pub fn tab(tabs: &[Value], index: usize) -> &Value {
    static NULL: Value = Value::Null;
    tabs.get(index).unwrap_or(&NULL)
}
