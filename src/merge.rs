//! Override-merge of a desired object onto a live one, and the JSON merge
//! patch (RFC 7386) that carries the difference.

use serde_json::{Map, Value};

/// `null`, `""`, `[]` and `{}` carry no desired value and never override.
pub fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Lays every non-empty field of `desired` over `existing`. Fields only
/// present in `existing` are kept. Objects merge recursively; arrays of equal
/// length merge element by element, otherwise the desired array wins.
pub fn overlay(existing: &Value, desired: &Value) -> Value {
    if is_empty(desired) {
        return existing.clone();
    }

    match (existing, desired) {
        (Value::Object(current), Value::Object(wanted)) => {
            let mut merged = current.clone();
            for (key, wanted_value) in wanted {
                match current.get(key) {
                    Some(current_value) => {
                        merged.insert(key.clone(), overlay(current_value, wanted_value));
                    }
                    None if !is_empty(wanted_value) => {
                        merged.insert(key.clone(), wanted_value.clone());
                    }
                    None => {}
                }
            }
            Value::Object(merged)
        }
        (Value::Array(current), Value::Array(wanted)) if current.len() == wanted.len() => {
            Value::Array(
                current
                    .iter()
                    .zip(wanted)
                    .map(|(c, w)| overlay(c, w))
                    .collect(),
            )
        }
        _ => desired.clone(),
    }
}

/// Merge patch turning `from` into `to`, or `None` when they are equal.
pub fn diff(from: &Value, to: &Value) -> Option<Value> {
    if from == to {
        return None;
    }

    match (from, to) {
        (Value::Object(before), Value::Object(after)) => {
            let mut patch = Map::new();
            for (key, after_value) in after {
                match before.get(key) {
                    Some(before_value) => {
                        if let Some(change) = diff(before_value, after_value) {
                            patch.insert(key.clone(), change);
                        }
                    }
                    None => {
                        patch.insert(key.clone(), after_value.clone());
                    }
                }
            }
            for key in before.keys() {
                if !after.contains_key(key) {
                    patch.insert(key.clone(), Value::Null);
                }
            }
            if patch.is_empty() {
                None
            } else {
                Some(Value::Object(patch))
            }
        }
        _ => Some(to.clone()),
    }
}

/// Adds a resourceVersion precondition so the store rejects the patch if the
/// object changed since it was read.
pub fn pin_resource_version(patch: &mut Value, resource_version: Option<String>) {
    let (Some(version), Value::Object(fields)) = (resource_version, patch) else {
        return;
    };
    let metadata = fields
        .entry("metadata")
        .or_insert_with(|| Value::Object(Map::new()));
    if let Value::Object(metadata) = metadata {
        metadata.insert("resourceVersion".to_string(), Value::String(version));
    }
}
