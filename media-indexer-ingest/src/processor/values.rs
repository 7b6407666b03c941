//! Helpers for pulling fields out of operator results.

use serde_json::{json, Value};

use crate::errors::FlattenError;
use media_indexer_shared::Document;

/// Placeholder for absent optional fields.
///
/// Writing an empty string instead of omitting the field keeps field types
/// stable across documents in the same index.
pub(crate) fn empty() -> Value {
    Value::String(String::new())
}

/// Parse an operator result blob.
pub(crate) fn parse_blob(blob: &str) -> Result<Value, FlattenError> {
    Ok(serde_json::from_str(blob)?)
}

/// Treat a blob as a list of pages; a non-list blob is a single page.
pub(crate) fn pages(blob: Value) -> Vec<Value> {
    match blob {
        Value::Array(pages) => pages,
        page => vec![page],
    }
}

/// Take the array stored under `key` out of a page.
///
/// Pages without the key (or whose value is not a list) contribute nothing.
pub(crate) fn take_items(page: &mut Value, key: &str) -> Vec<Value> {
    match page.get_mut(key).map(Value::take) {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    }
}

/// Borrow a required field.
pub(crate) fn require<'a>(object: &'a Document, key: &str) -> Result<&'a Value, FlattenError> {
    object.get(key).ok_or_else(|| FlattenError::missing(key))
}

/// Borrow a required field of a nested value.
pub(crate) fn require_in<'a>(value: &'a Value, key: &str) -> Result<&'a Value, FlattenError> {
    value.get(key).ok_or_else(|| FlattenError::missing(key))
}

/// Remove a required field.
pub(crate) fn take(object: &mut Document, key: &str) -> Result<Value, FlattenError> {
    object.remove(key).ok_or_else(|| FlattenError::missing(key))
}

/// Borrow a value as an object.
pub(crate) fn as_object<'a>(value: &'a Value, field: &str) -> Result<&'a Document, FlattenError> {
    value
        .as_object()
        .ok_or_else(|| FlattenError::unexpected_type(field, "an object"))
}

/// Convert an owned value into an object.
pub(crate) fn into_object(value: Value, field: &str) -> Result<Document, FlattenError> {
    match value {
        Value::Object(object) => Ok(object),
        _ => Err(FlattenError::unexpected_type(field, "an object")),
    }
}

/// Read a number, accepting numeric strings.
pub(crate) fn to_f64(value: &Value, field: &str) -> Result<f64, FlattenError> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .ok_or_else(|| FlattenError::unexpected_type(field, "a number"))
}

/// Render a float the way the rest of the pipeline expects decimal strings:
/// shortest round-trip digits, always with a fractional part.
pub(crate) fn format_float(value: f64) -> String {
    let rendered = value.to_string();
    if value.is_finite() && !rendered.contains(['.', 'e', 'E']) {
        format!("{}.0", rendered)
    } else {
        rendered
    }
}

/// Multiply by `factor` and render as a decimal string.
pub(crate) fn scaled_string(value: &Value, field: &str, factor: f64) -> Result<String, FlattenError> {
    Ok(format_float(to_f64(value, field)? * factor))
}

/// Confidence in `[0, 1]` rendered as a percentage string.
pub(crate) fn percent_string(value: &Value, field: &str) -> Result<String, FlattenError> {
    scaled_string(value, field, 100.0)
}

/// Seconds rendered as a milliseconds string.
pub(crate) fn millis_string(value: &Value, field: &str) -> Result<String, FlattenError> {
    scaled_string(value, field, 1000.0)
}

/// Multiply by `factor`, keeping the result numeric.
pub(crate) fn scaled_number(value: &Value, field: &str, factor: f64) -> Result<Value, FlattenError> {
    Ok(json!(to_f64(value, field)? * factor))
}

/// Move `from` to `to`, failing when `from` is absent.
pub(crate) fn rename(object: &mut Document, from: &str, to: &str) -> Result<(), FlattenError> {
    let value = take(object, from)?;
    object.insert(to.to_string(), value);
    Ok(())
}
