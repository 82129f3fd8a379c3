//! Field readers that never fail: provider numbers arrive as strings, as JSON
//! numbers, as `"None"`, or not at all. Missing or unparseable input reads as
//! zero.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

pub(crate) fn value_as_f64(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|number| number.is_finite())
}

pub(crate) fn number_or_zero(fields: &Map<String, Value>, key: &str) -> f64 {
    fields.get(key).and_then(value_as_f64).unwrap_or(0.0)
}

/// Reads `"1.2345%"` style fields.
pub(crate) fn percent_or_zero(fields: &Map<String, Value>, key: &str) -> f64 {
    match fields.get(key) {
        Some(Value::String(text)) => text
            .trim()
            .trim_end_matches('%')
            .trim_end()
            .parse::<f64>()
            .ok()
            .filter(|number| number.is_finite())
            .unwrap_or(0.0),
        Some(other) => value_as_f64(other).unwrap_or(0.0),
        None => 0.0,
    }
}

pub(crate) fn volume_or_zero(fields: &Map<String, Value>, key: &str) -> u64 {
    let Some(value) = fields.get(key) else {
        return 0;
    };

    if let Some(whole) = match value {
        Value::Number(number) => number.as_u64(),
        Value::String(text) => text.trim().parse::<u64>().ok(),
        _ => None,
    } {
        return whole;
    }

    value_as_f64(value)
        .filter(|number| *number >= 0.0)
        .map(|number| number.trunc() as u64)
        .unwrap_or(0)
}

/// Returns the first present key's value as the provider's decimal string.
pub(crate) fn decimal_string(fields: &Map<String, Value>, keys: &[&str]) -> String {
    for key in keys {
        match fields.get(*key) {
            Some(Value::String(text)) if !text.trim().is_empty() => return text.clone(),
            Some(Value::Number(number)) => return number.to_string(),
            _ => {}
        }
    }
    String::from("0")
}

pub(crate) fn deserialize_lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_as_f64))
}
