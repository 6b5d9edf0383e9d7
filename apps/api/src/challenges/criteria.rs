use serde_json::Value;
use thiserror::Error;

/// Why a challenge's criteria could not be read. Never leaves the engine:
/// the affected checker becomes a no-op for that run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CriteriaError {
    #[error("criteria is not a key/value map")]
    NotAMap,

    #[error("criteria key '{0}' is null")]
    Null(String),

    #[error("criteria key '{key}' is not an integer: {value}")]
    NotAnInteger { key: String, value: String },

    #[error("criteria key '{key}' is negative: {value}")]
    Negative { key: String, value: i64 },
}

/// Reads `key` from a criteria map as a non-negative integer target.
///
/// A missing key yields `default`. Accepted encodings mirror a plain integer
/// cast: JSON integers, floats (truncated toward zero), booleans (1/0) and
/// integer strings with surrounding whitespace.
pub fn integer_target(criteria: &Value, key: &str, default: i64) -> Result<i64, CriteriaError> {
    let map = match criteria {
        Value::Object(map) => map,
        // an absent criteria column is the same as an empty map
        Value::Null => return Ok(default),
        _ => return Err(CriteriaError::NotAMap),
    };

    let value = match map.get(key) {
        None => return Ok(default),
        Some(v) => v,
    };

    let parsed = match value {
        Value::Null => return Err(CriteriaError::Null(key.to_string())),
        Value::Bool(b) => i64::from(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => i,
            None => n
                .as_f64()
                .filter(|f| f.is_finite() && f.abs() < i64::MAX as f64)
                .map(|f| f.trunc() as i64)
                .ok_or_else(|| not_an_integer(key, value))?,
        },
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| not_an_integer(key, value))?,
        Value::Array(_) | Value::Object(_) => return Err(not_an_integer(key, value)),
    };

    if parsed < 0 {
        return Err(CriteriaError::Negative {
            key: key.to_string(),
            value: parsed,
        });
    }
    Ok(parsed)
}

fn not_an_integer(key: &str, value: &Value) -> CriteriaError {
    CriteriaError::NotAnInteger {
        key: key.to_string(),
        value: value.to_string(),
    }
}
