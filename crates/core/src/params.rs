//! Helpers for reading field overrides out of a `serde_json::Value`.
//!
//! Each helper takes a JSON object, a key, and a default. Missing keys and
//! values of the wrong JSON type fall back to the default, so a partial
//! override object like `{"connect_distance": 90}` is always usable.

use std::ops::Range;

use serde_json::Value;

/// `params[name]` as f64; integers are accepted.
pub fn param_f64(params: &Value, name: &str, default: f64) -> f64 {
    params.get(name).and_then(Value::as_f64).unwrap_or(default)
}

/// `params[name]` as a non-negative integer.
pub fn param_usize(params: &Value, name: &str, default: usize) -> usize {
    params
        .get(name)
        .and_then(Value::as_u64)
        .and_then(|v| usize::try_from(v).ok())
        .unwrap_or(default)
}

pub fn param_string(params: &Value, name: &str, default: &str) -> String {
    params
        .get(name)
        .and_then(Value::as_str)
        .map(String::from)
        .unwrap_or_else(|| default.to_owned())
}

/// `params[name]` as a `[start, end]` pair of numbers.
///
/// Anything other than a two-element numeric array yields `default`. The
/// range is returned as written; ordering is checked by config validation.
pub fn param_range(params: &Value, name: &str, default: Range<f64>) -> Range<f64> {
    match params.get(name).and_then(Value::as_array).map(Vec::as_slice) {
        Some([start, end]) => match (start.as_f64(), end.as_f64()) {
            (Some(s), Some(e)) => s..e,
            _ => default,
        },
        _ => default,
    }
}
