//! Loose comparisons over untyped JSON values.
//!
//! Classification tables arrive as CSV text while feed records carry a mix
//! of JSON strings, numbers, and booleans. Numbers and numeric strings are
//! interchangeable here, and emptiness or zero counts as "no value".

use serde_json::Value;

/// Parses `s` as a finite number after trimming surrounding whitespace.
///
/// Returns `None` for empty strings and for text such as `"NaN"` or `"inf"`
/// that Rust accepts but which is not a usable code.
#[must_use]
pub fn parse_number(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Returns the numeric interpretation of a JSON value, if it has one.
///
/// Numbers map to themselves, numeric strings are parsed, and booleans map
/// to `1`/`0`. Null, arrays, and objects have no numeric value.
#[must_use]
pub fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_number(s),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Returns `true` if `value` loosely equals the number `n`.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn loose_eq_number(value: &Value, n: f64) -> bool {
    as_number(value).is_some_and(|v| v == n)
}

/// Renders a scalar JSON value as text.
///
/// Whole numbers are rendered without a fractional part (`500`, not
/// `500.0`). Null and compound values have no text form.
#[must_use]
pub fn to_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i.to_string())
            } else {
                n.as_f64().map(format_number)
            }
        }
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Formats a number without a trailing `.0` for whole values.
#[must_use]
#[allow(clippy::float_cmp, clippy::cast_possible_truncation)]
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 9.0e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// Returns the truthiness of a value: `null`, `false`, `0`, `NaN`, and the
/// empty string are falsy, everything else (including the string `"0"`) is
/// truthy.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
