//! Classification table lookup.
//!
//! Resolves a city-specific offense code to the first matching row of that
//! city's classification table. Numeric codes compare numerically (so the
//! string `"500"` matches a row holding `500` or `"500"`), everything else
//! compares case-insensitively.

use crime_harvest_crime_models::ClassificationRow;
use crime_harvest_crime_models::value::{as_number, is_truthy, parse_number, to_text};
use serde_json::Value;

/// A code value prepared for comparison against table rows.
#[derive(Debug, Clone, PartialEq)]
enum Code {
    Numeric(f64),
    Text(String),
}

impl Code {
    /// Prepares `code` for matching. Returns `None` for absent or falsy
    /// codes (null, `false`, `0`, empty or blank strings), which never
    /// match anything.
    fn from_value(code: &Value) -> Option<Self> {
        if !is_truthy(code) {
            return None;
        }
        match code {
            Value::Number(n) => n.as_f64().map(Self::Numeric),
            Value::Bool(_) => as_number(code).map(Self::Numeric),
            Value::String(s) => {
                if s.trim().is_empty() {
                    return None;
                }
                Some(
                    parse_number(s)
                        .map_or_else(|| Self::Text(s.to_uppercase()), Self::Numeric),
                )
            }
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    #[allow(clippy::float_cmp)]
    fn matches(&self, value: &Value) -> bool {
        match self {
            Self::Numeric(n) => as_number(value).is_some_and(|v| v == *n),
            Self::Text(upper) => to_text(value).is_some_and(|v| v.to_uppercase() == *upper),
        }
    }
}

/// Finds the classification row whose `field` matches `code`.
///
/// Rows are scanned in order and the **first** match wins; duplicate codes
/// later in the table are never consulted. Returns `None` when `code` is
/// absent or falsy, or when no row matches. Callers treat `None` as "all
/// classification flags false".
#[must_use]
pub fn lookup<'a>(
    rows: &'a [ClassificationRow],
    field: &str,
    code: Option<&Value>,
) -> Option<&'a ClassificationRow> {
    let code = Code::from_value(code?)?;
    rows.iter()
        .find(|row| row.get(field).is_some_and(|value| code.matches(value)))
}
