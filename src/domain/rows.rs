//! Untyped request rows and per-cell coercion.
//!
//! Callers send rows as loose JSON objects. Every cell is treated as a
//! string | number | null union and validated explicitly at the
//! normalization boundary; nothing downstream touches raw cells.

use chrono::NaiveDate;
use serde_json::{Map, Value};

/// One untyped input observation: column name to string/number/null.
pub type RawRow = Map<String, Value>;

/// Timestamp format accepted by the service.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d";

/// JSON null marks a missing cell.
pub fn is_missing(value: &Value) -> bool {
    value.is_null()
}

/// Coerces a cell to a finite number.
///
/// Numbers pass through, strings are trimmed and parsed. Booleans, arrays
/// and objects are rejected, as are NaN and infinities (the table invariant
/// requires finite features).
pub fn coerce_numeric(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    number.is_finite().then_some(number)
}

/// Parses a timestamp cell as a calendar date (YYYY-MM-DD).
pub fn parse_timestamp(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::String(s) => NaiveDate::parse_from_str(s.trim(), TIMESTAMP_FORMAT).ok(),
        _ => None,
    }
}

/// Renders a cell for error messages without quoting surprises.
pub fn display_cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
