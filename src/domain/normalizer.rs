//! Int64 field normalization for `manager` results.
//!
//! Program run records carry timestamps that arrive as 64-bit values the
//! browser cannot represent natively. Each known field is rewritten to the
//! integer parsed from its string form, using the same lenient rules as a
//! JavaScript `parseInt(value, 10)`: leading whitespace and an optional
//! sign are accepted, parsing stops at the first non-digit, and a value
//! without any leading digit becomes NaN. NaN travels as JSON `null`.

use serde_json::{Number, Value};

use super::payload::{BackendResult, Record};

/// Record fields known to carry 64-bit values.
pub const INT64_FIELDS: [&str; 4] = ["lastStarted", "lastStopped", "startTime", "endTime"];

/// Rewrites the int64 fields of every record in a non-empty sequence.
///
/// In a mixed sequence only the object elements are touched. Any other
/// shape, including a raw undecoded document, passes through untouched.
pub fn normalize_int64_fields(result: &mut BackendResult) {
    match result {
        BackendResult::Records(records) => {
            for record in records.iter_mut() {
                normalize_record(record);
            }
        }
        BackendResult::Scalar(Value::Array(items)) => {
            for item in items.iter_mut() {
                if let Value::Object(record) = item {
                    normalize_record(record);
                }
            }
        }
        _ => {}
    }
}

fn normalize_record(record: &mut Record) {
    for field in INT64_FIELDS {
        if let Some(value) = record.get_mut(field) {
            *value = parse_int(&stringify(value));
        }
    }
}

/// String form of a JSON value, as the value's own `toString` would give.
fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(items) => items
            .iter()
            .map(stringify)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// Best-effort base-10 integer parse.
///
/// Values beyond the `i64` range fall back to a float, like the
/// browser's own number type. No digits at all yields `null`.
fn parse_int(text: &str) -> Value {
    let trimmed = text.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, trimmed.get(1..).unwrap_or_default()),
        Some(b'+') => (false, trimmed.get(1..).unwrap_or_default()),
        _ => (false, trimmed),
    };
    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    let Some(digits) = rest.get(..digits_len).filter(|d| !d.is_empty()) else {
        return Value::Null;
    };

    let signed = if negative {
        format!("-{digits}")
    } else {
        digits.to_string()
    };
    if let Ok(n) = signed.parse::<i64>() {
        return Value::Number(n.into());
    }
    signed
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map_or(Value::Null, Value::Number)
}
