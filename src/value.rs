//! Value comparison and coercion rules shared by the condition evaluator,
//! the sorter, and the aggregates.
//!
//! All functions here are total: they never fail on missing fields or on
//! operands of unexpected types.

use std::cmp::Ordering;

use serde_json::Value;

/// Read a field from a record.
///
/// Missing fields (and non-object records) read as `Value::Null`, so a
/// condition over an absent field simply does not match.
#[inline]
pub fn get_field(record: &Value, field: &str) -> Value {
    record.get(field).cloned().unwrap_or(Value::Null)
}

/// Coerce a value to a number.
///
/// Numbers convert directly; strings convert when they parse as a number.
/// Everything else (null, bool, array, object) yields None.
#[inline]
pub fn to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Compare two values for loose equality.
///
/// Numbers compare by their f64 value, and a number equals a numeric string
/// with the same value (`1` equals `"1"`). All other combinations use strict
/// equality.
#[inline]
pub fn loose_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(_), Value::Number(_))
        | (Value::Number(_), Value::String(_))
        | (Value::String(_), Value::Number(_)) => match (to_f64(left), to_f64(right)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        },
        _ => left == right,
    }
}

/// Compare two values for ordering, if they are comparable.
///
/// Values compare numerically when both coerce to a number (numeric strings
/// included), and lexicographically when both are strings. Any other pairing
/// is not comparable and yields None, which an ordering condition treats as
/// "does not match".
#[inline]
pub fn try_compare(left: &Value, right: &Value) -> Option<Ordering> {
    if let (Some(a), Some(b)) = (to_f64(left), to_f64(right)) {
        return a.partial_cmp(&b);
    }
    match (left, right) {
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

/// Compare two values for sorting.
///
/// Unlike [`try_compare`] this is a total order over all value types:
/// Null < Bool < Number < String, with unsupported pairings treated as equal
/// so a stable sort leaves them in their original order.
#[inline]
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (Value::Number(a), Value::Number(b)) => {
            let a = a.as_f64().unwrap_or(0.0);
            let b = b.as_f64().unwrap_or(0.0);
            a.partial_cmp(&b).unwrap_or(Ordering::Equal)
        }
        (Value::Number(_), Value::String(_)) | (Value::String(_), Value::Number(_)) => {
            try_compare(a, b).unwrap_or(Ordering::Equal)
        }
        (Value::String(a), Value::String(b)) => a.cmp(b),
        _ => Ordering::Equal,
    }
}

/// Render a value as the string a substring match runs against.
///
/// Null renders as the empty string; scalars render without JSON quoting.
#[inline]
pub fn to_match_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Whether a value counts as "empty" for filtering composition.
///
/// Empty means null, an empty string, or an empty array.
#[inline]
pub fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        _ => false,
    }
}
