//! Helpers for evaluating queries against JSON documents
//!
//! Used by backends that filter and sort in process. Ordering across types
//! follows the document store: missing/null < numbers < strings < objects <
//! arrays < booleans.

use serde_json::{Map, Value};
use std::cmp::Ordering;

/// Resolve a dot-separated path (`nutrition.fat`) inside a document
pub fn lookup_path<'a>(doc: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(doc, |current, segment| current.as_object()?.get(segment))
}

/// Copy the value at `path` from `source` into `target`, creating
/// intermediate objects as needed. Missing paths are skipped.
pub fn copy_path(source: &Value, target: &mut Map<String, Value>, path: &str) {
    let Some(value) = lookup_path(source, path) else {
        return;
    };

    let mut segments = path.split('.').peekable();
    let mut current = target;
    while let Some(segment) = segments.next() {
        if segments.peek().is_none() {
            current.insert(segment.to_string(), value.clone());
            return;
        }
        let entry = current
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        let Value::Object(next) = entry else {
            return;
        };
        current = next;
    }
}

fn type_rank(value: Option<&Value>) -> u8 {
    match value {
        None | Some(Value::Null) => 0,
        Some(Value::Number(_)) => 1,
        Some(Value::String(_)) => 2,
        Some(Value::Object(_)) => 3,
        Some(Value::Array(_)) => 4,
        Some(Value::Bool(_)) => 5,
    }
}

/// Total order over optional JSON values
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.total_cmp(&y)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(Value::Array(x)), Some(Value::Array(y))) => {
            for (left, right) in x.iter().zip(y.iter()) {
                let ord = compare_values(Some(left), Some(right));
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            x.len().cmp(&y.len())
        }
        // Objects compare by their serialized form; good enough for a stable order
        (Some(x @ Value::Object(_)), Some(y @ Value::Object(_))) => {
            x.to_string().cmp(&y.to_string())
        }
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

/// Equality between a stored value and a raw query string
///
/// Numbers compare numerically (`"10"` equals `10.0`), booleans by their
/// literal, strings exactly.
pub fn loose_eq(value: &Value, raw: &str) -> bool {
    match value {
        Value::String(s) => s == raw,
        Value::Number(n) => match (n.as_f64(), raw.trim().parse::<f64>()) {
            (Some(left), Ok(right)) => left == right,
            _ => false,
        },
        Value::Bool(b) => raw == if *b { "true" } else { "false" },
        Value::Null => raw == "null",
        Value::Array(items) => items.iter().any(|item| loose_eq(item, raw)),
        Value::Object(_) => false,
    }
}

/// Ordering between a stored value and a raw query string, if comparable
///
/// A raw string that reads as a number is a numeric operand and only orders
/// against numbers; text fields never match it.
pub fn loose_cmp(value: &Value, raw: &str) -> Option<Ordering> {
    let numeric = raw.trim().parse::<f64>().ok().filter(|f| f.is_finite());
    match value {
        Value::Number(n) => n.as_f64()?.partial_cmp(&numeric?),
        Value::String(s) if numeric.is_none() => Some(s.as_str().cmp(raw)),
        _ => None,
    }
}
