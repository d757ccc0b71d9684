//! Helpers for records whose field names drift between endpoints

use serde_json::Value;

/// First of `names` present with a non-null value
pub(crate) fn field<'a>(record: &'a Value, names: &[&str]) -> Option<&'a Value> {
    names
        .iter()
        .find_map(|name| record.get(*name).filter(|v| !v.is_null()))
}

pub(crate) fn id(record: &Value, names: &[&str]) -> i64 {
    match field(record, names) {
        Some(Value::Number(n)) => n.as_i64().unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

/// Text form of a scalar; numbers are common for things like floor numbers
pub(crate) fn text(record: &Value, names: &[&str]) -> Option<String> {
    match field(record, names)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

pub(crate) fn flag(record: &Value, names: &[&str]) -> bool {
    field(record, names).is_some_and(crate::auth::claims::truthy)
}
