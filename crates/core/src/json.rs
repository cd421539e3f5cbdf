//! JSON bridge for host integration.
//!
//! Hosts hand subjects and argument bags in as JSON and render evaluation
//! output (including pending data requests) back out. The mapping is by
//! JSON shape: objects become maps, arrays become lists, integers stay
//! integers, every other number becomes a `Decimal`. Records are built
//! explicitly via [`record_from_json`] since JSON carries no type tags.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::json;

use crate::value::{Record, Value};

/// A JSON value that does not map onto the runtime value model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonError {
    pub message: String,
}

impl fmt::Display for JsonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unmappable JSON: {}", self.message)
    }
}

impl std::error::Error for JsonError {}

/// Convert host JSON into a runtime value.
pub fn value_from_json(v: &serde_json::Value) -> Result<Value, JsonError> {
    match v {
        serde_json::Value::Null => Ok(Value::Nil),
        serde_json::Value::Bool(b) => Ok(Value::Bool(*b)),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Int(i))
            } else {
                // u64 beyond i64::MAX, or a float. Decimal::from_str does
                // not take exponent notation, so fall back to from_scientific.
                let text = n.to_string();
                Decimal::from_str(&text)
                    .or_else(|_| Decimal::from_scientific(&text))
                    .map(Value::Decimal)
                    .map_err(|e| JsonError {
                        message: format!("number {} does not fit a Decimal: {}", text, e),
                    })
            }
        }
        serde_json::Value::String(s) => Ok(Value::Text(s.clone())),
        serde_json::Value::Array(items) => items
            .iter()
            .map(value_from_json)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::List),
        serde_json::Value::Object(entries) => entries
            .iter()
            .map(|(k, v)| value_from_json(v).map(|v| (k.clone(), v)))
            .collect::<Result<_, _>>()
            .map(Value::Map),
    }
}

/// Build a typed record from a JSON object's entries.
pub fn record_from_json(
    type_tag: impl Into<String>,
    v: &serde_json::Value,
) -> Result<Record, JsonError> {
    let entries = v.as_object().ok_or_else(|| JsonError {
        message: format!("record body must be an object, got {}", v),
    })?;
    let mut record = Record::new(type_tag);
    for (k, field) in entries {
        record.set(k.clone(), value_from_json(field)?);
    }
    Ok(record)
}

/// Render a runtime value as JSON.
///
/// Decimals render as strings to avoid float round-trips; records render
/// as `{"type": tag, "fields": {..}}`; deferred associations render as
/// `null`.
pub fn value_to_json(v: &Value) -> serde_json::Value {
    match v {
        Value::Nil | Value::Deferred => serde_json::Value::Null,
        Value::Bool(b) => json!(b),
        Value::Int(i) => json!(i),
        Value::Decimal(d) => json!(d.to_string()),
        Value::Text(s) => json!(s),
        Value::List(items) => {
            serde_json::Value::Array(items.iter().map(value_to_json).collect())
        }
        Value::Map(entries) => serde_json::Value::Object(
            entries
                .iter()
                .map(|(k, v)| (k.clone(), value_to_json(v)))
                .collect(),
        ),
        Value::Record(rec) => json!({
            "type": rec.type_tag,
            "fields": serde_json::Value::Object(
                rec.fields
                    .iter()
                    .map(|(k, v)| (k.clone(), value_to_json(v)))
                    .collect(),
            ),
        }),
    }
}
