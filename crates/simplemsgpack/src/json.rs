//! Conversions between [`Value`] and `serde_json::Value`.
//!
//! JSON to [`Value`] is lossless. The other direction is meant for display
//! and debugging: text becomes a string, non-UTF-8 bytes become a base64
//! data URI, non-text map keys are rendered as JSON, and extensions become
//! `{"type": id, "data": <data URI>}`.

use base64::Engine;
use serde_json::{Map, Number};

use crate::value::Value;

const DATA_URI_PREFIX: &str = "data:application/octet-stream;base64,";

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Nil,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(u) = n.as_u64() {
                    Value::from(u)
                } else if let Some(i) = n.as_i64() {
                    Value::from(i)
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::Bytes(s.into_bytes()),
            serde_json::Value::Array(arr) => Value::Array(arr.into_iter().map(Value::from).collect()),
            serde_json::Value::Object(obj) => Value::Map(
                obj.into_iter()
                    .map(|(k, v)| (Value::Bytes(k.into_bytes()), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&Value> for serde_json::Value {
    fn from(v: &Value) -> Self {
        match v {
            Value::Nil => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(n) => match n.as_u64() {
                Some(u) => serde_json::Value::Number(u.into()),
                None => serde_json::Value::Number(n.as_i64().unwrap_or(i64::MIN).into()),
            },
            Value::Float(f) => Number::from_f64(*f).map_or(serde_json::Value::Null, serde_json::Value::Number),
            Value::Bytes(b) => serde_json::Value::String(bytes_to_string(b)),
            Value::Array(items) => {
                serde_json::Value::Array(items.iter().map(serde_json::Value::from).collect())
            }
            Value::Map(pairs) => serde_json::Value::Object(
                pairs
                    .iter()
                    .map(|(k, v)| (key_to_string(k), serde_json::Value::from(v)))
                    .collect::<Map<String, serde_json::Value>>(),
            ),
            Value::Ext(ext) => serde_json::json!({
                "type": ext.ext_type.get(),
                "data": data_uri(&ext.data),
            }),
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(v: Value) -> Self {
        serde_json::Value::from(&v)
    }
}

fn data_uri(bytes: &[u8]) -> String {
    let b64 = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("{DATA_URI_PREFIX}{b64}")
}

fn bytes_to_string(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => data_uri(bytes),
    }
}

fn key_to_string(key: &Value) -> String {
    match key {
        Value::Bytes(b) => bytes_to_string(b),
        other => serde_json::Value::from(other).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::value::{ExtType, Extension};

    #[test]
    fn test_from_json_keeps_order() {
        let v = Value::from(json!({"z": 1, "a": [true, null, -2, 1.5]}));
        let pairs = v.as_map().unwrap();
        assert_eq!(pairs[0].0, Value::from("z"));
        assert_eq!(pairs[1].0, Value::from("a"));
        assert_eq!(
            pairs[1].1,
            Value::Array(vec![
                Value::Bool(true),
                Value::Nil,
                Value::from(-2),
                Value::Float(1.5)
            ])
        );
    }

    #[test]
    fn test_to_json() {
        let v = Value::Map(vec![
            (Value::from("bin"), Value::Bytes(vec![0xff, 0x00])),
            (Value::from(7), Value::from(u64::MAX)),
            (
                Value::from("ext"),
                Value::Ext(Extension::new(ExtType::new(3).unwrap(), b"hi".to_vec())),
            ),
        ]);
        assert_eq!(
            serde_json::Value::from(&v),
            json!({
                "bin": "data:application/octet-stream;base64,/wA=",
                "7": u64::MAX,
                "ext": {"type": 3, "data": "data:application/octet-stream;base64,aGk="},
            })
        );
    }

    #[test]
    fn test_non_finite_float_is_null() {
        assert_eq!(serde_json::Value::from(Value::Float(f64::NAN)), json!(null));
    }
}
