//! Conversions between [`Value`] and `serde_json::Value`.
//!
//! JSON into `Value` is total. The other way is partial: JSON has no binary
//! type, so `Bin` becomes a base64 `data:` URI string, and extension values,
//! opaque host objects, non-string map keys and non-finite floats are
//! rejected.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde_json::{Map, Number};
use thiserror::Error;

use crate::error::DecodeError;
use crate::msgpack::Decoder;
use crate::{Options, Value};

/// Prefix of the string a `Bin` value turns into.
pub const BIN_DATA_URI_PREFIX: &str = "data:application/octet-stream;base64,";

#[derive(Debug, Error)]
pub enum JsonError {
    #[error("{type_name} has no JSON representation")]
    Unsupported { type_name: &'static str },
    #[error("JSON object keys must be strings, got {type_name}")]
    NonStrKey { type_name: &'static str },
    #[error("non-finite float {0} has no JSON representation")]
    NonFiniteFloat(f64),
    #[error("numeric array shape does not match its element count")]
    MalformedArray,
    #[error("fragment could not be decoded: {0}")]
    Fragment(#[from] DecodeError),
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Nil,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Value::UInt(u)
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::from(s),
            serde_json::Value::Array(arr) => Value::Array(arr.into_iter().map(Value::from).collect()),
            serde_json::Value::Object(obj) => Value::Map(
                obj.into_iter()
                    .map(|(k, v)| (Value::from(k), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl TryFrom<Value> for serde_json::Value {
    type Error = JsonError;

    fn try_from(v: Value) -> Result<Self, Self::Error> {
        to_json(&v)
    }
}

impl TryFrom<&Value> for serde_json::Value {
    type Error = JsonError;

    fn try_from(v: &Value) -> Result<Self, Self::Error> {
        to_json(v)
    }
}

fn to_json(v: &Value) -> Result<serde_json::Value, JsonError> {
    Ok(match v {
        Value::Nil => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Int(i) => serde_json::Value::Number(Number::from(*i)),
        Value::UInt(u) => serde_json::Value::Number(Number::from(*u)),
        Value::BigInt(i) => serde_json::Value::String(i.to_string()),
        Value::Float(f) => Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .ok_or(JsonError::NonFiniteFloat(*f))?,
        Value::Str(s) => serde_json::Value::String(s.to_string()),
        Value::Bin(b) => {
            serde_json::Value::String(format!("{BIN_DATA_URI_PREFIX}{}", STANDARD.encode(b)))
        }
        Value::Array(items) => {
            serde_json::Value::Array(items.iter().map(to_json).collect::<Result<_, _>>()?)
        }
        Value::Map(pairs) => {
            let mut obj = Map::with_capacity(pairs.len());
            for (k, v) in pairs {
                let Value::Str(key) = k else {
                    return Err(JsonError::NonStrKey {
                        type_name: k.type_name(),
                    });
                };
                obj.insert(key.to_string(), to_json(v)?);
            }
            serde_json::Value::Object(obj)
        }
        Value::Fragment(fragment) => {
            to_json(&Decoder::new(Options::NON_STR_KEYS).decode(fragment.as_bytes())?)?
        }
        Value::NumericArray(arr) => to_json(&arr.to_value().ok_or(JsonError::MalformedArray)?)?,
        Value::Record(record) => {
            let mut obj = Map::with_capacity(record.fields().len());
            for (name, value) in record.fields() {
                obj.insert(name.to_string(), to_json(value)?);
            }
            serde_json::Value::Object(obj)
        }
        Value::Ext(_) | Value::Opaque(_) => {
            return Err(JsonError::Unsupported {
                type_name: v.type_name(),
            })
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{NumericArray, Record};
    use crate::Ext;
    use serde_json::json;

    #[test]
    fn json_into_value_keeps_key_order() {
        let value = Value::from(json!({"b": 1, "a": [true, null, 1.5], "c": u64::MAX}));
        let keys: Vec<_> = value
            .as_map()
            .unwrap()
            .iter()
            .map(|(k, _)| k.as_str().unwrap())
            .collect();
        assert_eq!(keys, ["b", "a", "c"]);
        assert_eq!(value.get("c"), Some(&Value::UInt(u64::MAX)));
    }

    #[test]
    fn bin_becomes_data_uri() {
        let out = serde_json::Value::try_from(Value::from(vec![1u8, 2, 3])).unwrap();
        assert_eq!(out, json!("data:application/octet-stream;base64,AQID"));
    }

    #[test]
    fn host_objects_convert() {
        let record = Record::new("User").with_field("id", 7);
        assert_eq!(
            serde_json::Value::try_from(Value::from(record)).unwrap(),
            json!({"id": 7})
        );
        let arr = NumericArray::with_shape(vec![2, 1], vec![1.5f64, 2.5]);
        assert_eq!(
            serde_json::Value::try_from(Value::from(arr)).unwrap(),
            json!([[1.5], [2.5]])
        );
    }

    #[test]
    fn rejections() {
        assert!(matches!(
            serde_json::Value::try_from(Value::from(Ext::new(1, vec![0]))),
            Err(JsonError::Unsupported { type_name: "ext" })
        ));
        assert!(matches!(
            serde_json::Value::try_from(Value::Float(f64::NAN)),
            Err(JsonError::NonFiniteFloat(_))
        ));
        let map = Value::Map(vec![(Value::from(1), Value::Nil)]);
        assert!(matches!(
            serde_json::Value::try_from(map),
            Err(JsonError::NonStrKey { type_name: "int" })
        ));
    }
}
