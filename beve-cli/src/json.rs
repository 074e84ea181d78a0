// The JSON bridge: hand-written `Value` <-> `serde_json::Value` conversion.
//
// Not a `serde::Serialize`/`Deserialize` impl on `Value` itself. A derived
// impl can't express the decisions this bridge needs to make: Object key
// order (preserved via serde_json's `preserve_order` feature rather than
// its default sorted map), U64 values too large for a JSON number to carry
// without precision loss (emitted as a decimal string instead, with a
// warning), and non-UTF-8 byte strings (lossy-substituted, with a
// warning) rather than silently corrupting or refusing the whole document.

use std::fmt;

use beve_core::value::{Object, TypedArray, Value};
use bstr::BString;
use serde_json::{Map, Number};

/// The largest integer a JSON number can carry without precision loss in
/// a double-precision JSON consumer.
const MAX_SAFE_INTEGER: u64 = (1u64 << 53) - 1;

#[derive(Debug)]
pub enum JsonBridgeError {
    NonFiniteFloat,
    NumberOutOfRange(String),
}

impl fmt::Display for JsonBridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsonBridgeError::NonFiniteFloat => {
                write!(f, "NaN and infinite floats have no JSON representation")
            }
            JsonBridgeError::NumberOutOfRange(n) => {
                write!(f, "JSON number {} does not fit any BEVE numeric type", n)
            }
        }
    }
}

impl std::error::Error for JsonBridgeError {}

/// Convert a decoded `Value` to JSON for the `decode` subcommand's output.
pub fn value_to_json(value: &Value) -> Result<serde_json::Value, JsonBridgeError> {
    Ok(match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::I8(n) => serde_json::Value::Number((*n).into()),
        Value::I16(n) => serde_json::Value::Number((*n).into()),
        Value::I32(n) => serde_json::Value::Number((*n).into()),
        Value::I64(n) => serde_json::Value::Number((*n).into()),
        Value::U8(n) => serde_json::Value::Number((*n).into()),
        Value::U16(n) => serde_json::Value::Number((*n).into()),
        Value::U32(n) => serde_json::Value::Number((*n).into()),
        Value::U64(n) => u64_to_json(*n),
        Value::F32(n) => float_to_json(*n as f64)?,
        Value::F64(n) => float_to_json(*n)?,
        Value::Str(s) => serde_json::Value::String(bstring_to_json_string(s)),
        Value::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(value_to_json(item)?);
            }
            serde_json::Value::Array(out)
        }
        Value::TypedArray(t) => typed_array_to_json(t)?,
        Value::Object(obj) => object_to_json(obj)?,
        Value::Matrix(m) => {
            let mut map = Map::new();
            map.insert("rows".to_string(), serde_json::Value::Number(m.rows.into()));
            map.insert("cols".to_string(), serde_json::Value::Number(m.cols.into()));
            map.insert("data".to_string(), typed_array_to_json(&m.data)?);
            serde_json::Value::Object(map)
        }
        Value::Complex { re, im } => {
            let mut map = Map::new();
            map.insert("re".to_string(), float_to_json(*re)?);
            map.insert("im".to_string(), float_to_json(*im)?);
            serde_json::Value::Object(map)
        }
        // The tag is already discarded by the core; the bridge just
        // forwards the inner value, matching the core's own lossy
        // behavior rather than inventing a JSON shape for a tag that
        // was never preserved.
        Value::Variant(inner) => value_to_json(inner)?,
    })
}

fn u64_to_json(n: u64) -> serde_json::Value {
    if n <= MAX_SAFE_INTEGER {
        serde_json::Value::Number(n.into())
    } else {
        tracing::warn!(value = n, "U64 exceeds 2^53 - 1, emitting as a JSON string to avoid precision loss");
        serde_json::Value::String(n.to_string())
    }
}

fn float_to_json(n: f64) -> Result<serde_json::Value, JsonBridgeError> {
    Number::from_f64(n)
        .map(serde_json::Value::Number)
        .ok_or(JsonBridgeError::NonFiniteFloat)
}

fn bstring_to_json_string(s: &BString) -> String {
    match s.to_str() {
        Ok(s) => s.to_string(),
        Err(_) => {
            tracing::warn!("string is not valid UTF-8, substituting the lossy conversion");
            s.to_str_lossy().into_owned()
        }
    }
}

fn typed_array_to_json(t: &TypedArray) -> Result<serde_json::Value, JsonBridgeError> {
    let items: Vec<serde_json::Value> = match t {
        TypedArray::I8(v) => v.iter().map(|n| serde_json::Value::Number((*n).into())).collect(),
        TypedArray::I16(v) => v.iter().map(|n| serde_json::Value::Number((*n).into())).collect(),
        TypedArray::I32(v) => v.iter().map(|n| serde_json::Value::Number((*n).into())).collect(),
        TypedArray::I64(v) => v.iter().map(|n| serde_json::Value::Number((*n).into())).collect(),
        TypedArray::U8(v) => v.iter().map(|n| serde_json::Value::Number((*n).into())).collect(),
        TypedArray::U16(v) => v.iter().map(|n| serde_json::Value::Number((*n).into())).collect(),
        TypedArray::U32(v) => v.iter().map(|n| serde_json::Value::Number((*n).into())).collect(),
        TypedArray::U64(v) => v.iter().map(|n| u64_to_json(*n)).collect(),
        TypedArray::F32(v) => v
            .iter()
            .map(|n| float_to_json(*n as f64))
            .collect::<Result<_, _>>()?,
        TypedArray::F64(v) => v
            .iter()
            .map(|n| float_to_json(*n))
            .collect::<Result<_, _>>()?,
        TypedArray::Str(v) => v
            .iter()
            .map(|s| serde_json::Value::String(bstring_to_json_string(s)))
            .collect(),
    };
    Ok(serde_json::Value::Array(items))
}

fn object_to_json(obj: &Object) -> Result<serde_json::Value, JsonBridgeError> {
    let mut map = Map::new();
    for (key, value) in obj.iter() {
        map.insert(bstring_to_json_string(key), value_to_json(value)?);
    }
    Ok(serde_json::Value::Object(map))
}

/// Convert a JSON document to a `Value` for the `encode` subcommand's
/// input. Only produces the variants JSON can unambiguously express:
/// `Null`, `Bool`, the integer/float scalars, `Str`, `Array`, `Object`.
/// `TypedArray`, `Matrix`, `Complex`, and `Variant` have no JSON shape
/// this direction and are never produced here.
pub fn json_to_value(json: &serde_json::Value) -> Result<Value, JsonBridgeError> {
    Ok(match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => number_to_value(n)?,
        serde_json::Value::String(s) => Value::Str(BString::from(s.as_bytes().to_vec())),
        serde_json::Value::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(json_to_value(item)?);
            }
            Value::Array(out)
        }
        serde_json::Value::Object(map) => {
            let mut obj = Object::new();
            for (key, value) in map.iter() {
                obj.insert(BString::from(key.as_bytes().to_vec()), json_to_value(value)?);
            }
            Value::Object(obj)
        }
    })
}

fn number_to_value(n: &Number) -> Result<Value, JsonBridgeError> {
    if let Some(i) = n.as_i64() {
        return Ok(Value::I64(i));
    }
    if let Some(u) = n.as_u64() {
        return Ok(Value::U64(u));
    }
    if let Some(f) = n.as_f64() {
        return Ok(Value::F64(f));
    }
    Err(JsonBridgeError::NumberOutOfRange(n.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_object_through_json() {
        let mut obj = Object::new();
        obj.insert(BString::from("name"), Value::Str(BString::from("beve")));
        obj.insert(BString::from("count"), Value::I64(3));
        let value = Value::Object(obj);

        let json = value_to_json(&value).unwrap();
        let back = json_to_value(&json).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn large_u64_becomes_json_string() {
        let value = Value::U64(u64::MAX);
        let json = value_to_json(&value).unwrap();
        assert_eq!(json, serde_json::Value::String(u64::MAX.to_string()));
    }

    #[test]
    fn variant_bridges_as_its_inner_value() {
        let value = Value::Variant(Box::new(Value::Bool(true)));
        assert_eq!(value_to_json(&value).unwrap(), serde_json::Value::Bool(true));
    }

    #[test]
    fn object_preserves_insertion_order() {
        let mut obj = Object::new();
        obj.insert(BString::from("z"), Value::I64(1));
        obj.insert(BString::from("a"), Value::I64(2));
        let json = value_to_json(&Value::Object(obj)).unwrap();
        let map = json.as_object().unwrap();
        let keys: Vec<&str> = map.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["z", "a"]);
    }
}
