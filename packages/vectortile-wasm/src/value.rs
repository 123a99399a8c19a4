use serde::{Serialize, Serializer};

use crate::error::Result;
use crate::pbf::Pbf;

// Number.MAX_SAFE_INTEGER
const MAX_SAFE_INTEGER: u64 = (1 << 53) - 1;

/// A feature property value.
///
/// Serializes to the bare JSON scalar, so a property map renders the way
/// GeoJSON consumers expect.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Float(f32),
    Double(f64),
    Int(i64),
    UInt(u64),
    SInt(i64),
    Bool(bool),
    Null,
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric values widened to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::Float(f) => Some(f64::from(f)),
            Value::Double(d) => Some(d),
            Value::Int(i) | Value::SInt(i) => Some(i as f64),
            Value::UInt(u) => Some(u as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::String(s) => serializer.serialize_str(s),
            Value::Float(f) => serializer.serialize_f32(*f),
            Value::Double(d) => serializer.serialize_f64(*d),
            Value::Int(i) | Value::SInt(i) => serialize_i64(i, serializer),
            Value::UInt(u) => serialize_u64(u, serializer),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Null => serializer.serialize_unit(),
        }
    }
}

/// Writes integers beyond 2^53 as `f64`, the precision a JavaScript number
/// keeps. `serde_wasm_bindgen` rejects them as integers.
pub(crate) fn serialize_u64<S: Serializer>(
    v: &u64,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    if *v <= MAX_SAFE_INTEGER {
        serializer.serialize_u64(*v)
    } else {
        serializer.serialize_f64(*v as f64)
    }
}

pub(crate) fn serialize_i64<S: Serializer>(
    v: &i64,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    if v.unsigned_abs() <= MAX_SAFE_INTEGER {
        serializer.serialize_i64(*v)
    } else {
        serializer.serialize_f64(*v as f64)
    }
}

/// Decodes one length-delimited `Value` message at the reader's cursor.
///
/// When several alternatives are present the last one wins. Unknown fields
/// reset the value to `Null`.
pub fn read_value(pbf: &mut Pbf) -> Result<Value> {
    let end = pbf.read_length_end()?;
    let mut value = Value::Null;
    pbf.read_fields(end, |tag, pbf| {
        value = match tag {
            1 => Value::String(pbf.read_string()?),
            2 => Value::Float(pbf.read_float()?),
            3 => Value::Double(pbf.read_double()?),
            4 => Value::Int(pbf.read_varint64()?),
            5 => Value::UInt(pbf.read_varint()?),
            6 => Value::SInt(pbf.read_svarint()?),
            7 => Value::Bool(pbf.read_bool()?),
            _ => Value::Null,
        };
        Ok(())
    })?;
    Ok(value)
}
