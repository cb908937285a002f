//! [`Value`]: the closed set of values the codec encodes and decodes.

use std::sync::Arc;

use crate::fragment::Fragment;
use crate::host::{NumericArray, Opaque, Record};

/// MessagePack extension value: an application-defined tag plus opaque bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ext {
    pub tag: i8,
    pub data: Vec<u8>,
}

impl Ext {
    pub fn new(tag: i8, data: impl Into<Vec<u8>>) -> Self {
        Self {
            tag,
            data: data.into(),
        }
    }
}

/// A value graph accepted by the encoder and produced by the decoder.
///
/// Integers are split by range: `Int` holds every value in the `i64` range,
/// `UInt` only holds values above `i64::MAX`, and `BigInt` marks integers no
/// 64-bit MessagePack encoding can carry. The `From` conversions normalize
/// into that layout, and equality compares integers numerically so
/// `Int(5) == UInt(5)` holds even for hand-built values.
///
/// `NumericArray`, `Record` and `Opaque` are host objects: the decoder never
/// produces them and the encoder only handles them through its option-gated
/// capability chain or the `default` callback.
#[derive(Debug, Clone)]
pub enum Value {
    Nil,
    Bool(bool),
    Int(i64),
    UInt(u64),
    /// Integer outside `[i64::MIN, u64::MAX]`.
    BigInt(i128),
    Float(f64),
    Str(Arc<str>),
    Bin(Vec<u8>),
    Array(Vec<Value>),
    /// Ordered key/value pairs; the wire order is the iteration order.
    Map(Vec<(Value, Value)>),
    Ext(Ext),
    Fragment(Fragment),
    NumericArray(NumericArray),
    Record(Record),
    Opaque(Opaque),
}

impl Value {
    /// Short name of the variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "bool",
            Value::Int(_) | Value::UInt(_) | Value::BigInt(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::Bin(_) => "bin",
            Value::Array(_) => "array",
            Value::Map(_) => "map",
            Value::Ext(_) => "ext",
            Value::Fragment(_) => "fragment",
            Value::NumericArray(_) => "numeric array",
            Value::Record(record) => record.type_name(),
            Value::Opaque(opaque) => opaque.type_name(),
        }
    }

    /// Builds a map from string keys.
    pub fn map<K, I>(pairs: I) -> Value
    where
        K: Into<Arc<str>>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Map(
            pairs
                .into_iter()
                .map(|(k, v)| (Value::Str(k.into()), v))
                .collect(),
        )
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Integer payload of `Int`, `UInt` or `BigInt`.
    pub fn as_i128(&self) -> Option<i128> {
        match self {
            Value::Int(i) => Some(i128::from(*i)),
            Value::UInt(u) => Some(i128::from(*u)),
            Value::BigInt(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.as_i128().and_then(|i| i64::try_from(i).ok())
    }

    pub fn as_u64(&self) -> Option<u64> {
        self.as_i128().and_then(|i| u64::try_from(i).ok())
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bin(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&[(Value, Value)]> {
        match self {
            Value::Map(pairs) => Some(pairs),
            _ => None,
        }
    }

    /// Looks up the first entry whose key is the string `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map()?
            .iter()
            .find(|(k, _)| k.as_str() == Some(key))
            .map(|(_, v)| v)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        use Value::*;
        match (self, other) {
            (Int(_) | UInt(_) | BigInt(_), Int(_) | UInt(_) | BigInt(_)) => {
                self.as_i128() == other.as_i128()
            }
            (Nil, Nil) => true,
            (Bool(a), Bool(b)) => a == b,
            (Float(a), Float(b)) => a == b,
            (Str(a), Str(b)) => a == b,
            (Bin(a), Bin(b)) => a == b,
            (Array(a), Array(b)) => a == b,
            (Map(a), Map(b)) => a == b,
            (Ext(a), Ext(b)) => a == b,
            (Fragment(a), Fragment(b)) => a == b,
            (NumericArray(a), NumericArray(b)) => a == b,
            (Record(a), Record(b)) => a == b,
            (Opaque(a), Opaque(b)) => a == b,
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

macro_rules! from_signed {
    ($($ty:ty),*) => {$(
        impl From<$ty> for Value {
            fn from(i: $ty) -> Self {
                Value::Int(i64::from(i))
            }
        }
    )*};
}

macro_rules! from_unsigned {
    ($($ty:ty),*) => {$(
        impl From<$ty> for Value {
            fn from(u: $ty) -> Self {
                Value::Int(i64::from(u))
            }
        }
    )*};
}

from_signed!(i8, i16, i32, i64);
from_unsigned!(u8, u16, u32);

impl From<u64> for Value {
    fn from(u: u64) -> Self {
        match i64::try_from(u) {
            Ok(i) => Value::Int(i),
            Err(_) => Value::UInt(u),
        }
    }
}

impl From<i128> for Value {
    fn from(i: i128) -> Self {
        if let Ok(v) = i64::try_from(i) {
            Value::Int(v)
        } else if let Ok(v) = u64::try_from(i) {
            Value::UInt(v)
        } else {
            Value::BigInt(i)
        }
    }
}

impl From<f32> for Value {
    fn from(f: f32) -> Self {
        Value::Float(f64::from(f))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(Arc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(Arc::from(s))
    }
}

impl From<Arc<str>> for Value {
    fn from(s: Arc<str>) -> Self {
        Value::Str(s)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bin(b)
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Value::Bin(b.to_vec())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<Ext> for Value {
    fn from(ext: Ext) -> Self {
        Value::Ext(ext)
    }
}

impl From<Fragment> for Value {
    fn from(fragment: Fragment) -> Self {
        Value::Fragment(fragment)
    }
}

impl From<NumericArray> for Value {
    fn from(arr: NumericArray) -> Self {
        Value::NumericArray(arr)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Record(record)
    }
}

impl From<Opaque> for Value {
    fn from(opaque: Opaque) -> Self {
        Value::Opaque(opaque)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Nil, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_normalize_by_range() {
        assert!(matches!(Value::from(5u64), Value::Int(5)));
        assert!(matches!(Value::from(u64::MAX), Value::UInt(u64::MAX)));
        assert!(matches!(Value::from(i128::from(i64::MIN)), Value::Int(i64::MIN)));
        assert!(matches!(
            Value::from(i128::from(u64::MAX) + 1),
            Value::BigInt(_)
        ));
        assert!(matches!(
            Value::from(i128::from(i64::MIN) - 1),
            Value::BigInt(_)
        ));
    }

    #[test]
    fn integer_equality_is_numeric() {
        assert_eq!(Value::Int(5), Value::UInt(5));
        assert_eq!(Value::UInt(7), Value::BigInt(7));
        assert_ne!(Value::Int(-1), Value::UInt(u64::MAX));
        assert_ne!(Value::Int(1), Value::Float(1.0));
    }

    #[test]
    fn map_lookup_by_string_key() {
        let map = Value::map([("a", Value::from(1)), ("b", Value::from("x"))]);
        assert_eq!(map.get("b"), Some(&Value::from("x")));
        assert_eq!(map.get("c"), None);
        assert_eq!(Value::Nil.get("a"), None);
    }

    #[test]
    fn option_maps_none_to_nil() {
        assert!(Value::from(None::<i32>).is_nil());
        assert_eq!(Value::from(Some("x")), Value::from("x"));
    }
}
