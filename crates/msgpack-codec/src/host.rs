//! Host objects the encoder recognizes through its capability chain.
//!
//! - [`NumericArray`]: fixed-type n-dimensional numeric buffer, encoded
//!   natively under `SERIALIZE_NUMPY`.
//! - [`Record`]: schema-validated record with declared field order, encoded
//!   as a map under `SERIALIZE_PYDANTIC`.
//! - [`Opaque`]: any other host value; only the `default` callback can
//!   encode it.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::Value;

/// Element buffer of a [`NumericArray`], one variant per element type.
#[derive(Debug, Clone, PartialEq)]
pub enum NumericData {
    Bool(Vec<bool>),
    I8(Vec<i8>),
    I16(Vec<i16>),
    I32(Vec<i32>),
    I64(Vec<i64>),
    U8(Vec<u8>),
    U16(Vec<u16>),
    U32(Vec<u32>),
    U64(Vec<u64>),
    F32(Vec<f32>),
    F64(Vec<f64>),
}

macro_rules! numeric_from {
    ($($variant:ident => $ty:ty),* $(,)?) => {$(
        impl From<Vec<$ty>> for NumericData {
            fn from(v: Vec<$ty>) -> Self {
                NumericData::$variant(v)
            }
        }
    )*};
}

numeric_from!(
    Bool => bool,
    I8 => i8,
    I16 => i16,
    I32 => i32,
    I64 => i64,
    U8 => u8,
    U16 => u16,
    U32 => u32,
    U64 => u64,
    F32 => f32,
    F64 => f64,
);

impl NumericData {
    pub fn len(&self) -> usize {
        match self {
            NumericData::Bool(v) => v.len(),
            NumericData::I8(v) => v.len(),
            NumericData::I16(v) => v.len(),
            NumericData::I32(v) => v.len(),
            NumericData::I64(v) => v.len(),
            NumericData::U8(v) => v.len(),
            NumericData::U16(v) => v.len(),
            NumericData::U32(v) => v.len(),
            NumericData::U64(v) => v.len(),
            NumericData::F32(v) => v.len(),
            NumericData::F64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element type name in numpy spelling.
    pub fn dtype(&self) -> &'static str {
        match self {
            NumericData::Bool(_) => "bool",
            NumericData::I8(_) => "int8",
            NumericData::I16(_) => "int16",
            NumericData::I32(_) => "int32",
            NumericData::I64(_) => "int64",
            NumericData::U8(_) => "uint8",
            NumericData::U16(_) => "uint16",
            NumericData::U32(_) => "uint32",
            NumericData::U64(_) => "uint64",
            NumericData::F32(_) => "float32",
            NumericData::F64(_) => "float64",
        }
    }

    /// Element at `index` as a generic [`Value`].
    pub fn value_at(&self, index: usize) -> Option<Value> {
        Some(match self {
            NumericData::Bool(v) => Value::from(*v.get(index)?),
            NumericData::I8(v) => Value::from(*v.get(index)?),
            NumericData::I16(v) => Value::from(*v.get(index)?),
            NumericData::I32(v) => Value::from(*v.get(index)?),
            NumericData::I64(v) => Value::from(*v.get(index)?),
            NumericData::U8(v) => Value::from(*v.get(index)?),
            NumericData::U16(v) => Value::from(*v.get(index)?),
            NumericData::U32(v) => Value::from(*v.get(index)?),
            NumericData::U64(v) => Value::from(*v.get(index)?),
            NumericData::F32(v) => Value::from(*v.get(index)?),
            NumericData::F64(v) => Value::from(*v.get(index)?),
        })
    }
}

/// C-contiguous n-dimensional array of one numeric element type.
///
/// An empty shape is a scalar holding exactly one element.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericArray {
    shape: Vec<usize>,
    data: NumericData,
}

impl NumericArray {
    /// One-dimensional array over `data`.
    pub fn new(data: impl Into<NumericData>) -> Self {
        let data = data.into();
        Self {
            shape: vec![data.len()],
            data,
        }
    }

    /// Array with an explicit row-major shape. The shape is checked at
    /// encode time.
    pub fn with_shape(shape: Vec<usize>, data: impl Into<NumericData>) -> Self {
        Self {
            shape,
            data: data.into(),
        }
    }

    /// Zero-dimensional array holding `value`.
    pub fn scalar<T>(value: T) -> Self
    where
        Vec<T>: Into<NumericData>,
    {
        Self::with_shape(Vec::new(), vec![value])
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn data(&self) -> &NumericData {
        &self.data
    }

    /// Whether the shape describes exactly as many elements as the buffer holds.
    pub fn is_well_formed(&self) -> bool {
        self.shape
            .iter()
            .try_fold(1usize, |acc, &d| acc.checked_mul(d))
            .is_some_and(|n| n == self.data.len())
    }

    /// Nested [`Value`] arrays equivalent to this array, or `None` when the
    /// shape does not match the buffer.
    pub fn to_value(&self) -> Option<Value> {
        if !self.is_well_formed() {
            return None;
        }
        self.nest(&self.shape, 0)
    }

    fn nest(&self, shape: &[usize], offset: usize) -> Option<Value> {
        let Some((&len, rest)) = shape.split_first() else {
            return self.data.value_at(offset);
        };
        let stride: usize = rest.iter().product();
        (0..len)
            .map(|i| self.nest(rest, offset + i * stride))
            .collect::<Option<Vec<_>>>()
            .map(Value::Array)
    }
}

/// Record with named fields in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    name: Arc<str>,
    fields: Vec<(Arc<str>, Value)>,
}

impl Record {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Appends a field, builder style.
    pub fn with_field(mut self, name: impl Into<Arc<str>>, value: impl Into<Value>) -> Self {
        self.push_field(name, value);
        self
    }

    pub fn push_field(&mut self, name: impl Into<Arc<str>>, value: impl Into<Value>) {
        self.fields.push((name.into(), value.into()));
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[(Arc<str>, Value)] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(k, _)| &**k == name)
            .map(|(_, v)| v)
    }

    pub(crate) fn type_name(&self) -> &'static str {
        "record"
    }
}

/// Host value with no native MessagePack representation.
///
/// Equality is identity: two `Opaque` values are equal when they share the
/// same allocation.
#[derive(Clone)]
pub struct Opaque {
    type_name: &'static str,
    inner: Arc<dyn Any + Send + Sync>,
}

impl Opaque {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            inner: Arc::new(value),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }
}

impl fmt::Debug for Opaque {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Opaque").field(&self.type_name).finish()
    }
}

impl PartialEq for Opaque {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}
