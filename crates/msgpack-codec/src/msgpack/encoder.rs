//! `Encoder`: [`Value`] to MessagePack bytes.
//!
//! Every header picks the smallest size class that fits, matching the
//! reference encoders byte for byte. Host objects go through a short ordered
//! chain of option-gated capabilities before falling back to the caller's
//! `default` callback.

use msgpack_buffers::Writer;
use tracing::{debug, trace};

use super::marker::Marker;
use super::RECURSION_LIMIT;
use crate::error::{BoxError, EncodeError};
use crate::host::{NumericArray, NumericData, Record};
use crate::{Ext, Options, Value};

/// Caller-supplied conversion for values the encoder cannot handle natively.
pub type DefaultFn<'a> = dyn FnMut(&Value) -> Result<Value, BoxError> + 'a;

type Capability = fn(&mut Encoder<'_>, &Value) -> Option<Result<(), EncodeError>>;

/// Host-object recognizers, consulted in order when their option is set.
const CAPABILITIES: &[(Options, Capability)] = &[
    (Options::SERIALIZE_NUMPY, numeric_array_capability),
    (Options::SERIALIZE_PYDANTIC, record_capability),
];

fn numeric_array_capability(
    enc: &mut Encoder<'_>,
    value: &Value,
) -> Option<Result<(), EncodeError>> {
    match value {
        Value::NumericArray(arr) => Some(enc.write_numeric_array(arr)),
        _ => None,
    }
}

fn record_capability(enc: &mut Encoder<'_>, value: &Value) -> Option<Result<(), EncodeError>> {
    match value {
        Value::Record(record) => Some(enc.write_record(record)),
        _ => None,
    }
}

pub struct Encoder<'a> {
    writer: Writer,
    options: Options,
    default: Option<&'a mut DefaultFn<'a>>,
    depth: usize,
}

impl Default for Encoder<'_> {
    fn default() -> Self {
        Self::new(Options::empty())
    }
}

impl<'a> Encoder<'a> {
    pub fn new(options: Options) -> Self {
        Self {
            writer: Writer::new(),
            options,
            default: None,
            depth: 0,
        }
    }

    /// Installs the fallback used for host objects and passthrough integers.
    pub fn with_default(mut self, default: &'a mut DefaultFn<'a>) -> Self {
        self.default = Some(default);
        self
    }

    pub fn options(&self) -> Options {
        self.options
    }

    /// Encodes one value. On error nothing is returned and the internal
    /// buffer is cleared.
    pub fn encode(&mut self, value: &Value) -> Result<Vec<u8>, EncodeError> {
        trace!(options = ?self.options, "encode");
        self.writer.reset();
        self.depth = 0;
        match self.write_any(value) {
            Ok(()) => Ok(self.writer.flush()),
            Err(err) => {
                debug!(error = %err, "encode failed");
                self.writer.reset();
                Err(err)
            }
        }
    }

    fn write_any(&mut self, value: &Value) -> Result<(), EncodeError> {
        match value {
            Value::Nil => self.write_nil(),
            Value::Bool(b) => self.write_bool(*b),
            Value::Int(i) => self.write_i64(*i),
            Value::UInt(u) => self.write_u64(*u),
            Value::Float(f) => self.write_f64(*f),
            Value::Str(s) => self.write_str(s)?,
            Value::Bin(b) => self.write_bin(b)?,
            Value::Array(items) => self.write_arr(items)?,
            Value::Map(pairs) => self.write_map(pairs)?,
            Value::Ext(ext) => self.write_ext(ext)?,
            Value::Fragment(fragment) => self.writer.buf(fragment.as_bytes()),
            Value::BigInt(i) => self.write_big_int(*i, value)?,
            Value::NumericArray(_) | Value::Record(_) | Value::Opaque(_) => {
                self.write_host(value)?
            }
        }
        Ok(())
    }

    fn enter(&mut self) -> Result<(), EncodeError> {
        if self.depth >= RECURSION_LIMIT {
            return Err(EncodeError::RecursionLimit);
        }
        self.depth += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn write_nil(&mut self) {
        self.writer.u8(Marker::NULL);
    }

    fn write_bool(&mut self, b: bool) {
        self.writer.u8(if b { Marker::TRUE } else { Marker::FALSE });
    }

    fn write_f64(&mut self, f: f64) {
        self.writer.u8f64(Marker::FLOAT64, f);
    }

    fn write_f32(&mut self, f: f32) {
        self.writer.u8f32(Marker::FLOAT32, f);
    }

    fn write_u64(&mut self, u: u64) {
        if u <= 0x7f {
            self.writer.u8(u as u8);
        } else if u <= 0xff {
            self.writer.u8u8(Marker::UINT8, u as u8);
        } else if u <= 0xffff {
            self.writer.u8u16(Marker::UINT16, u as u16);
        } else if u <= 0xffff_ffff {
            self.writer.u8u32(Marker::UINT32, u as u32);
        } else {
            self.writer.u8u64(Marker::UINT64, u);
        }
    }

    fn write_i64(&mut self, i: i64) {
        if i >= 0 {
            self.write_u64(i as u64);
        } else if i >= -32 {
            self.writer.i8(i as i8);
        } else if i >= i64::from(i8::MIN) {
            self.writer.u8u8(Marker::INT8, i as i8 as u8);
        } else if i >= i64::from(i16::MIN) {
            self.writer.u8u16(Marker::INT16, i as i16 as u16);
        } else if i >= i64::from(i32::MIN) {
            self.writer.u8u32(Marker::INT32, i as i32 as u32);
        } else {
            self.writer.u8i64(Marker::INT64, i);
        }
    }

    fn check_len(kind: &'static str, len: usize) -> Result<u32, EncodeError> {
        u32::try_from(len).map_err(|_| EncodeError::TooLarge { kind, len })
    }

    fn write_str_hdr(&mut self, len: usize) -> Result<(), EncodeError> {
        let len32 = Self::check_len("str", len)?;
        if len <= 0x1f {
            self.writer.u8(Marker::FIXSTR | len as u8);
        } else if len <= 0xff {
            self.writer.u8u8(Marker::STR8, len as u8);
        } else if len <= 0xffff {
            self.writer.u8u16(Marker::STR16, len as u16);
        } else {
            self.writer.u8u32(Marker::STR32, len32);
        }
        Ok(())
    }

    fn write_str(&mut self, s: &str) -> Result<(), EncodeError> {
        self.write_str_hdr(s.len())?;
        self.writer.utf8(s);
        Ok(())
    }

    fn write_bin_hdr(&mut self, len: usize) -> Result<(), EncodeError> {
        let len32 = Self::check_len("bin", len)?;
        if len <= 0xff {
            self.writer.u8u8(Marker::BIN8, len as u8);
        } else if len <= 0xffff {
            self.writer.u8u16(Marker::BIN16, len as u16);
        } else {
            self.writer.u8u32(Marker::BIN32, len32);
        }
        Ok(())
    }

    fn write_bin(&mut self, buf: &[u8]) -> Result<(), EncodeError> {
        self.write_bin_hdr(buf.len())?;
        self.writer.buf(buf);
        Ok(())
    }

    fn write_arr_hdr(&mut self, len: usize) -> Result<(), EncodeError> {
        let len32 = Self::check_len("array", len)?;
        if len <= 0x0f {
            self.writer.u8(Marker::FIXARRAY | len as u8);
        } else if len <= 0xffff {
            self.writer.u8u16(Marker::ARRAY16, len as u16);
        } else {
            self.writer.u8u32(Marker::ARRAY32, len32);
        }
        Ok(())
    }

    fn write_arr(&mut self, items: &[Value]) -> Result<(), EncodeError> {
        self.enter()?;
        self.write_arr_hdr(items.len())?;
        for item in items {
            self.write_any(item)?;
        }
        self.leave();
        Ok(())
    }

    fn write_map_hdr(&mut self, len: usize) -> Result<(), EncodeError> {
        let len32 = Self::check_len("map", len)?;
        if len <= 0x0f {
            self.writer.u8(Marker::FIXMAP | len as u8);
        } else if len <= 0xffff {
            self.writer.u8u16(Marker::MAP16, len as u16);
        } else {
            self.writer.u8u32(Marker::MAP32, len32);
        }
        Ok(())
    }

    fn write_map(&mut self, pairs: &[(Value, Value)]) -> Result<(), EncodeError> {
        self.enter()?;
        self.write_map_hdr(pairs.len())?;
        for (key, value) in pairs {
            self.write_key(key)?;
            self.write_any(value)?;
        }
        self.leave();
        Ok(())
    }

    /// Writes a map key under the key policy: `Str` always, hashable scalars
    /// and arrays of them only with `NON_STR_KEYS`.
    fn write_key(&mut self, key: &Value) -> Result<(), EncodeError> {
        match key {
            Value::Str(s) => self.write_str(s),
            _ if !self.options.contains(Options::NON_STR_KEYS) => Err(EncodeError::NonStrKey {
                type_name: key.type_name(),
            }),
            Value::Nil
            | Value::Bool(_)
            | Value::Int(_)
            | Value::UInt(_)
            | Value::Float(_)
            | Value::Bin(_)
            | Value::Fragment(_) => self.write_any(key),
            Value::Array(items) => {
                self.enter()?;
                self.write_arr_hdr(items.len())?;
                for item in items {
                    self.write_key(item)?;
                }
                self.leave();
                Ok(())
            }
            Value::BigInt(i) => Err(EncodeError::IntegerOutOfRange { value: *i }),
            Value::Map(_)
            | Value::Ext(_)
            | Value::NumericArray(_)
            | Value::Record(_)
            | Value::Opaque(_) => Err(EncodeError::InvalidKey {
                type_name: key.type_name(),
            }),
        }
    }

    fn write_ext_hdr(&mut self, tag: i8, len: usize) -> Result<(), EncodeError> {
        let len32 = Self::check_len("ext", len)?;
        match len {
            1 => self.writer.u8(Marker::FIXEXT1),
            2 => self.writer.u8(Marker::FIXEXT2),
            4 => self.writer.u8(Marker::FIXEXT4),
            8 => self.writer.u8(Marker::FIXEXT8),
            16 => self.writer.u8(Marker::FIXEXT16),
            _ if len <= 0xff => self.writer.u8u8(Marker::EXT8, len as u8),
            _ if len <= 0xffff => self.writer.u8u16(Marker::EXT16, len as u16),
            _ => self.writer.u8u32(Marker::EXT32, len32),
        }
        self.writer.i8(tag);
        Ok(())
    }

    fn write_ext(&mut self, ext: &Ext) -> Result<(), EncodeError> {
        self.write_ext_hdr(ext.tag, ext.data.len())?;
        self.writer.buf(&ext.data);
        Ok(())
    }

    fn write_big_int(&mut self, i: i128, value: &Value) -> Result<(), EncodeError> {
        if !self.options.contains(Options::PASSTHROUGH_BIG_INT) {
            return Err(EncodeError::IntegerOutOfRange { value: i });
        }
        self.write_default(value)
    }

    fn write_host(&mut self, value: &Value) -> Result<(), EncodeError> {
        for (option, capability) in CAPABILITIES {
            if self.options.contains(*option) {
                if let Some(res) = capability(self, value) {
                    return res;
                }
            }
        }
        self.write_default(value)
    }

    fn write_default(&mut self, value: &Value) -> Result<(), EncodeError> {
        let type_name = value.type_name();
        self.enter()?;
        let substitute = match self.default.as_deref_mut() {
            Some(default) => default(value).map_err(|source| {
                debug!(type_name, error = %source, "default callback failed");
                EncodeError::Default { type_name, source }
            })?,
            None => return Err(EncodeError::UnsupportedType { type_name }),
        };
        self.write_any(&substitute)?;
        self.leave();
        Ok(())
    }

    fn write_record(&mut self, record: &Record) -> Result<(), EncodeError> {
        self.enter()?;
        self.write_map_hdr(record.fields().len())?;
        for (name, value) in record.fields() {
            self.write_str(name)?;
            self.write_any(value)?;
        }
        self.leave();
        Ok(())
    }

    fn write_numeric_array(&mut self, arr: &NumericArray) -> Result<(), EncodeError> {
        if !arr.is_well_formed() {
            return Err(EncodeError::MalformedArray {
                shape: arr.shape().to_vec(),
                len: arr.data().len(),
            });
        }
        if arr.shape().is_empty() {
            self.write_numeric_run(arr.data(), 0, 1);
            return Ok(());
        }
        self.write_numeric_dims(arr.data(), arr.shape(), 0)
    }

    fn write_numeric_dims(
        &mut self,
        data: &NumericData,
        shape: &[usize],
        offset: usize,
    ) -> Result<(), EncodeError> {
        let (&len, rest) = match shape.split_first() {
            Some(split) => split,
            None => return Ok(()),
        };
        self.enter()?;
        self.write_arr_hdr(len)?;
        if rest.is_empty() {
            self.write_numeric_run(data, offset, len);
        } else {
            let stride: usize = rest.iter().product();
            for i in 0..len {
                self.write_numeric_dims(data, rest, offset + i * stride)?;
            }
        }
        self.leave();
        Ok(())
    }

    /// Writes `len` consecutive elements starting at `start`, dispatching on
    /// the element type once per run.
    fn write_numeric_run(&mut self, data: &NumericData, start: usize, len: usize) {
        let range = start..start + len;
        match data {
            NumericData::Bool(v) => v[range].iter().for_each(|&b| self.write_bool(b)),
            NumericData::I8(v) => v[range]
                .iter()
                .for_each(|&i| self.write_i64(i64::from(i))),
            NumericData::I16(v) => v[range]
                .iter()
                .for_each(|&i| self.write_i64(i64::from(i))),
            NumericData::I32(v) => v[range]
                .iter()
                .for_each(|&i| self.write_i64(i64::from(i))),
            NumericData::I64(v) => v[range].iter().for_each(|&i| self.write_i64(i)),
            NumericData::U8(v) => v[range]
                .iter()
                .for_each(|&u| self.write_u64(u64::from(u))),
            NumericData::U16(v) => v[range]
                .iter()
                .for_each(|&u| self.write_u64(u64::from(u))),
            NumericData::U32(v) => v[range]
                .iter()
                .for_each(|&u| self.write_u64(u64::from(u))),
            NumericData::U64(v) => v[range].iter().for_each(|&u| self.write_u64(u)),
            NumericData::F32(v) => v[range].iter().for_each(|&f| self.write_f32(f)),
            NumericData::F64(v) => v[range].iter().for_each(|&f| self.write_f64(f)),
        }
    }
}
