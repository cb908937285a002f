//! `Decoder`: MessagePack bytes to [`Value`].

use msgpack_buffers::Reader;
use tracing::{debug, trace};

use super::key_cache::KeyCache;
use super::marker::Marker;
use super::RECURSION_LIMIT;
use crate::error::{BoxError, DecodeError};
use crate::{Options, Value};

/// Caller-supplied conversion for extension values: `(tag, payload)`.
pub type ExtHookFn<'a> = dyn FnMut(i8, &[u8]) -> Result<Value, BoxError> + 'a;

/// Recursive-descent decoder.
///
/// Map keys that are strings go through a [`KeyCache`] that lives for one
/// [`decode`](Decoder::decode) call.
pub struct Decoder<'a> {
    options: Options,
    ext_hook: Option<&'a mut ExtHookFn<'a>>,
    keys: KeyCache,
    depth: usize,
}

impl Default for Decoder<'_> {
    fn default() -> Self {
        Self::new(Options::empty())
    }
}

impl<'a> Decoder<'a> {
    pub fn new(options: Options) -> Self {
        Self {
            options,
            ext_hook: None,
            keys: KeyCache::new(),
            depth: 0,
        }
    }

    pub fn with_ext_hook(mut self, hook: &'a mut ExtHookFn<'a>) -> Self {
        self.ext_hook = Some(hook);
        self
    }

    pub fn options(&self) -> Options {
        self.options
    }

    /// Decodes exactly one value; bytes left after it are an error.
    pub fn decode(&mut self, data: &[u8]) -> Result<Value, DecodeError> {
        trace!(len = data.len(), options = ?self.options, "decode");
        self.keys = KeyCache::new();
        self.depth = 0;
        let mut reader = Reader::new(data);
        let value = self.read_any(&mut reader).inspect_err(|err| {
            debug!(error = %err, "decode failed");
        })?;
        if !reader.is_eof() {
            return Err(DecodeError::TrailingBytes {
                offset: reader.position(),
                remaining: reader.remaining(),
            });
        }
        Ok(value)
    }

    /// Containers recurse from here; every other marker goes through
    /// [`read_leaf`](Self::read_leaf) so each nesting level keeps a small
    /// stack frame.
    fn read_any(&mut self, r: &mut Reader<'_>) -> Result<Value, DecodeError> {
        let offset = r.position();
        let byte = r.u8()?;
        match Marker::from_u8(byte) {
            Marker::FixArray(n) => self.read_arr(r, usize::from(n), offset),
            Marker::Array16 => {
                let n = usize::from(r.u16()?);
                self.read_arr(r, n, offset)
            }
            Marker::Array32 => {
                let n = r.u32()? as usize;
                self.read_arr(r, n, offset)
            }
            Marker::FixMap(n) => self.read_map(r, usize::from(n), offset),
            Marker::Map16 => {
                let n = usize::from(r.u16()?);
                self.read_map(r, n, offset)
            }
            Marker::Map32 => {
                let n = r.u32()? as usize;
                self.read_map(r, n, offset)
            }
            marker => self.read_leaf(r, marker, byte, offset),
        }
    }

    #[inline(never)]
    fn read_leaf(
        &mut self,
        r: &mut Reader<'_>,
        marker: Marker,
        byte: u8,
        offset: usize,
    ) -> Result<Value, DecodeError> {
        let value = match marker {
            Marker::FixPos(u) => Value::Int(i64::from(u)),
            Marker::FixNeg(i) => Value::Int(i64::from(i)),
            Marker::Null => Value::Nil,
            Marker::False => Value::Bool(false),
            Marker::True => Value::Bool(true),
            Marker::U8 => Value::Int(i64::from(r.u8()?)),
            Marker::U16 => Value::Int(i64::from(r.u16()?)),
            Marker::U32 => Value::Int(i64::from(r.u32()?)),
            Marker::U64 => Value::from(r.u64()?),
            Marker::I8 => Value::Int(i64::from(r.i8()?)),
            Marker::I16 => Value::Int(i64::from(r.i16()?)),
            Marker::I32 => Value::Int(i64::from(r.i32()?)),
            Marker::I64 => Value::Int(r.i64()?),
            Marker::F32 => Value::Float(f64::from(r.f32()?)),
            Marker::F64 => Value::Float(r.f64()?),
            Marker::FixStr(n) => self.read_str(r, usize::from(n))?,
            Marker::Str8 => {
                let n = usize::from(r.u8()?);
                self.read_str(r, n)?
            }
            Marker::Str16 => {
                let n = usize::from(r.u16()?);
                self.read_str(r, n)?
            }
            Marker::Str32 => {
                let n = r.u32()? as usize;
                self.read_str(r, n)?
            }
            Marker::Bin8 => {
                let n = usize::from(r.u8()?);
                Value::Bin(r.buf(n)?.to_vec())
            }
            Marker::Bin16 => {
                let n = usize::from(r.u16()?);
                Value::Bin(r.buf(n)?.to_vec())
            }
            Marker::Bin32 => {
                let n = r.u32()? as usize;
                Value::Bin(r.buf(n)?.to_vec())
            }
            Marker::FixExt1 => self.read_ext(r, 1, offset)?,
            Marker::FixExt2 => self.read_ext(r, 2, offset)?,
            Marker::FixExt4 => self.read_ext(r, 4, offset)?,
            Marker::FixExt8 => self.read_ext(r, 8, offset)?,
            Marker::FixExt16 => self.read_ext(r, 16, offset)?,
            Marker::Ext8 => {
                let n = usize::from(r.u8()?);
                self.read_ext(r, n, offset)?
            }
            Marker::Ext16 => {
                let n = usize::from(r.u16()?);
                self.read_ext(r, n, offset)?
            }
            Marker::Ext32 => {
                let n = r.u32()? as usize;
                self.read_ext(r, n, offset)?
            }
            Marker::Reserved
            | Marker::FixArray(_)
            | Marker::Array16
            | Marker::Array32
            | Marker::FixMap(_)
            | Marker::Map16
            | Marker::Map32 => {
                return Err(DecodeError::InvalidMarker {
                    marker: byte,
                    offset,
                })
            }
        };
        Ok(value)
    }

    fn read_str(&mut self, r: &mut Reader<'_>, n: usize) -> Result<Value, DecodeError> {
        Ok(Value::Str(r.utf8(n)?.into()))
    }

    fn enter(&mut self) -> Result<(), DecodeError> {
        if self.depth >= RECURSION_LIMIT {
            return Err(DecodeError::RecursionLimit);
        }
        self.depth += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    /// Every element takes at least one byte, so a count above the remaining
    /// input is reported as `LengthExceedsInput` before anything is allocated.
    fn check_count(r: &Reader<'_>, declared: usize, offset: usize) -> Result<(), DecodeError> {
        if declared > r.remaining() {
            return Err(DecodeError::LengthExceedsInput {
                declared,
                remaining: r.remaining(),
                offset,
            });
        }
        Ok(())
    }

    fn read_arr(
        &mut self,
        r: &mut Reader<'_>,
        n: usize,
        offset: usize,
    ) -> Result<Value, DecodeError> {
        Self::check_count(r, n, offset)?;
        self.enter()?;
        let mut items = Vec::with_capacity(n);
        for _ in 0..n {
            items.push(self.read_any(r)?);
        }
        self.leave();
        Ok(Value::Array(items))
    }

    fn read_map(
        &mut self,
        r: &mut Reader<'_>,
        n: usize,
        offset: usize,
    ) -> Result<Value, DecodeError> {
        Self::check_count(r, n.saturating_mul(2), offset)?;
        self.enter()?;
        let mut pairs = Vec::with_capacity(n);
        for _ in 0..n {
            let key = self.read_key(r)?;
            let value = self.read_any(r)?;
            pairs.push((key, value));
        }
        self.leave();
        Ok(Value::Map(pairs))
    }

    fn read_key(&mut self, r: &mut Reader<'_>) -> Result<Value, DecodeError> {
        let offset = r.position();
        let marker = Marker::from_u8(r.peek()?);
        if !marker.is_str() {
            if self.options.contains(Options::NON_STR_KEYS) {
                return self.read_any(r);
            }
            return Err(DecodeError::NonStrKey { offset });
        }
        r.skip(1)?;
        let len = match marker {
            Marker::FixStr(n) => usize::from(n),
            Marker::Str8 => usize::from(r.u8()?),
            Marker::Str16 => usize::from(r.u16()?),
            _ => r.u32()? as usize,
        };
        let start = r.position();
        let bytes = r.buf(len)?;
        let key = self
            .keys
            .intern(bytes)
            .map_err(|_| DecodeError::InvalidUtf8 { offset: start })?;
        Ok(Value::Str(key))
    }

    #[inline(never)]
    fn read_ext(
        &mut self,
        r: &mut Reader<'_>,
        len: usize,
        offset: usize,
    ) -> Result<Value, DecodeError> {
        let tag = r.i8()?;
        let data = r.buf(len)?;
        match self.ext_hook.as_deref_mut() {
            Some(hook) => hook(tag, data).map_err(|source| {
                debug!(tag, error = %source, "ext hook failed");
                DecodeError::ExtHook { tag, source }
            }),
            None => Err(DecodeError::UnhandledExt { tag, offset }),
        }
    }
}
