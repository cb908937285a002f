//! One-shot helpers over a freshly configured [`Encoder`] / [`Decoder`].

use super::{Decoder, Encoder};
use crate::error::{BoxError, DecodeError, EncodeError};
use crate::{Options, Value};

/// Encodes `value` with no `default` callback.
///
/// ```
/// use msgpack_codec::{packb, Options, Value};
///
/// assert_eq!(packb(&Value::from(-33), Options::empty()).unwrap(), [0xd0, 0xdf]);
/// ```
pub fn packb(value: &Value, options: Options) -> Result<Vec<u8>, EncodeError> {
    Encoder::new(options).encode(value)
}

/// Encodes `value`, handing unsupported host objects (and big integers under
/// [`Options::PASSTHROUGH_BIG_INT`]) to `default`. The returned value is
/// encoded in their place.
pub fn packb_with_default<F>(
    value: &Value,
    options: Options,
    mut default: F,
) -> Result<Vec<u8>, EncodeError>
where
    F: FnMut(&Value) -> Result<Value, BoxError>,
{
    Encoder::new(options).with_default(&mut default).encode(value)
}

/// Decodes exactly one value. Extension values are an error.
pub fn unpackb(data: &[u8], options: Options) -> Result<Value, DecodeError> {
    Decoder::new(options).decode(data)
}

/// Decodes exactly one value, building extension values with `ext_hook`.
pub fn unpackb_with_ext_hook<F>(
    data: &[u8],
    options: Options,
    mut ext_hook: F,
) -> Result<Value, DecodeError>
where
    F: FnMut(i8, &[u8]) -> Result<Value, BoxError>,
{
    Decoder::new(options).with_ext_hook(&mut ext_hook).decode(data)
}
