//! MessagePack encoding and decoding for a closed [`Value`] model.
//!
//! - [`packb`] / [`packb_with_default`]: [`Value`] to bytes, byte-exact with
//!   reference MessagePack encoders.
//! - [`unpackb`] / [`unpackb_with_ext_hook`]: bytes to [`Value`], with
//!   per-call interning of short map keys.
//! - [`Options`]: flags for non-string keys, big-integer passthrough and the
//!   native numeric-array and record encodings.
//! - [`Fragment`]: pre-encoded bytes embedded verbatim.
//! - [`Ext::from_timestamp`] / [`Ext::to_timestamp`]: the timestamp extension
//!   (type -1) as a `chrono::DateTime<Utc>`.
//!
//! ```
//! use msgpack_codec::{packb, unpackb, Options, Value};
//!
//! let value = Value::map([("a", Value::from(1)), ("b", Value::from("x"))]);
//! let bytes = packb(&value, Options::empty()).unwrap();
//! assert_eq!(unpackb(&bytes, Options::empty()).unwrap(), value);
//! ```

mod error;
mod fragment;
mod host;
mod options;
mod value;

pub mod json;
pub mod msgpack;

pub use error::{BoxError, DecodeError, EncodeError, FragmentError, TimestampError};
pub use fragment::Fragment;
pub use host::{NumericArray, NumericData, Opaque, Record};
pub use json::JsonError;
pub use msgpack::{
    packb, packb_with_default, unpackb, unpackb_with_ext_hook, Decoder, Encoder, KEY_CACHE_CAPACITY,
    KEY_CACHE_MAX_LEN, RECURSION_LIMIT, TIMESTAMP_TAG,
};
pub use options::{
    Options, OPT_NON_STR_KEYS, OPT_PASSTHROUGH_BIG_INT, OPT_SERIALIZE_NUMPY,
    OPT_SERIALIZE_PYDANTIC,
};
pub use value::{Ext, Value};
