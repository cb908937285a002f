//! Error kinds for encoding, decoding and fragment construction.

use msgpack_buffers::BufferError;
use thiserror::Error;

/// Error type returned by caller-supplied `default` and `ext_hook` callbacks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure while turning a [`Value`](crate::Value) into MessagePack bytes.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("type is not msgpack serializable: {type_name}")]
    UnsupportedType { type_name: &'static str },
    #[error("map key must be str, got {type_name}")]
    NonStrKey { type_name: &'static str },
    #[error("map key of type {type_name} is not serializable with NON_STR_KEYS")]
    InvalidKey { type_name: &'static str },
    #[error("integer does not fit in 64 bits: {value}")]
    IntegerOutOfRange { value: i128 },
    #[error("default callback failed for {type_name}: {source}")]
    Default {
        type_name: &'static str,
        #[source]
        source: BoxError,
    },
    #[error("numeric array is malformed: shape {shape:?} does not hold {len} elements")]
    MalformedArray { shape: Vec<usize>, len: usize },
    #[error("{kind} of length {len} exceeds the 32-bit MessagePack limit")]
    TooLarge { kind: &'static str, len: usize },
    #[error("recursion limit reached")]
    RecursionLimit,
}

/// Failure while parsing MessagePack bytes into a [`Value`](crate::Value).
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("unexpected end of input at offset {offset}")]
    UnexpectedEof { offset: usize },
    #[error("invalid marker 0x{marker:02x} at offset {offset}")]
    InvalidMarker { marker: u8, offset: usize },
    #[error("invalid UTF-8 string at offset {offset}")]
    InvalidUtf8 { offset: usize },
    #[error("declared length {declared} at offset {offset} exceeds the {remaining} bytes left")]
    LengthExceedsInput {
        declared: usize,
        remaining: usize,
        offset: usize,
    },
    #[error("map key at offset {offset} is not a string")]
    NonStrKey { offset: usize },
    #[error("extension type {tag} at offset {offset} needs an ext_hook")]
    UnhandledExt { tag: i8, offset: usize },
    #[error("ext_hook failed for extension type {tag}: {source}")]
    ExtHook {
        tag: i8,
        #[source]
        source: BoxError,
    },
    #[error("recursion limit reached")]
    RecursionLimit,
    #[error("{remaining} trailing bytes after the value at offset {offset}")]
    TrailingBytes { offset: usize, remaining: usize },
}

impl From<BufferError> for DecodeError {
    fn from(err: BufferError) -> Self {
        match err {
            BufferError::EndOfBuffer { offset, .. } => DecodeError::UnexpectedEof { offset },
            BufferError::InvalidUtf8 { offset } => DecodeError::InvalidUtf8 { offset },
        }
    }
}

/// Bytes handed to [`Fragment::new`](crate::Fragment::new) are not exactly one
/// well-formed MessagePack value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FragmentError {
    #[error("unexpected end of input at offset {offset}")]
    UnexpectedEof { offset: usize },
    #[error("invalid marker 0x{marker:02x} at offset {offset}")]
    InvalidMarker { marker: u8, offset: usize },
    #[error("invalid UTF-8 string at offset {offset}")]
    InvalidUtf8 { offset: usize },
    #[error("invalid timestamp extension payload at offset {offset}")]
    InvalidTimestamp { offset: usize },
    #[error("recursion limit reached")]
    RecursionLimit,
    #[error("{remaining} trailing bytes after the value at offset {offset}")]
    TrailingBytes { offset: usize, remaining: usize },
}

impl From<BufferError> for FragmentError {
    fn from(err: BufferError) -> Self {
        match err {
            BufferError::EndOfBuffer { offset, .. } => FragmentError::UnexpectedEof { offset },
            BufferError::InvalidUtf8 { offset } => FragmentError::InvalidUtf8 { offset },
        }
    }
}

/// An [`Ext`](crate::Ext) does not hold a MessagePack timestamp.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TimestampError {
    #[error("extension type {tag} is not a timestamp")]
    NotTimestamp { tag: i8 },
    #[error("timestamp payload is {len} bytes, expected 4, 8 or 12")]
    InvalidLength { len: usize },
    #[error("timestamp {seconds}s {nanoseconds}ns is out of range")]
    OutOfRange { seconds: i64, nanoseconds: u32 },
}
