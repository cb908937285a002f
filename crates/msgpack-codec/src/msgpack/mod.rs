//! MessagePack encoder/decoder family.

pub mod decoder;
pub mod encoder;
pub mod key_cache;
pub mod marker;
pub mod timestamp;
pub mod util;
pub(crate) mod validator;

/// Maximum nesting of containers and `default` calls, shared by the encoder,
/// the decoder and fragment validation.
pub const RECURSION_LIMIT: usize = 255;

pub use decoder::{Decoder, ExtHookFn};
pub use encoder::{DefaultFn, Encoder};
pub use key_cache::{KEY_CACHE_CAPACITY, KEY_CACHE_MAX_LEN};
pub use marker::Marker;
pub use timestamp::TIMESTAMP_TAG;
pub use util::{packb, packb_with_default, unpackb, unpackb_with_ext_hook};
