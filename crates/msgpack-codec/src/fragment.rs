//! Pre-encoded MessagePack values embedded verbatim by the encoder.

use std::sync::Arc;

use crate::error::FragmentError;
use crate::msgpack::validator;

/// Bytes known to hold exactly one well-formed MessagePack value.
///
/// Validation happens once, in [`Fragment::new`]; the encoder copies the bytes
/// into its output without a header. Cloning shares the buffer.
///
/// ```
/// use msgpack_codec::{packb, Fragment, Options, Value};
///
/// let fragment = Fragment::new(vec![0x92, 0x01, 0x02]).unwrap();
/// let bytes = packb(&Value::Array(vec![fragment.into()]), Options::empty()).unwrap();
/// assert_eq!(bytes, [0x91, 0x92, 0x01, 0x02]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fragment(Arc<[u8]>);

impl Fragment {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self, FragmentError> {
        let bytes = bytes.into();
        validator::validate(&bytes)?;
        Ok(Self(Arc::from(bytes)))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false: a valid fragment holds at least one marker byte.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for Fragment {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl TryFrom<Vec<u8>> for Fragment {
    type Error = FragmentError;

    fn try_from(bytes: Vec<u8>) -> Result<Self, Self::Error> {
        Self::new(bytes)
    }
}

impl TryFrom<&[u8]> for Fragment {
    type Error = FragmentError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::new(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_bytes_verbatim() {
        let fragment = Fragment::try_from(&[0xa3, b'a', b'b', b'c'][..]).unwrap();
        assert_eq!(fragment.as_bytes(), b"\xa3abc");
        assert_eq!(fragment.len(), 4);
    }

    #[test]
    fn rejects_two_values() {
        let err = Fragment::new(vec![0xc3, 0xc3]).unwrap_err();
        assert_eq!(
            err,
            FragmentError::TrailingBytes {
                offset: 1,
                remaining: 1
            }
        );
    }
}
