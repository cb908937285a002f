//! Bounds-checked byte reader with cursor tracking.

use std::str;

use crate::BufferError;

/// A cursor over a borrowed byte slice.
///
/// Reads never panic: running past the end yields
/// [`BufferError::EndOfBuffer`] and leaves the cursor where it was.
///
/// # Example
///
/// ```
/// use msgpack_buffers::Reader;
///
/// let data = [0x01, 0x02, 0x03];
/// let mut reader = Reader::new(&data);
/// assert_eq!(reader.u8().unwrap(), 0x01);
/// assert_eq!(reader.u16().unwrap(), 0x0203);
/// assert!(reader.u8().is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    uint8: &'a [u8],
    x: usize,
}

macro_rules! read_be {
    ($(#[$doc:meta])* $name:ident, $ty:ty, $n:literal) => {
        $(#[$doc])*
        #[inline]
        pub fn $name(&mut self) -> Result<$ty, BufferError> {
            let bytes = self.array::<$n>()?;
            Ok(<$ty>::from_be_bytes(bytes))
        }
    };
}

impl<'a> Reader<'a> {
    pub fn new(uint8: &'a [u8]) -> Self {
        Self { uint8, x: 0 }
    }

    /// Current cursor offset from the start of the input.
    #[inline]
    pub fn position(&self) -> usize {
        self.x
    }

    /// Number of bytes left after the cursor.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.uint8.len() - self.x
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.x >= self.uint8.len()
    }

    /// Whole input slice, independent of the cursor.
    pub fn source(&self) -> &'a [u8] {
        self.uint8
    }

    #[inline]
    fn check(&self, n: usize) -> Result<(), BufferError> {
        if n > self.remaining() {
            Err(BufferError::EndOfBuffer {
                offset: self.x,
                needed: n,
                remaining: self.remaining(),
            })
        } else {
            Ok(())
        }
    }

    /// Returns the next byte without advancing.
    pub fn peek(&self) -> Result<u8, BufferError> {
        self.check(1)?;
        Ok(self.uint8[self.x])
    }

    /// Advances the cursor by `n` bytes.
    pub fn skip(&mut self, n: usize) -> Result<(), BufferError> {
        self.check(n)?;
        self.x += n;
        Ok(())
    }

    #[inline]
    fn array<const N: usize>(&mut self) -> Result<[u8; N], BufferError> {
        self.check(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(&self.uint8[self.x..self.x + N]);
        self.x += N;
        Ok(out)
    }

    #[inline]
    pub fn u8(&mut self) -> Result<u8, BufferError> {
        self.check(1)?;
        let val = self.uint8[self.x];
        self.x += 1;
        Ok(val)
    }

    #[inline]
    pub fn i8(&mut self) -> Result<i8, BufferError> {
        self.u8().map(|b| b as i8)
    }

    read_be!(u16, u16, 2);
    read_be!(i16, i16, 2);
    read_be!(u32, u32, 4);
    read_be!(i32, i32, 4);
    read_be!(u64, u64, 8);
    read_be!(i64, i64, 8);
    read_be!(f32, f32, 4);
    read_be!(f64, f64, 8);

    /// Borrows the next `size` bytes and advances past them.
    pub fn buf(&mut self, size: usize) -> Result<&'a [u8], BufferError> {
        self.check(size)?;
        let start = self.x;
        self.x += size;
        Ok(&self.uint8[start..self.x])
    }

    /// Borrows the next `size` bytes as UTF-8 text.
    ///
    /// On invalid UTF-8 the cursor is not advanced.
    pub fn utf8(&mut self, size: usize) -> Result<&'a str, BufferError> {
        self.check(size)?;
        let start = self.x;
        let text = str::from_utf8(&self.uint8[start..start + size])
            .map_err(|_| BufferError::InvalidUtf8 { offset: start })?;
        self.x += size;
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_big_endian_integers() {
        let data = [0xff, 0xfe, 0x00, 0x00, 0x01, 0x00];
        let mut reader = Reader::new(&data);
        assert_eq!(reader.i16().unwrap(), -2);
        assert_eq!(reader.u32().unwrap(), 256);
        assert!(reader.is_eof());
    }

    #[test]
    fn end_of_buffer_reports_offset_and_keeps_cursor() {
        let data = [0x01, 0x02];
        let mut reader = Reader::new(&data);
        reader.u8().unwrap();
        let err = reader.u32().unwrap_err();
        assert_eq!(
            err,
            BufferError::EndOfBuffer {
                offset: 1,
                needed: 4,
                remaining: 1
            }
        );
        assert_eq!(reader.position(), 1);
    }

    #[test]
    fn huge_length_is_rejected_without_overflow() {
        let data = [0x00];
        let mut reader = Reader::new(&data);
        assert!(reader.buf(usize::MAX).is_err());
        assert_eq!(reader.remaining(), 1);
    }

    #[test]
    fn utf8_rejects_invalid_sequences() {
        let data = [0xc3, 0x28];
        let mut reader = Reader::new(&data);
        assert_eq!(
            reader.utf8(2).unwrap_err(),
            BufferError::InvalidUtf8 { offset: 0 }
        );
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn peek_does_not_advance() {
        let data = [0x2a];
        let mut reader = Reader::new(&data);
        assert_eq!(reader.peek().unwrap(), 0x2a);
        assert_eq!(reader.u8().unwrap(), 0x2a);
        assert!(reader.peek().is_err());
    }
}
