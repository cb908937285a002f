//! Growable byte writer.

/// A binary output buffer that grows as needed.
///
/// Multi-byte integers and floats are written big-endian, which is the byte
/// order every MessagePack length and scalar uses.
///
/// # Example
///
/// ```
/// use msgpack_buffers::Writer;
///
/// let mut writer = Writer::new();
/// writer.u8(0x01);
/// writer.u16(0x0203);
/// assert_eq!(writer.flush(), [0x01, 0x02, 0x03]);
/// ```
#[derive(Debug, Default, Clone)]
pub struct Writer {
    uint8: Vec<u8>,
}

impl Writer {
    /// Initial allocation used by [`Writer::new`].
    pub const DEFAULT_CAPACITY: usize = 1024;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            uint8: Vec::with_capacity(capacity),
        }
    }

    /// Number of bytes written since the last flush.
    pub fn len(&self) -> usize {
        self.uint8.len()
    }

    pub fn is_empty(&self) -> bool {
        self.uint8.is_empty()
    }

    /// View of the bytes written so far.
    pub fn as_slice(&self) -> &[u8] {
        &self.uint8
    }

    /// Makes room for at least `capacity` more bytes.
    pub fn ensure_capacity(&mut self, capacity: usize) {
        self.uint8.reserve(capacity);
    }

    /// Discards everything written so far, keeping the allocation.
    pub fn reset(&mut self) {
        self.uint8.clear();
    }

    /// Returns the written bytes and leaves the writer empty.
    pub fn flush(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.uint8)
    }

    #[inline]
    pub fn u8(&mut self, val: u8) {
        self.uint8.push(val);
    }

    #[inline]
    pub fn i8(&mut self, val: i8) {
        self.uint8.push(val as u8);
    }

    #[inline]
    pub fn u16(&mut self, val: u16) {
        self.uint8.extend_from_slice(&val.to_be_bytes());
    }

    #[inline]
    pub fn i16(&mut self, val: i16) {
        self.uint8.extend_from_slice(&val.to_be_bytes());
    }

    #[inline]
    pub fn u32(&mut self, val: u32) {
        self.uint8.extend_from_slice(&val.to_be_bytes());
    }

    #[inline]
    pub fn i32(&mut self, val: i32) {
        self.uint8.extend_from_slice(&val.to_be_bytes());
    }

    #[inline]
    pub fn u64(&mut self, val: u64) {
        self.uint8.extend_from_slice(&val.to_be_bytes());
    }

    #[inline]
    pub fn i64(&mut self, val: i64) {
        self.uint8.extend_from_slice(&val.to_be_bytes());
    }

    /// Writes a marker byte followed by a big-endian `u8` payload.
    #[inline]
    pub fn u8u8(&mut self, marker: u8, val: u8) {
        self.uint8.extend_from_slice(&[marker, val]);
    }

    /// Writes a marker byte followed by a big-endian `u16`.
    #[inline]
    pub fn u8u16(&mut self, marker: u8, val: u16) {
        let [a, b] = val.to_be_bytes();
        self.uint8.extend_from_slice(&[marker, a, b]);
    }

    /// Writes a marker byte followed by a big-endian `u32`.
    #[inline]
    pub fn u8u32(&mut self, marker: u8, val: u32) {
        self.uint8.push(marker);
        self.u32(val);
    }

    /// Writes a marker byte followed by a big-endian `u64`.
    #[inline]
    pub fn u8u64(&mut self, marker: u8, val: u64) {
        self.uint8.push(marker);
        self.u64(val);
    }

    /// Writes a marker byte followed by a big-endian `i64`.
    #[inline]
    pub fn u8i64(&mut self, marker: u8, val: i64) {
        self.uint8.push(marker);
        self.i64(val);
    }

    /// Writes a marker byte followed by a big-endian `f32`.
    #[inline]
    pub fn u8f32(&mut self, marker: u8, val: f32) {
        self.uint8.push(marker);
        self.uint8.extend_from_slice(&val.to_be_bytes());
    }

    /// Writes a marker byte followed by a big-endian `f64`.
    #[inline]
    pub fn u8f64(&mut self, marker: u8, val: f64) {
        self.uint8.push(marker);
        self.uint8.extend_from_slice(&val.to_be_bytes());
    }

    /// Writes raw bytes.
    #[inline]
    pub fn buf(&mut self, buf: &[u8]) {
        self.uint8.extend_from_slice(buf);
    }

    /// Writes the UTF-8 bytes of `s` and returns how many were written.
    #[inline]
    pub fn utf8(&mut self, s: &str) -> usize {
        self.uint8.extend_from_slice(s.as_bytes());
        s.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u8() {
        let mut writer = Writer::new();
        writer.u8(0x01);
        writer.u8(0x02);
        assert_eq!(writer.flush(), [0x01, 0x02]);
    }

    #[test]
    fn test_u16_big_endian() {
        let mut writer = Writer::new();
        writer.u16(0x0102);
        assert_eq!(writer.flush(), [0x01, 0x02]);
    }

    #[test]
    fn test_marker_helpers() {
        let mut writer = Writer::new();
        writer.u8u16(0xcd, 0x0100);
        writer.u8u32(0xce, 0x0001_0000);
        assert_eq!(
            writer.flush(),
            [0xcd, 0x01, 0x00, 0xce, 0x00, 0x01, 0x00, 0x00]
        );
    }

    #[test]
    fn test_i8_negative() {
        let mut writer = Writer::new();
        writer.i8(-1);
        writer.i8(-2);
        assert_eq!(writer.flush(), [0xff, 0xfe]);
    }

    #[test]
    fn test_u8f64() {
        let mut writer = Writer::new();
        writer.u8f64(0xcb, 1.0);
        assert_eq!(
            writer.flush(),
            [0xcb, 0x3f, 0xf0, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]
        );
    }

    #[test]
    fn test_flush_leaves_writer_empty() {
        let mut writer = Writer::new();
        writer.u8(0x01);
        assert_eq!(writer.flush(), [0x01]);
        assert!(writer.is_empty());
        writer.u8(0x02);
        assert_eq!(writer.flush(), [0x02]);
    }

    #[test]
    fn test_utf8_returns_byte_count() {
        let mut writer = Writer::new();
        let n = writer.utf8("café");
        let data = writer.flush();
        assert_eq!(n, 5);
        assert_eq!(std::str::from_utf8(&data).unwrap(), "café");
    }
}
