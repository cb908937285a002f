use msgpack_buffers::{BufferError, Reader, Writer};
use proptest::prelude::*;

proptest! {
    #[test]
    fn mixed_width_values_read_back_in_order(a in any::<u8>(), b in any::<i16>(), c in any::<u32>(), d in any::<i64>(), e in any::<f64>()) {
        let mut writer = Writer::new();
        writer.u8(a);
        writer.i16(b);
        writer.u32(c);
        writer.i64(d);
        writer.u8f64(0xcb, e);
        let bytes = writer.flush();

        let mut reader = Reader::new(&bytes);
        prop_assert_eq!(reader.u8().unwrap(), a);
        prop_assert_eq!(reader.i16().unwrap(), b);
        prop_assert_eq!(reader.u32().unwrap(), c);
        prop_assert_eq!(reader.i64().unwrap(), d);
        prop_assert_eq!(reader.u8().unwrap(), 0xcb);
        prop_assert_eq!(reader.f64().unwrap().to_bits(), e.to_bits());
        prop_assert!(reader.is_eof());
    }

    #[test]
    fn truncated_input_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..8), want in 0usize..16) {
        let mut reader = Reader::new(&bytes);
        match reader.buf(want) {
            Ok(slice) => prop_assert_eq!(slice.len(), want),
            Err(BufferError::EndOfBuffer { remaining, .. }) => prop_assert_eq!(remaining, bytes.len()),
            Err(other) => prop_assert!(false, "unexpected error {other:?}"),
        }
    }
}
