use msgpack_codec::{packb, unpackb, Fragment, Options, Value};
use proptest::prelude::*;

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Nil),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        any::<u64>().prop_map(Value::from),
        any::<f64>()
            .prop_filter("NaN never equals itself", |f| !f.is_nan())
            .prop_map(Value::from),
        ".{0,40}".prop_map(Value::from),
        proptest::collection::vec(any::<u8>(), 0..40).prop_map(Value::from),
    ]
}

fn value() -> impl Strategy<Value = Value> {
    scalar().prop_recursive(4, 64, 8, |inner| {
        prop_oneof![
            proptest::collection::vec(inner.clone(), 0..8).prop_map(Value::Array),
            proptest::collection::vec(("[a-z_]{0,12}", inner), 0..8).prop_map(Value::map),
        ]
    })
}

proptest! {
    #[test]
    fn encode_then_decode_is_identity(v in value()) {
        let bytes = packb(&v, Options::empty()).unwrap();
        prop_assert_eq!(unpackb(&bytes, Options::empty()).unwrap(), v);
    }

    #[test]
    fn encoded_values_are_valid_fragments(v in value()) {
        let bytes = packb(&v, Options::empty()).unwrap();
        let fragment = Fragment::new(bytes.clone()).unwrap();
        prop_assert_eq!(packb(&Value::from(fragment), Options::empty()).unwrap(), bytes);
    }

    #[test]
    fn arbitrary_bytes_never_panic(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
        let decoded = unpackb(&bytes, Options::NON_STR_KEYS);
        let validated = Fragment::new(bytes.clone());
        if decoded.is_ok() {
            prop_assert!(validated.is_ok());
        }
    }
}
