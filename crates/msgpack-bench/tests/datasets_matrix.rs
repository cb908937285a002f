use msgpack_bench::{datasets, ARRAY_LEN, USER_COUNT};
use msgpack_codec::{packb, unpackb, Options, Value};

#[test]
fn dataset_names_and_sizes() {
    let sets = datasets(0);
    let names: Vec<&str> = sets.iter().map(|(n, _)| *n).collect();
    assert_eq!(
        names,
        ["dict", "pydantic", "bool", "float", "int", "numpy.bool", "numpy.float", "numpy.int"]
    );
    for (name, value) in &sets {
        let expected = if matches!(*name, "dict" | "pydantic") {
            USER_COUNT
        } else {
            ARRAY_LEN
        };
        let len = match value {
            Value::Array(items) => items.len(),
            Value::NumericArray(arr) => arr.data().len(),
            other => panic!("{name}: unexpected {}", other.type_name()),
        };
        assert_eq!(len, expected, "{name}");
    }
}

#[test]
fn same_seed_same_data() {
    assert_eq!(datasets(42), datasets(42));
    assert_ne!(datasets(1)[0].1, datasets(2)[0].1);
}

#[test]
fn native_and_plain_encodings_agree() {
    let options = Options::SERIALIZE_NUMPY | Options::SERIALIZE_PYDANTIC;
    let sets = datasets(5);
    let bytes = |name: &str| {
        let (_, value) = sets.iter().find(|(n, _)| *n == name).expect("dataset");
        packb(value, options).expect("encode")
    };
    assert_eq!(bytes("dict"), bytes("pydantic"));
    assert_eq!(bytes("bool"), bytes("numpy.bool"));
    assert_eq!(bytes("float"), bytes("numpy.float"));
    assert_eq!(bytes("int"), bytes("numpy.int"));
}

#[test]
fn dict_dataset_roundtrips() {
    let (_, dict) = datasets(9).into_iter().next().expect("dict");
    let bytes = packb(&dict, Options::empty()).expect("encode");
    assert_eq!(unpackb(&bytes, Options::empty()).expect("decode"), dict);
}
