use serde_json::json;
use simplemsgpack::{
    pack, unpack_lazy, DecodeError, LazyView, MsgPackDecoder, NavigationError, Registry, Value,
};

fn data() -> Value {
    Value::from(json!([
        {"id": 1, "name": "Alpha"},
        {"id": 2, "name": "Beta"},
        {"id": 3, "name": "Gamma"},
        {"id": 4, "name": "Delta", "meta": {"active": true}}
    ]))
}

#[test]
fn lazy_pointer_navigation_matrix() {
    let packed = pack(&data());
    let lazy = unpack_lazy(&packed).unwrap();

    assert_eq!(lazy.at_pointer("/3/name").unwrap(), Value::from("Delta"));
    assert_eq!(lazy.at_pointer("/3/meta/active").unwrap(), Value::Bool(true));
    assert_eq!(
        lazy.at_pointer("/3").unwrap(),
        Value::from(json!({"id": 4, "name": "Delta", "meta": {"active": true}}))
    );
    assert_eq!(lazy.at_pointer("/").unwrap(), data());
    assert_eq!(lazy.at_pointer("").unwrap(), data());
    assert_eq!(lazy.value().unwrap(), data());
    assert_eq!(lazy.at_path(&["0", "id"]).unwrap(), Value::from(1));
}

#[test]
fn lazy_pointer_trailing_slash_matrix() {
    let packed = pack(&data());
    let lazy = unpack_lazy(&packed).unwrap();
    assert_eq!(
        lazy.at_pointer("/0/").unwrap(),
        Value::from(json!({"id": 1, "name": "Alpha"}))
    );
    assert_eq!(
        lazy.at_pointer("/3/meta/").unwrap(),
        Value::from(json!({"active": true}))
    );
    assert_eq!(lazy.raw_at_pointer("/3/").unwrap(), lazy.raw_at_pointer("/3").unwrap());
    match lazy.at_pointer("/0//") {
        Err(NavigationError::KeyNotFound { segment }) => assert_eq!(segment, ""),
        other => panic!("expected KeyNotFound, got {other:?}"),
    }
}

#[test]
fn lazy_pointer_error_matrix() {
    let packed = pack(&data());
    let lazy = unpack_lazy(&packed).unwrap();

    match lazy.at_pointer("/99/name") {
        Err(NavigationError::IndexOutOfRange { segment, len }) => {
            assert_eq!(segment, "99");
            assert_eq!(len, 4);
        }
        other => panic!("expected IndexOutOfRange, got {other:?}"),
    }
    match lazy.at_pointer("/0/nope") {
        Err(err @ NavigationError::KeyNotFound { .. }) => {
            assert_eq!(err.to_string(), "at_pointer: key `nope` not found");
        }
        other => panic!("expected KeyNotFound, got {other:?}"),
    }
    match lazy.at_pointer("/0/name/foo") {
        Err(NavigationError::TypeMismatch { segment, found }) => {
            assert_eq!(segment, "foo");
            assert_eq!(found, "str");
        }
        other => panic!("expected TypeMismatch, got {other:?}"),
    }
    assert!(matches!(
        lazy.at_pointer("3/name"),
        Err(NavigationError::InvalidPointer(_))
    ));
    assert!(matches!(
        lazy.at_pointer("/name"),
        Err(NavigationError::IndexOutOfRange { .. })
    ));
}

#[test]
fn lazy_raw_slices_match_encoder() {
    let packed = pack(&data());
    let lazy = unpack_lazy(&packed).unwrap();
    let delta = Value::from(json!({"id": 4, "name": "Delta", "meta": {"active": true}}));
    assert_eq!(lazy.raw_at_pointer("/3").unwrap(), pack(&delta));
    assert_eq!(lazy.raw_at_pointer("/3/meta/active").unwrap(), [0xc3]);
    assert_eq!(lazy.raw_at_pointer("/").unwrap(), packed);
}

#[test]
fn lazy_skips_siblings_it_cannot_decode() {
    // The first element is an ext with no registered unpacker. Navigation
    // only skips it, so reaching its sibling still works.
    let bytes = [0x92, 0xd4, 0x09, 0x00, 0xa2, b'o', b'k'];
    let lazy = LazyView::new(MsgPackDecoder::with_registry(&Registry::new()), &bytes).unwrap();
    assert_eq!(lazy.at_pointer("/1").unwrap(), Value::from("ok"));
    assert!(matches!(
        lazy.at_pointer("/0"),
        Err(NavigationError::Decode(DecodeError::UnknownExtType { type_id: 9 }))
    ));
    assert!(matches!(
        lazy.at_pointer("/0/x"),
        Err(NavigationError::TypeMismatch { found: "ext", .. })
    ));
}

#[test]
fn lazy_map_keys_compare_by_value() {
    // non-string keys are decoded and never match a segment
    let doc = Value::Map(vec![
        (Value::from(1), Value::from("int key")),
        (Value::from("1"), Value::from("str key")),
    ]);
    let packed = pack(&doc);
    let lazy = unpack_lazy(&packed).unwrap();
    assert_eq!(lazy.at_pointer("/1").unwrap(), Value::from("str key"));

    let dupes = Value::Map(vec![
        (Value::from("k"), Value::from(1)),
        (Value::from("k"), Value::from(2)),
    ]);
    let packed = pack(&dupes);
    assert_eq!(unpack_lazy(&packed).unwrap().at_pointer("/k").unwrap(), Value::from(1));
}

#[test]
fn lazy_rejects_incomplete_and_malformed_roots() {
    let packed = pack(&data());
    let err = unpack_lazy(&packed[..packed.len() - 1]).unwrap_err();
    assert!(err.is_incomplete());
    assert!(matches!(
        unpack_lazy(&[0x91, 0xc1]),
        Err(DecodeError::Malformed { offset: 1, byte: 0xc1 })
    ));
}

#[test]
fn lazy_view_is_reusable_and_skip_matches_decode() {
    let packed = pack(&data());
    let lazy = unpack_lazy(&packed).unwrap();
    for _ in 0..3 {
        assert_eq!(lazy.at_pointer("/2/name").unwrap(), Value::from("Gamma"));
    }
    let decoder = MsgPackDecoder::with_registry(&Registry::new());
    for index in 0..4 {
        let raw = lazy.raw_at_pointer(&format!("/{index}")).unwrap();
        assert_eq!(decoder.skip(raw).unwrap(), raw.len());
        assert_eq!(decoder.decode(raw).unwrap().1, raw.len());
    }
}
