use simplemsgpack_pointer::{
    format_pointer, is_root_pointer, parse_index, parse_pointer, PointerError,
};

#[test]
fn pointer_parse_format_roundtrip_matrix() {
    let cases = ["/", "/foo", "/foo/bar", "/a~0b/c~1d", "/arr/0", "/~0/~1", "/3/meta/active"];

    for pointer in cases {
        let path = parse_pointer(pointer).expect("valid pointer");
        assert_eq!(format_pointer(&path), pointer);
    }
}

#[test]
fn pointer_root_matrix() {
    assert!(is_root_pointer(""));
    assert!(is_root_pointer("/"));
    assert!(!is_root_pointer("//"));
    assert_eq!(format_pointer::<String>(&[]), "/");
    assert_eq!(parse_pointer("//").unwrap(), vec![""]);
    assert_eq!(parse_pointer("/3/").unwrap(), vec!["3"]);
}

#[test]
fn pointer_segments_matrix() {
    let path = parse_pointer("/3/name").unwrap();
    assert_eq!(path, vec!["3", "name"]);
    assert_eq!(parse_index(&path[0]), Some(3));
    assert_eq!(parse_index(&path[1]), None);

    let path = parse_pointer("/99/name").unwrap();
    assert_eq!(parse_index(&path[0]), Some(99));
}

#[test]
fn pointer_error_matrix() {
    let err = parse_pointer("name").unwrap_err();
    assert_eq!(err, PointerError::MissingLeadingSlash("name".into()));
    assert_eq!(err.to_string(), "pointer `name` must start with '/'");
}
