//! Path syntax for addressing values inside packed MessagePack buffers.
//!
//! Paths look like JSON Pointers (RFC 6901): `/seg/seg/...`, with `~1`
//! standing for `/` and `~0` for `~` inside a segment. Unlike RFC 6901, a
//! lone `/` addresses the root (as does the empty string), so a top-level
//! empty key cannot be addressed, and a single trailing `/` is dropped:
//! `/a/` is the same path as `/a`.
//!
//! Segments stay strings here; whether a segment is an array index or a map
//! key is decided by the container it is applied to.
//!
//! # Example
//!
//! ```
//! use simplemsgpack_pointer::{format_pointer, parse_index, parse_pointer};
//!
//! let path = parse_pointer("/3/meta/a~1b").unwrap();
//! assert_eq!(path, vec!["3", "meta", "a/b"]);
//! assert_eq!(parse_index(&path[0]), Some(3));
//! assert_eq!(format_pointer(&path), "/3/meta/a~1b");
//!
//! assert!(parse_pointer("/").unwrap().is_empty());
//! assert!(parse_pointer("3/meta").is_err());
//! ```

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PointerError {
    #[error("pointer `{0}` must start with '/'")]
    MissingLeadingSlash(String),
}

/// Unescapes a path segment: `~1` becomes `/` and `~0` becomes `~`.
///
/// A `~` not followed by `0` or `1` is kept literally.
///
/// ```
/// use simplemsgpack_pointer::unescape_component;
///
/// assert_eq!(unescape_component("a~0b"), "a~b");
/// assert_eq!(unescape_component("c~1d"), "c/d");
/// assert_eq!(unescape_component("~01"), "~1");
/// assert_eq!(unescape_component("x~"), "x~");
/// ```
pub fn unescape_component(component: &str) -> String {
    if !component.contains('~') {
        return component.to_string();
    }
    let mut out = String::with_capacity(component.len());
    let mut chars = component.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '~' {
            match chars.peek() {
                Some('0') => {
                    out.push('~');
                    chars.next();
                    continue;
                }
                Some('1') => {
                    out.push('/');
                    chars.next();
                    continue;
                }
                _ => {}
            }
        }
        out.push(c);
    }
    out
}

/// Escapes a path segment: `~` becomes `~0` and `/` becomes `~1`.
///
/// ```
/// use simplemsgpack_pointer::escape_component;
///
/// assert_eq!(escape_component("a~b"), "a~0b");
/// assert_eq!(escape_component("c/d"), "c~1d");
/// ```
pub fn escape_component(component: &str) -> String {
    if !component.contains('/') && !component.contains('~') {
        return component.to_string();
    }
    // `~` first, otherwise the `~` of a fresh `~1` would be escaped again.
    component.replace('~', "~0").replace('/', "~1")
}

/// Parses a pointer into unescaped segments.
///
/// `""` and `"/"` both yield the empty (root) path. One trailing `/` adds no
/// segment, so `"/a/"` parses as `["a"]` and `"/a//"` as `["a", ""]`.
///
/// # Errors
///
/// [`PointerError::MissingLeadingSlash`] when a non-root pointer does not
/// start with `/`.
pub fn parse_pointer(pointer: &str) -> Result<Vec<String>, PointerError> {
    if is_root_pointer(pointer) {
        return Ok(Vec::new());
    }
    let Some(rest) = pointer.strip_prefix('/') else {
        return Err(PointerError::MissingLeadingSlash(pointer.to_string()));
    };
    let rest = rest.strip_suffix('/').unwrap_or(rest);
    Ok(rest.split('/').map(unescape_component).collect())
}

/// Formats segments back into a pointer; the root path formats as `/`.
pub fn format_pointer<S: AsRef<str>>(path: &[S]) -> String {
    if path.is_empty() {
        return "/".to_string();
    }
    let mut out = String::new();
    for component in path {
        out.push('/');
        out.push_str(&escape_component(component.as_ref()));
    }
    out
}

/// Returns `true` for the pointers that address the root value.
pub fn is_root_pointer(pointer: &str) -> bool {
    pointer.is_empty() || pointer == "/"
}

/// Interprets a segment as an array index.
///
/// Only non-empty runs of ASCII digits qualify; leading zeros are accepted.
/// Returns `None` for anything else, including values that overflow `usize`.
///
/// ```
/// use simplemsgpack_pointer::parse_index;
///
/// assert_eq!(parse_index("0"), Some(0));
/// assert_eq!(parse_index("007"), Some(7));
/// assert_eq!(parse_index("-1"), None);
/// assert_eq!(parse_index("1.5"), None);
/// assert_eq!(parse_index(""), None);
/// ```
pub fn parse_index(segment: &str) -> Option<usize> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}
