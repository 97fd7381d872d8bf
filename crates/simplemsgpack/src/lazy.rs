//! Pointer navigation over packed bytes.
//!
//! A [`LazyView`] walks containers by reading headers: array elements before
//! the requested index and map values under non-matching keys are skipped,
//! never decoded. Only map keys on the way down and the addressed value
//! itself get materialized.

use simplemsgpack_buffers::Reader;
use simplemsgpack_pointer::{parse_index, parse_pointer};

use crate::decoder::MsgPackDecoder;
use crate::error::{DecodeError, NavigationError};
use crate::header::{read_header, Header};
use crate::value::Value;

/// A packed value whose extent has been checked but which is not decoded.
#[derive(Debug, Clone)]
pub struct LazyView<'a> {
    bytes: &'a [u8],
    decoder: MsgPackDecoder,
}

impl<'a> LazyView<'a> {
    /// Validates the extent of the value at the start of `bytes`. Bytes past
    /// that value are not part of the view.
    pub fn new(decoder: MsgPackDecoder, bytes: &'a [u8]) -> Result<Self, DecodeError> {
        let len = decoder.skip(bytes)?;
        Ok(Self {
            bytes: &bytes[..len],
            decoder,
        })
    }

    /// Encoded bytes of the root value.
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Decodes the whole root value.
    pub fn value(&self) -> Result<Value, DecodeError> {
        self.decoder.decode(self.bytes).map(|(value, _)| value)
    }

    /// Decodes the value at `pointer`; `""` and `"/"` address the root.
    ///
    /// ```
    /// use simplemsgpack::{pack, unpack_lazy, Value};
    ///
    /// let doc = Value::map([("items", Value::from(vec![Value::from(10), Value::from(20)]))]);
    /// let bytes = pack(&doc);
    /// let view = unpack_lazy(&bytes).unwrap();
    /// assert_eq!(view.at_pointer("/items/1").unwrap(), Value::from(20));
    /// assert!(view.at_pointer("/items/2").is_err());
    /// ```
    pub fn at_pointer(&self, pointer: &str) -> Result<Value, NavigationError> {
        let path = parse_pointer(pointer)?;
        self.at_path(&path)
    }

    /// Decodes the value at an already split path of unescaped segments.
    pub fn at_path<S: AsRef<str>>(&self, path: &[S]) -> Result<Value, NavigationError> {
        let raw = self.raw_at_path(path)?;
        let (value, _) = self.decoder.decode(raw)?;
        Ok(value)
    }

    /// Encoded bytes of the value at `pointer`, without decoding it.
    pub fn raw_at_pointer(&self, pointer: &str) -> Result<&'a [u8], NavigationError> {
        let path = parse_pointer(pointer)?;
        self.raw_at_path(&path)
    }

    pub fn raw_at_path<S: AsRef<str>>(&self, path: &[S]) -> Result<&'a [u8], NavigationError> {
        let mut reader = Reader::new(self.bytes);
        let mut depth = 0;
        for segment in path {
            let segment = segment.as_ref();
            depth += 1;
            match read_header(&mut reader)? {
                Header::Array(len) => {
                    let len = len as usize;
                    let index = parse_index(segment)
                        .filter(|&index| index < len)
                        .ok_or_else(|| NavigationError::IndexOutOfRange {
                            segment: segment.to_string(),
                            len,
                        })?;
                    for _ in 0..index {
                        self.decoder.skip_any(&mut reader, depth)?;
                    }
                }
                Header::Map(len) => self.find_key(&mut reader, len, segment, depth)?,
                other => {
                    return Err(NavigationError::TypeMismatch {
                        segment: segment.to_string(),
                        found: other.name(),
                    })
                }
            }
        }
        let start = reader.position();
        self.decoder.skip_any(&mut reader, depth)?;
        Ok(reader.since(start))
    }

    // Leaves the reader on the value of the first pair whose key equals
    // `segment`.
    fn find_key(
        &self,
        reader: &mut Reader<'a>,
        len: u32,
        segment: &str,
        depth: usize,
    ) -> Result<(), NavigationError> {
        for _ in 0..len {
            let key = self.decoder.read_any(reader, depth)?;
            if key.as_bytes() == Some(segment.as_bytes()) {
                return Ok(());
            }
            self.decoder.skip_any(reader, depth)?;
        }
        Err(NavigationError::KeyNotFound {
            segment: segment.to_string(),
        })
    }
}
