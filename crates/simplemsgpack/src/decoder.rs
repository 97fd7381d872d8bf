//! `MsgPackDecoder`: eager decoding of one value, plus skipping.
//!
//! Both walks go through [`read_header`], so the number of bytes a skip
//! consumes always equals what a decode of the same value consumes.

use std::sync::Arc;

use simplemsgpack_buffers::Reader;

use crate::error::DecodeError;
use crate::header::{read_header, Header};
use crate::options::{TrailingBytes, UnpackOptions};
use crate::registry::{ExtTables, Registry};
use crate::value::Value;

#[derive(Debug, Clone)]
pub struct MsgPackDecoder {
    ext: Arc<ExtTables>,
    options: UnpackOptions,
}

impl Default for MsgPackDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl MsgPackDecoder {
    /// A decoder over the current state of the global registry.
    pub fn new() -> Self {
        Self::with_registry(Registry::global())
    }

    pub fn with_registry(registry: &Registry) -> Self {
        Self::with_tables(registry.snapshot())
    }

    pub fn with_tables(ext: Arc<ExtTables>) -> Self {
        Self {
            ext,
            options: UnpackOptions::default(),
        }
    }

    pub fn with_options(mut self, options: UnpackOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &UnpackOptions {
        &self.options
    }

    /// Decodes the value at the start of `input`, returning it together with
    /// the number of bytes it occupies. Trailing bytes are not looked at.
    pub fn decode(&self, input: &[u8]) -> Result<(Value, usize), DecodeError> {
        self.decode_at(input, 0)
    }

    /// Like [`decode`](Self::decode) but starting at `offset`; the returned
    /// length counts from `offset`. Error offsets are absolute.
    pub fn decode_at(&self, input: &[u8], offset: usize) -> Result<(Value, usize), DecodeError> {
        let mut reader = Reader::at(input, offset);
        let value = self.read_any(&mut reader, 0)?;
        Ok((value, reader.position() - offset))
    }

    /// Decodes exactly one value and applies the trailing-bytes policy.
    pub fn unpack(&self, input: &[u8]) -> Result<Value, DecodeError> {
        let (value, consumed) = self.decode(input)?;
        if self.options.trailing == TrailingBytes::Reject && consumed < input.len() {
            return Err(DecodeError::TrailingBytes {
                offset: consumed,
                remaining: input.len() - consumed,
            });
        }
        Ok(value)
    }

    /// Measures the value at the start of `input` without building it.
    pub fn skip(&self, input: &[u8]) -> Result<usize, DecodeError> {
        let mut reader = Reader::new(input);
        self.skip_any(&mut reader, 0)?;
        Ok(reader.position())
    }

    pub(crate) fn read_any(&self, reader: &mut Reader<'_>, depth: usize) -> Result<Value, DecodeError> {
        let header = read_header(reader)?;
        self.read_body(reader, header, depth)
    }

    /// Finishes decoding a value whose header was already consumed.
    pub(crate) fn read_body(
        &self,
        reader: &mut Reader<'_>,
        header: Header,
        depth: usize,
    ) -> Result<Value, DecodeError> {
        let value = match header {
            Header::Nil => Value::Nil,
            Header::Bool(b) => Value::Bool(b),
            Header::Int(n) => Value::Int(n),
            Header::Float(f) => Value::Float(f),
            Header::Str(len) | Header::Bin(len) => Value::Bytes(reader.buf(len as usize)?.to_vec()),
            Header::Array(len) => {
                let depth = self.enter(depth)?;
                let len = len as usize;
                let mut items = Vec::with_capacity(len.min(reader.remaining()));
                for _ in 0..len {
                    items.push(self.read_any(reader, depth)?);
                }
                Value::Array(items)
            }
            Header::Map(len) => {
                let depth = self.enter(depth)?;
                let len = len as usize;
                let mut pairs = Vec::with_capacity(len.min(reader.remaining() / 2));
                for _ in 0..len {
                    let key = self.read_any(reader, depth)?;
                    let val = self.read_any(reader, depth)?;
                    pairs.push((key, val));
                }
                Value::Map(pairs)
            }
            Header::Ext { type_id, len } => {
                let data = reader.buf(len as usize)?;
                let handler = self
                    .ext
                    .resolve_unpack_wire(type_id)
                    .ok_or(DecodeError::UnknownExtType { type_id })?;
                handler.call(data).map_err(|source| DecodeError::Handler {
                    type_id: type_id as u8,
                    source,
                })?
            }
        };
        Ok(value)
    }

    pub(crate) fn skip_any(&self, reader: &mut Reader<'_>, depth: usize) -> Result<(), DecodeError> {
        let header = read_header(reader)?;
        self.skip_body(reader, header, depth)
    }

    pub(crate) fn skip_body(
        &self,
        reader: &mut Reader<'_>,
        header: Header,
        depth: usize,
    ) -> Result<(), DecodeError> {
        match header {
            Header::Array(len) => {
                let depth = self.enter(depth)?;
                for _ in 0..len {
                    self.skip_any(reader, depth)?;
                }
            }
            Header::Map(len) => {
                let depth = self.enter(depth)?;
                for _ in 0..len {
                    self.skip_any(reader, depth)?;
                    self.skip_any(reader, depth)?;
                }
            }
            other => reader.skip(other.payload_len())?,
        }
        Ok(())
    }

    fn enter(&self, depth: usize) -> Result<usize, DecodeError> {
        let limit = self.options.max_depth;
        if depth >= limit {
            return Err(DecodeError::DepthLimitExceeded { limit });
        }
        Ok(depth + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::UnpackHandler;
    use crate::value::{ExtType, Extension};

    fn local() -> MsgPackDecoder {
        MsgPackDecoder::with_registry(&Registry::new())
    }

    #[test]
    fn test_decode_scalars() {
        let d = local();
        assert_eq!(d.decode(&[0xc0]).unwrap(), (Value::Nil, 1));
        assert_eq!(d.decode(&[0xc3]).unwrap(), (Value::Bool(true), 1));
        assert_eq!(d.decode(&[0xd0, 0xdf]).unwrap(), (Value::from(-33), 2));
        assert_eq!(
            d.decode(&[0xca, 0x3f, 0xc0, 0, 0]).unwrap(),
            (Value::Float(1.5), 5)
        );
        assert_eq!(
            d.decode(&[0xc4, 2, 0xff, 0xfe]).unwrap(),
            (Value::Bytes(vec![0xff, 0xfe]), 4)
        );
    }

    #[test]
    fn test_nested_incomplete() {
        let d = local();
        // [1, "ab"] cut inside the string
        let err = d.decode(&[0x92, 0x01, 0xa2, b'a']).unwrap_err();
        assert!(matches!(err, DecodeError::Incomplete { offset: 3, needed: 1 }));
        // array announcing more elements than present
        assert!(d.decode(&[0x93, 0x01]).unwrap_err().is_incomplete());
    }

    #[test]
    fn test_malformed_inside_container() {
        let err = local().decode(&[0x92, 0x01, 0xc1]).unwrap_err();
        assert!(matches!(err, DecodeError::Malformed { offset: 2, byte: 0xc1 }));
    }

    #[test]
    fn test_huge_declared_length() {
        let err = local().decode(&[0xdd, 0xff, 0xff, 0xff, 0xff]).unwrap_err();
        assert!(err.is_incomplete());
    }

    #[test]
    fn test_ext_dispatch() {
        let registry = Registry::new();
        let bytes = [0xd4, 0x05, 0x2a];
        let err = MsgPackDecoder::with_registry(&registry).decode(&bytes).unwrap_err();
        assert!(matches!(err, DecodeError::UnknownExtType { type_id: 5 }));

        registry
            .register_unpack_type(
                5,
                Some(UnpackHandler::new(|data| {
                    Ok(Value::Ext(Extension::new(ExtType::new(5).unwrap(), data)))
                })),
            )
            .unwrap();
        let (value, used) = MsgPackDecoder::with_registry(&registry).decode(&bytes).unwrap();
        assert_eq!(used, 3);
        assert_eq!(value.as_ext().map(|e| e.data.as_slice()), Some(&[0x2a][..]));
    }

    #[test]
    fn test_negative_ext_type_is_unknown() {
        let err = local().decode(&[0xd4, 0xff, 0x00]).unwrap_err();
        assert!(matches!(err, DecodeError::UnknownExtType { type_id: -1 }));
    }

    #[test]
    fn test_ext_handler_failure() {
        let registry = Registry::new();
        registry
            .register_unpack_type(1, Some(UnpackHandler::new(|_| Err("bad payload".into()))))
            .unwrap();
        let err = MsgPackDecoder::with_registry(&registry)
            .decode(&[0xd4, 0x01, 0x00])
            .unwrap_err();
        assert!(matches!(err, DecodeError::Handler { type_id: 1, .. }));
    }

    #[test]
    fn test_trailing_policy() {
        let d = local();
        assert_eq!(d.unpack(&[0x01, 0x02]).unwrap(), Value::from(1));
        let strict = local().with_options(UnpackOptions::default().reject_trailing());
        let err = strict.unpack(&[0x01, 0x02]).unwrap_err();
        assert!(matches!(err, DecodeError::TrailingBytes { offset: 1, remaining: 1 }));
        assert_eq!(strict.unpack(&[0x01]).unwrap(), Value::from(1));
    }

    #[test]
    fn test_depth_limit() {
        let d = local().with_options(UnpackOptions::default().max_depth(2));
        assert!(d.decode(&[0x91, 0x91, 0x01]).is_ok());
        let err = d.decode(&[0x91, 0x91, 0x91, 0x01]).unwrap_err();
        assert!(matches!(err, DecodeError::DepthLimitExceeded { limit: 2 }));
        let err = d.skip(&[0x91, 0x91, 0x91, 0x01]).unwrap_err();
        assert!(matches!(err, DecodeError::DepthLimitExceeded { limit: 2 }));
    }

    #[test]
    fn test_skip_matches_decode() {
        let d = local();
        let cases: &[&[u8]] = &[
            &[0xc0],
            &[0xcf, 0, 0, 0, 0, 0, 0, 0, 1],
            &[0x82, 0xa1, b'a', 0x01, 0xa1, b'b', 0x92, 0xc2, 0xc3],
            &[0xc7, 0x02, 0x07, 0xaa, 0xbb],
            &[0xd8, 0x07, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
        ];
        for bytes in cases {
            assert_eq!(d.skip(bytes).unwrap(), bytes.len());
        }
        let (_, used) = d.decode(cases[2]).unwrap();
        assert_eq!(used, cases[2].len());
    }

    #[test]
    fn test_decode_at_offset() {
        let d = local();
        let bytes = [0x01, 0xa2, b'h', b'i', 0x03];
        assert_eq!(d.decode_at(&bytes, 1).unwrap(), (Value::from("hi"), 3));
        let err = d.decode_at(&bytes[..3], 1).unwrap_err();
        assert!(matches!(err, DecodeError::Incomplete { offset: 2, needed: 1 }));
    }
}
