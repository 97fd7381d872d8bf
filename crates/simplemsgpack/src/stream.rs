//! Decoding buffers that hold several concatenated values, possibly ending
//! in a partial one.

use crate::decoder::MsgPackDecoder;
use crate::error::DecodeError;
use crate::value::Value;

/// Decodes values back to back from `input`, handing each to `on_value`.
///
/// Stops without error at the first value that is cut short and returns the
/// number of bytes consumed by the complete values, so the caller can keep
/// `input[consumed..]` and retry once more bytes arrive. Any other decode
/// failure is returned as is.
pub fn decode_stream<F>(
    decoder: &MsgPackDecoder,
    input: &[u8],
    mut on_value: F,
) -> Result<usize, DecodeError>
where
    F: FnMut(Value),
{
    let mut offset = 0;
    while offset < input.len() {
        match decoder.decode_at(input, offset) {
            Ok((value, used)) => {
                offset += used;
                on_value(value);
            }
            Err(DecodeError::Incomplete { .. }) => break,
            Err(err) => return Err(err),
        }
    }
    Ok(offset)
}

/// Incremental decoder that accepts chunked input and emits decoded values.
///
/// ```
/// use simplemsgpack::MsgPackStreamingDecoder;
///
/// let mut stream = MsgPackStreamingDecoder::new();
/// stream.push(&[0x92, 0x01]);
/// assert_eq!(stream.read().unwrap(), None);
/// stream.push(&[0x02, 0xc0]);
/// assert!(stream.read().unwrap().is_some());
/// assert_eq!(stream.read().unwrap(), Some(simplemsgpack::Value::Nil));
/// assert_eq!(stream.pending(), 0);
/// ```
#[derive(Debug, Default)]
pub struct MsgPackStreamingDecoder {
    buffer: Vec<u8>,
    offset: usize,
    decoder: MsgPackDecoder,
}

impl MsgPackStreamingDecoder {
    pub fn new() -> Self {
        Self::with_decoder(MsgPackDecoder::new())
    }

    pub fn with_decoder(decoder: MsgPackDecoder) -> Self {
        Self {
            buffer: Vec::new(),
            offset: 0,
            decoder,
        }
    }

    pub fn push(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Next complete value, or `None` until enough bytes were pushed.
    pub fn read(&mut self) -> Result<Option<Value>, DecodeError> {
        if self.offset >= self.buffer.len() {
            return Ok(None);
        }
        match self.decoder.decode_at(&self.buffer, self.offset) {
            Ok((value, used)) => {
                self.offset += used;
                self.compact();
                Ok(Some(value))
            }
            Err(DecodeError::Incomplete { .. }) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Reads every value that is complete so far.
    pub fn read_all(&mut self) -> Result<Vec<Value>, DecodeError> {
        let mut values = Vec::new();
        while let Some(value) = self.read()? {
            values.push(value);
        }
        Ok(values)
    }

    /// Bytes pushed but not yet consumed by a decoded value.
    pub fn pending(&self) -> usize {
        self.buffer.len() - self.offset
    }

    fn compact(&mut self) {
        if self.offset == 0 {
            return;
        }
        if self.offset == self.buffer.len() {
            self.buffer.clear();
            self.offset = 0;
            return;
        }
        if self.offset >= 8192 || self.offset * 2 >= self.buffer.len() {
            self.buffer.drain(..self.offset);
            self.offset = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Registry;

    fn local() -> MsgPackDecoder {
        MsgPackDecoder::with_registry(&Registry::new())
    }

    #[test]
    fn test_stream_stops_at_partial_tail() {
        let input = [0x01, 0xa2, b'h', b'i', 0xa3, b'a'];
        let mut seen = Vec::new();
        let used = decode_stream(&local(), &input, |v| seen.push(v)).unwrap();
        assert_eq!(used, 4);
        assert_eq!(seen, vec![Value::from(1), Value::from("hi")]);
    }

    #[test]
    fn test_stream_empty_and_malformed() {
        let used = decode_stream(&local(), &[], |_| panic!("no values")).unwrap();
        assert_eq!(used, 0);
        let err = decode_stream(&local(), &[0x01, 0xc1], |_| {}).unwrap_err();
        assert!(matches!(err, DecodeError::Malformed { offset: 1, .. }));
    }

    #[test]
    fn test_streaming_decoder_bytewise() {
        let input = [0x93, 0x01, 0xa1, b'x', 0xc3, 0xcd, 0x01, 0x00];
        let mut stream = MsgPackStreamingDecoder::with_decoder(local());
        let mut values = Vec::new();
        for byte in input {
            stream.push(&[byte]);
            values.extend(stream.read_all().unwrap());
        }
        assert_eq!(
            values,
            vec![
                Value::Array(vec![Value::from(1), Value::from("x"), Value::Bool(true)]),
                Value::from(256),
            ]
        );
        assert_eq!(stream.pending(), 0);
    }

    #[test]
    fn test_streaming_decoder_keeps_tail() {
        let mut stream = MsgPackStreamingDecoder::with_decoder(local());
        stream.push(&[0x01, 0x02, 0xcd, 0x01]);
        assert_eq!(stream.read_all().unwrap(), vec![Value::from(1), Value::from(2)]);
        assert_eq!(stream.pending(), 2);
        stream.push(&[0x00]);
        assert_eq!(stream.read().unwrap(), Some(Value::from(256)));
    }
}
