//! Bounds-checked binary reader with cursor tracking.

use crate::BufferError;

/// Reads big-endian values from a borrowed byte slice.
///
/// Every read checks the remaining length first; running past the end yields
/// [`BufferError::EndOfBuffer`] with the cursor left where it was.
///
/// # Example
///
/// ```
/// use simplemsgpack_buffers::{BufferError, Reader};
///
/// let data = [0x01, 0x02, 0x03];
/// let mut reader = Reader::new(&data);
///
/// assert_eq!(reader.u16(), Ok(0x0102));
/// assert_eq!(
///     reader.u32(),
///     Err(BufferError::EndOfBuffer { offset: 2, needed: 3 })
/// );
/// assert_eq!(reader.position(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    /// The underlying byte slice.
    pub uint8: &'a [u8],
    /// Current cursor position.
    pub x: usize,
}

impl<'a> Reader<'a> {
    /// Creates a new reader positioned at the start of `uint8`.
    pub fn new(uint8: &'a [u8]) -> Self {
        Self { uint8, x: 0 }
    }

    /// Creates a reader positioned at `x`.
    pub fn at(uint8: &'a [u8], x: usize) -> Self {
        Self { uint8, x }
    }

    /// Current cursor position.
    #[inline]
    pub fn position(&self) -> usize {
        self.x
    }

    /// Moves the cursor to an absolute position.
    #[inline]
    pub fn seek(&mut self, x: usize) {
        self.x = x;
    }

    /// Number of bytes left after the cursor.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.uint8.len().saturating_sub(self.x)
    }

    /// Returns `true` when the cursor sits at (or past) the end.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Bytes between `start` and the cursor.
    pub fn since(&self, start: usize) -> &'a [u8] {
        &self.uint8[start..self.x]
    }

    #[inline]
    fn check(&self, n: usize) -> Result<(), BufferError> {
        let available = self.remaining();
        if n > available {
            Err(BufferError::EndOfBuffer {
                offset: self.x,
                needed: n - available,
            })
        } else {
            Ok(())
        }
    }

    #[inline]
    fn take<const N: usize>(&mut self) -> Result<[u8; N], BufferError> {
        self.check(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(&self.uint8[self.x..self.x + N]);
        self.x += N;
        Ok(out)
    }

    /// Returns the byte under the cursor without advancing.
    pub fn peek(&self) -> Result<u8, BufferError> {
        self.check(1)?;
        Ok(self.uint8[self.x])
    }

    /// Advances the cursor by `n` bytes.
    pub fn skip(&mut self, n: usize) -> Result<(), BufferError> {
        self.check(n)?;
        self.x += n;
        Ok(())
    }

    /// Returns the next `n` bytes and advances past them.
    pub fn buf(&mut self, n: usize) -> Result<&'a [u8], BufferError> {
        self.check(n)?;
        let start = self.x;
        self.x += n;
        Ok(&self.uint8[start..self.x])
    }

    #[inline]
    pub fn u8(&mut self) -> Result<u8, BufferError> {
        self.take::<1>().map(|b| b[0])
    }

    #[inline]
    pub fn i8(&mut self) -> Result<i8, BufferError> {
        self.take::<1>().map(|b| b[0] as i8)
    }

    #[inline]
    pub fn u16(&mut self) -> Result<u16, BufferError> {
        self.take().map(u16::from_be_bytes)
    }

    #[inline]
    pub fn i16(&mut self) -> Result<i16, BufferError> {
        self.take().map(i16::from_be_bytes)
    }

    #[inline]
    pub fn u32(&mut self) -> Result<u32, BufferError> {
        self.take().map(u32::from_be_bytes)
    }

    #[inline]
    pub fn i32(&mut self) -> Result<i32, BufferError> {
        self.take().map(i32::from_be_bytes)
    }

    #[inline]
    pub fn u64(&mut self) -> Result<u64, BufferError> {
        self.take().map(u64::from_be_bytes)
    }

    #[inline]
    pub fn i64(&mut self) -> Result<i64, BufferError> {
        self.take().map(i64::from_be_bytes)
    }

    #[inline]
    pub fn f32(&mut self) -> Result<f32, BufferError> {
        self.take().map(f32::from_be_bytes)
    }

    #[inline]
    pub fn f64(&mut self) -> Result<f64, BufferError> {
        self.take().map(f64::from_be_bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u8() {
        let data = [0x01, 0x02, 0x03];
        let mut reader = Reader::new(&data);
        assert_eq!(reader.u8(), Ok(0x01));
        assert_eq!(reader.u8(), Ok(0x02));
        assert_eq!(reader.u8(), Ok(0x03));
        assert_eq!(
            reader.u8(),
            Err(BufferError::EndOfBuffer {
                offset: 3,
                needed: 1
            })
        );
    }

    #[test]
    fn test_u16_partial() {
        let data = [0x01];
        let mut reader = Reader::new(&data);
        assert_eq!(
            reader.u16(),
            Err(BufferError::EndOfBuffer {
                offset: 0,
                needed: 1
            })
        );
        // Cursor must not move on failure.
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn test_signed_reads() {
        let data = [0xff, 0xfc, 0x18, 0xff, 0xff, 0xff, 0xfe];
        let mut reader = Reader::new(&data);
        assert_eq!(reader.i8(), Ok(-1));
        assert_eq!(reader.i16(), Ok(-1000));
        assert_eq!(reader.i32(), Ok(-2));
    }

    #[test]
    fn test_u64_and_i64() {
        let data = u64::MAX.to_be_bytes();
        assert_eq!(Reader::new(&data).u64(), Ok(u64::MAX));
        let data = i64::MIN.to_be_bytes();
        assert_eq!(Reader::new(&data).i64(), Ok(i64::MIN));
    }

    #[test]
    fn test_floats() {
        let mut data = 1.5f32.to_be_bytes().to_vec();
        data.extend_from_slice(&(-2.25f64).to_be_bytes());
        let mut reader = Reader::new(&data);
        assert_eq!(reader.f32(), Ok(1.5));
        assert_eq!(reader.f64(), Ok(-2.25));
        assert!(reader.is_empty());
    }

    #[test]
    fn test_buf_and_skip() {
        let data = [1, 2, 3, 4, 5];
        let mut reader = Reader::new(&data);
        reader.skip(1).unwrap();
        assert_eq!(reader.buf(2), Ok(&[2u8, 3][..]));
        assert_eq!(reader.since(1), &[2, 3]);
        assert_eq!(
            reader.buf(5),
            Err(BufferError::EndOfBuffer {
                offset: 3,
                needed: 3
            })
        );
        assert!(reader.skip(3).is_err());
        assert_eq!(reader.remaining(), 2);
    }

    #[test]
    fn test_peek_and_seek() {
        let data = [0xaa, 0xbb];
        let mut reader = Reader::at(&data, 1);
        assert_eq!(reader.peek(), Ok(0xbb));
        assert_eq!(reader.position(), 1);
        reader.seek(0);
        assert_eq!(reader.peek(), Ok(0xaa));
        reader.seek(2);
        assert!(reader.peek().is_err());
    }
}
