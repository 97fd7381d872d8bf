//! Binary buffer utilities for simplemsgpack.
//!
//! - [`Reader`] - bounds-checked cursor over a borrowed byte slice
//! - [`Writer`] - big-endian writer over an auto-growing buffer
//!
//! # Example
//!
//! ```
//! use simplemsgpack_buffers::{Reader, Writer};
//!
//! let mut writer = Writer::new();
//! writer.u8(0x01);
//! writer.u16(0x0203);
//! writer.buf(b"hello");
//! let data = writer.flush();
//!
//! let mut reader = Reader::new(&data);
//! assert_eq!(reader.u8(), Ok(0x01));
//! assert_eq!(reader.u16(), Ok(0x0203));
//! assert_eq!(reader.buf(5), Ok(&b"hello"[..]));
//! assert!(reader.u8().is_err());
//! ```

mod reader;
mod writer;

pub use reader::Reader;
pub use writer::Writer;

/// Error type for buffer operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferError {
    /// A read at `offset` wanted `needed` more bytes than the buffer holds.
    EndOfBuffer { offset: usize, needed: usize },
}

impl std::fmt::Display for BufferError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BufferError::EndOfBuffer { offset, needed } => {
                write!(f, "end of buffer: {needed} more byte(s) needed at offset {offset}")
            }
        }
    }
}

impl std::error::Error for BufferError {}
