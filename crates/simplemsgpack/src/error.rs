//! Error types for packing, unpacking, registration and navigation.

use simplemsgpack_buffers::BufferError;
use simplemsgpack_pointer::PointerError;
use thiserror::Error;

/// Error type returned by user-supplied extension handlers.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum DecodeError {
    /// The buffer ends before the value it starts does.
    #[error("can't unpack: insufficient bytes, {needed} more needed at offset {offset}")]
    Incomplete { offset: usize, needed: usize },
    #[error("can't unpack: invalid MessagePack byte 0x{byte:02x} at offset {offset}")]
    Malformed { offset: usize, byte: u8 },
    #[error("can't unpack: no unpacker registered for ext type {type_id}")]
    UnknownExtType { type_id: i8 },
    #[error("can't unpack: unpacker for ext type {type_id} failed: {source}")]
    Handler {
        type_id: u8,
        #[source]
        source: HandlerError,
    },
    #[error("can't unpack: nesting deeper than {limit} levels")]
    DepthLimitExceeded { limit: usize },
    #[error("can't unpack: {remaining} trailing byte(s) after value ending at offset {offset}")]
    TrailingBytes { offset: usize, remaining: usize },
}

impl DecodeError {
    /// `true` when more input could turn this failure into a success.
    pub fn is_incomplete(&self) -> bool {
        matches!(self, DecodeError::Incomplete { .. })
    }
}

impl From<BufferError> for DecodeError {
    fn from(err: BufferError) -> Self {
        match err {
            BufferError::EndOfBuffer { offset, needed } => {
                DecodeError::Incomplete { offset, needed }
            }
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("{op}: ext type {type_id} out of range (expected 0..=127)")]
    OutOfRange { op: &'static str, type_id: i64 },
    #[error("{op}: no handler given for ext type {type_id}")]
    MissingHandler { op: &'static str, type_id: i64 },
}

#[derive(Debug, Error)]
pub enum PackError {
    #[error("can't pack: no ext packer registered for {type_name}")]
    Unsupported { type_name: String },
    #[error("can't pack: packer for ext type {type_id} failed: {source}")]
    Handler {
        type_id: u8,
        #[source]
        source: HandlerError,
    },
}

#[derive(Debug, Error)]
pub enum NavigationError {
    #[error("at_pointer: {0}")]
    InvalidPointer(#[from] PointerError),
    #[error("at_pointer: index `{segment}` out of range for array of length {len}")]
    IndexOutOfRange { segment: String, len: usize },
    #[error("at_pointer: key `{segment}` not found")]
    KeyNotFound { segment: String },
    #[error("at_pointer: can't descend into {found} with `{segment}`")]
    TypeMismatch { segment: String, found: &'static str },
    #[error("at_pointer: {0}")]
    Decode(#[from] DecodeError),
}
