//! MessagePack encoding and decoding with an extension type registry,
//! streaming decode of concatenated values, and lazy pointer navigation.
//!
//! # Example
//!
//! ```
//! use simplemsgpack::{pack, unpack, unpack_lazy, unpack_stream, Value};
//!
//! let doc = Value::map([("name", Value::from("Delta")), ("id", Value::from(4))]);
//! let bytes = pack(&doc);
//! assert_eq!(unpack(&bytes).unwrap(), doc);
//!
//! let view = unpack_lazy(&bytes).unwrap();
//! assert_eq!(view.at_pointer("/name").unwrap(), Value::from("Delta"));
//!
//! let mut two = bytes.clone();
//! two.extend_from_slice(&bytes);
//! let mut count = 0;
//! let used = unpack_stream(&two[..two.len() - 1], |_| count += 1).unwrap();
//! assert_eq!((count, used), (1, bytes.len()));
//! ```
//!
//! Crate-level functions use [`Registry::global`]. Use [`MsgPackDecoder`]
//! and [`Registry::new`] for an isolated set of extension handlers.

pub mod constants;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod header;
pub mod host;
pub mod json;
pub mod lazy;
pub mod options;
pub mod registry;
pub mod stream;
pub mod value;

pub use decoder::MsgPackDecoder;
pub use encoder::MsgPackEncoder;
pub use error::{DecodeError, HandlerError, NavigationError, PackError, RegistryError};
pub use host::{HostValue, TypeTag};
pub use lazy::LazyView;
pub use options::{TrailingBytes, UnpackOptions};
pub use registry::{ExtTables, PackHandler, Registry, UnpackHandler};
pub use simplemsgpack_pointer::PointerError;
pub use stream::{decode_stream, MsgPackStreamingDecoder};
pub use value::{CoreType, ExtType, Extension, Integer, Value};

/// Encodes a value.
pub fn pack(value: &Value) -> Vec<u8> {
    MsgPackEncoder::new().encode(value)
}

/// Encodes a host value, turning non-[`Value`] hosts into extensions through
/// the global registry.
pub fn pack_host(host: &dyn HostValue) -> Result<Vec<u8>, PackError> {
    pack_host_with(Registry::global(), host)
}

/// [`pack_host`] against an explicit registry instead of the global one.
pub fn pack_host_with(registry: &Registry, host: &dyn HostValue) -> Result<Vec<u8>, PackError> {
    let mut encoder = MsgPackEncoder::new();
    if let Some(value) = host.as_any().downcast_ref::<Value>() {
        return Ok(encoder.encode(value));
    }
    let ext = registry.snapshot().promote_ext(host)?;
    encoder.write_ext(&ext);
    Ok(encoder.writer.flush())
}

/// Decodes the first value in `bytes`; anything after it is ignored.
pub fn unpack(bytes: &[u8]) -> Result<Value, DecodeError> {
    unpack_with(bytes, &UnpackOptions::default())
}

/// Decodes the first value in `bytes` under `options`, which decide whether
/// trailing bytes are an error and how deep containers may nest.
pub fn unpack_with(bytes: &[u8], options: &UnpackOptions) -> Result<Value, DecodeError> {
    MsgPackDecoder::new()
        .with_options(options.clone())
        .unpack(bytes)
}

/// Decodes the first value in `bytes` and reports how many bytes it used.
pub fn decode(bytes: &[u8]) -> Result<(Value, usize), DecodeError> {
    MsgPackDecoder::new().decode(bytes)
}

/// Decodes every complete value in `bytes`; see [`decode_stream`].
pub fn unpack_stream<F>(bytes: &[u8], on_value: F) -> Result<usize, DecodeError>
where
    F: FnMut(Value),
{
    decode_stream(&MsgPackDecoder::new(), bytes, on_value)
}

/// Checks the extent of the value in `bytes` and returns a navigable view.
pub fn unpack_lazy(bytes: &[u8]) -> Result<LazyView<'_>, DecodeError> {
    LazyView::new(MsgPackDecoder::new(), bytes)
}

/// Registers a pack handler on the global registry.
pub fn register_pack_type(
    type_id: i64,
    target: TypeTag,
    handler: Option<PackHandler>,
) -> Result<(), RegistryError> {
    Registry::global().register_pack_type(type_id, target, handler)
}

/// Registers an unpack handler on the global registry.
pub fn register_unpack_type(
    type_id: i64,
    handler: Option<UnpackHandler>,
) -> Result<(), RegistryError> {
    Registry::global().register_unpack_type(type_id, handler)
}

/// Whether the global registry holds a pack handler for `target`.
pub fn ext_packer_registered(target: TypeTag) -> bool {
    Registry::global().ext_packer_registered(target)
}

/// Whether the global registry holds an unpack handler for `type_id`.
/// Ids outside `0..=127` are never registered.
pub fn ext_unpacker_registered(type_id: i64) -> bool {
    Registry::global().ext_unpacker_registered(type_id)
}
