//! Tag dispatch shared by the decoder, the skipper and the lazy navigator.
//!
//! [`read_header`] consumes a marker byte plus its fixed-size fields (length,
//! ext type, scalar body). Whatever follows, a payload or container elements,
//! is left under the cursor for the caller.

use simplemsgpack_buffers::Reader;

use crate::constants::*;
use crate::error::DecodeError;
use crate::value::Integer;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Header {
    Nil,
    Bool(bool),
    Int(Integer),
    Float(f64),
    /// Text (str family) of the given byte length.
    Str(u32),
    Bin(u32),
    Array(u32),
    Map(u32),
    Ext { type_id: i8, len: u32 },
}

impl Header {
    /// Payload bytes that follow the header; container elements excluded.
    pub fn payload_len(&self) -> usize {
        match *self {
            Header::Str(n) | Header::Bin(n) => n as usize,
            Header::Ext { len, .. } => len as usize,
            _ => 0,
        }
    }

    /// Short type name used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Header::Nil => "nil",
            Header::Bool(_) => "bool",
            Header::Int(_) => "int",
            Header::Float(_) => "float",
            Header::Str(_) => "str",
            Header::Bin(_) => "bin",
            Header::Array(_) => "array",
            Header::Map(_) => "map",
            Header::Ext { .. } => "ext",
        }
    }
}

/// Reads one header at the cursor.
///
/// On `Incomplete` the cursor position is unspecified; callers restart from
/// an offset they saved.
pub fn read_header(reader: &mut Reader<'_>) -> Result<Header, DecodeError> {
    let offset = reader.position();
    let byte = reader.u8()?;
    let header = match byte {
        0x00..=POSITIVE_FIXINT_MAX => Header::Int(byte.into()),
        0x80..=0x8f => Header::Map((byte & 0x0f) as u32),
        0x90..=0x9f => Header::Array((byte & 0x0f) as u32),
        0xa0..=0xbf => Header::Str((byte & 0x1f) as u32),
        NIL => Header::Nil,
        NEVER_USED => return Err(DecodeError::Malformed { offset, byte }),
        FALSE => Header::Bool(false),
        TRUE => Header::Bool(true),
        BIN8 => Header::Bin(reader.u8()? as u32),
        BIN16 => Header::Bin(reader.u16()? as u32),
        BIN32 => Header::Bin(reader.u32()?),
        EXT8 => ext_header(reader, len8)?,
        EXT16 => ext_header(reader, len16)?,
        EXT32 => ext_header(reader, len32)?,
        FLOAT32 => Header::Float(reader.f32()? as f64),
        FLOAT64 => Header::Float(reader.f64()?),
        UINT8 => Header::Int(reader.u8()?.into()),
        UINT16 => Header::Int(reader.u16()?.into()),
        UINT32 => Header::Int(reader.u32()?.into()),
        UINT64 => Header::Int(reader.u64()?.into()),
        INT8 => Header::Int(reader.i8()?.into()),
        INT16 => Header::Int(reader.i16()?.into()),
        INT32 => Header::Int(reader.i32()?.into()),
        INT64 => Header::Int(reader.i64()?.into()),
        FIXEXT1 => fixext_header(reader, 1)?,
        FIXEXT2 => fixext_header(reader, 2)?,
        FIXEXT4 => fixext_header(reader, 4)?,
        FIXEXT8 => fixext_header(reader, 8)?,
        FIXEXT16 => fixext_header(reader, 16)?,
        STR8 => Header::Str(reader.u8()? as u32),
        STR16 => Header::Str(reader.u16()? as u32),
        STR32 => Header::Str(reader.u32()?),
        ARRAY16 => Header::Array(reader.u16()? as u32),
        ARRAY32 => Header::Array(reader.u32()?),
        MAP16 => Header::Map(reader.u16()? as u32),
        MAP32 => Header::Map(reader.u32()?),
        NEGATIVE_FIXINT..=0xff => Header::Int((byte as i8).into()),
    };
    Ok(header)
}

fn len8(reader: &mut Reader<'_>) -> Result<u32, DecodeError> {
    Ok(reader.u8()? as u32)
}

fn len16(reader: &mut Reader<'_>) -> Result<u32, DecodeError> {
    Ok(reader.u16()? as u32)
}

fn len32(reader: &mut Reader<'_>) -> Result<u32, DecodeError> {
    Ok(reader.u32()?)
}

// ext8/16/32: length, then type byte.
fn ext_header(
    reader: &mut Reader<'_>,
    read_len: fn(&mut Reader<'_>) -> Result<u32, DecodeError>,
) -> Result<Header, DecodeError> {
    let len = read_len(reader)?;
    let type_id = reader.i8()?;
    Ok(Header::Ext { type_id, len })
}

fn fixext_header(reader: &mut Reader<'_>, len: u32) -> Result<Header, DecodeError> {
    let type_id = reader.i8()?;
    Ok(Header::Ext { type_id, len })
}
