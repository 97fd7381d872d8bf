//! `MsgPackEncoder`: [`Value`] to MessagePack bytes, always picking the
//! smallest wire form.
//!
//! Lengths are limited to `u32::MAX` bytes or elements; debug builds assert
//! on anything longer.

use simplemsgpack_buffers::Writer;

use crate::constants::*;
use crate::value::{Extension, Integer, Value};

pub struct MsgPackEncoder {
    pub writer: Writer,
}

impl Default for MsgPackEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl MsgPackEncoder {
    pub fn new() -> Self {
        Self {
            writer: Writer::new(),
        }
    }

    pub fn encode(&mut self, value: &Value) -> Vec<u8> {
        self.writer.reset();
        self.write_any(value);
        self.writer.flush()
    }

    pub fn write_any(&mut self, value: &Value) {
        match value {
            Value::Nil => self.write_nil(),
            Value::Bool(b) => self.write_boolean(*b),
            Value::Int(n) => self.write_integer(*n),
            Value::Float(f) => self.write_float(*f),
            Value::Bytes(b) => self.write_bytes(b),
            Value::Array(items) => self.write_arr(items),
            Value::Map(pairs) => self.write_map(pairs),
            Value::Ext(ext) => self.write_ext(ext),
        }
    }

    pub fn write_nil(&mut self) {
        self.writer.u8(NIL);
    }

    pub fn write_boolean(&mut self, b: bool) {
        self.writer.u8(if b { TRUE } else { FALSE });
    }

    /// Floats are always written as float64.
    pub fn write_float(&mut self, float: f64) {
        self.writer.u8f64(FLOAT64, float);
    }

    pub fn write_integer(&mut self, int: Integer) {
        match int.repr() {
            Ok(uint) => self.write_u64(uint),
            Err(neg) => self.write_negative(neg),
        }
    }

    pub fn write_u64(&mut self, uint: u64) {
        if uint <= POSITIVE_FIXINT_MAX as u64 {
            self.writer.u8(uint as u8);
        } else if uint <= 0xff {
            self.writer.u8u8(UINT8, uint as u8);
        } else if uint <= 0xffff {
            self.writer.u8u16(UINT16, uint as u16);
        } else if uint <= 0xffff_ffff {
            self.writer.u8u32(UINT32, uint as u32);
        } else {
            self.writer.u8u64(UINT64, uint);
        }
    }

    /// Writes a strictly negative integer.
    pub fn write_negative(&mut self, int: i64) {
        if int >= -0x20 {
            // negative fixint: 0xe0..0xff
            self.writer.u8(int as i8 as u8);
        } else if int >= i8::MIN as i64 {
            self.writer.u8u8(INT8, int as i8 as u8);
        } else if int >= i16::MIN as i64 {
            self.writer.u8u16(INT16, int as i16 as u16);
        } else if int >= i32::MIN as i64 {
            self.writer.u8u32(INT32, int as i32 as u32);
        } else {
            self.writer.u8u64(INT64, int as u64);
        }
    }

    /// Text when the bytes are valid UTF-8, binary otherwise.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        if std::str::from_utf8(bytes).is_ok() {
            self.write_str_hdr(bytes.len());
        } else {
            self.write_bin_hdr(bytes.len());
        }
        self.writer.buf(bytes);
    }

    pub fn write_str(&mut self, s: &str) {
        self.write_str_hdr(s.len());
        self.writer.buf(s.as_bytes());
    }

    pub fn write_str_hdr(&mut self, length: usize) {
        if length <= FIXSTR_MAX_LEN {
            self.writer.u8(FIXSTR | length as u8);
        } else if length <= 0xff {
            self.writer.u8u8(STR8, length as u8);
        } else if length <= 0xffff {
            self.writer.u8u16(STR16, length as u16);
        } else {
            debug_assert!(
                length <= u32::MAX as usize,
                "length {length} exceeds the 32-bit wire limit"
            );
            self.writer.u8u32(STR32, length as u32);
        }
    }

    pub fn write_bin(&mut self, buf: &[u8]) {
        self.write_bin_hdr(buf.len());
        self.writer.buf(buf);
    }

    pub fn write_bin_hdr(&mut self, length: usize) {
        if length <= 0xff {
            self.writer.u8u8(BIN8, length as u8);
        } else if length <= 0xffff {
            self.writer.u8u16(BIN16, length as u16);
        } else {
            debug_assert!(
                length <= u32::MAX as usize,
                "length {length} exceeds the 32-bit wire limit"
            );
            self.writer.u8u32(BIN32, length as u32);
        }
    }

    pub fn write_arr_hdr(&mut self, length: usize) {
        if length <= FIXARRAY_MAX_LEN {
            self.writer.u8(FIXARRAY | length as u8);
        } else if length <= 0xffff {
            self.writer.u8u16(ARRAY16, length as u16);
        } else {
            debug_assert!(
                length <= u32::MAX as usize,
                "length {length} exceeds the 32-bit wire limit"
            );
            self.writer.u8u32(ARRAY32, length as u32);
        }
    }

    pub fn write_arr(&mut self, items: &[Value]) {
        self.write_arr_hdr(items.len());
        for item in items {
            self.write_any(item);
        }
    }

    pub fn write_map_hdr(&mut self, length: usize) {
        if length <= FIXMAP_MAX_LEN {
            self.writer.u8(FIXMAP | length as u8);
        } else if length <= 0xffff {
            self.writer.u8u16(MAP16, length as u16);
        } else {
            debug_assert!(
                length <= u32::MAX as usize,
                "length {length} exceeds the 32-bit wire limit"
            );
            self.writer.u8u32(MAP32, length as u32);
        }
    }

    pub fn write_map(&mut self, pairs: &[(Value, Value)]) {
        self.write_map_hdr(pairs.len());
        for (key, val) in pairs {
            self.write_any(key);
            self.write_any(val);
        }
    }

    /// Fixext for payloads of exactly 1, 2, 4, 8 or 16 bytes, else ext8/16/32.
    /// The type byte always follows the length field.
    pub fn write_ext_hdr(&mut self, type_id: u8, length: usize) {
        match length {
            1 => self.writer.u8u8(FIXEXT1, type_id),
            2 => self.writer.u8u8(FIXEXT2, type_id),
            4 => self.writer.u8u8(FIXEXT4, type_id),
            8 => self.writer.u8u8(FIXEXT8, type_id),
            16 => self.writer.u8u8(FIXEXT16, type_id),
            _ => {
                if length <= 0xff {
                    self.writer.u8u8(EXT8, length as u8);
                } else if length <= 0xffff {
                    self.writer.u8u16(EXT16, length as u16);
                } else {
                    debug_assert!(
                        length <= u32::MAX as usize,
                        "length {length} exceeds the 32-bit wire limit"
                    );
                    self.writer.u8u32(EXT32, length as u32);
                }
                self.writer.u8(type_id);
            }
        }
    }

    pub fn write_ext(&mut self, ext: &Extension) {
        self.write_ext_hdr(ext.ext_type.get(), ext.data.len());
        self.writer.buf(&ext.data);
    }
}
