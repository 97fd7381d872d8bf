//! The [`Value`] tree every encoder and decoder operates on.

use std::fmt;

/// Built-in value categories. These are also the registry targets that are
/// accepted but never consulted when packing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoreType {
    Nil,
    Bool,
    Int,
    Float,
    Bytes,
    Array,
    Map,
    Ext,
}

impl CoreType {
    pub fn name(self) -> &'static str {
        match self {
            CoreType::Nil => "nil",
            CoreType::Bool => "bool",
            CoreType::Int => "int",
            CoreType::Float => "float",
            CoreType::Bytes => "bytes",
            CoreType::Array => "array",
            CoreType::Map => "map",
            CoreType::Ext => "ext",
        }
    }
}

/// A 64-bit integer spanning `i64::MIN..=u64::MAX`.
///
/// Non-negative numbers are always stored unsigned and negative ones signed,
/// so equality does not depend on the Rust type (or wire width) a number came
/// from: `Integer::from(7i8) == Integer::from(7u64)`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Integer {
    n: IntRepr,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
enum IntRepr {
    /// Always non-negative.
    PosInt(u64),
    /// Always negative.
    NegInt(i64),
}

impl Integer {
    pub fn is_negative(&self) -> bool {
        matches!(self.n, IntRepr::NegInt(_))
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self.n {
            IntRepr::PosInt(n) => i64::try_from(n).ok(),
            IntRepr::NegInt(n) => Some(n),
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self.n {
            IntRepr::PosInt(n) => Some(n),
            IntRepr::NegInt(_) => None,
        }
    }

    pub fn as_f64(&self) -> f64 {
        match self.n {
            IntRepr::PosInt(n) => n as f64,
            IntRepr::NegInt(n) => n as f64,
        }
    }

    /// Splits into the unsigned magnitude or the negative signed value.
    pub(crate) fn repr(&self) -> Result<u64, i64> {
        match self.n {
            IntRepr::PosInt(n) => Ok(n),
            IntRepr::NegInt(n) => Err(n),
        }
    }
}

impl fmt::Debug for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.n {
            IntRepr::PosInt(n) => write!(f, "{n}"),
            IntRepr::NegInt(n) => write!(f, "{n}"),
        }
    }
}

macro_rules! integer_from_unsigned {
    ($($t:ty)*) => {$(
        impl From<$t> for Integer {
            fn from(n: $t) -> Self {
                Integer { n: IntRepr::PosInt(n as u64) }
            }
        }
    )*};
}

macro_rules! integer_from_signed {
    ($($t:ty)*) => {$(
        impl From<$t> for Integer {
            fn from(n: $t) -> Self {
                if n < 0 {
                    Integer { n: IntRepr::NegInt(n as i64) }
                } else {
                    Integer { n: IntRepr::PosInt(n as u64) }
                }
            }
        }
    )*};
}

integer_from_unsigned!(u8 u16 u32 u64 usize);
integer_from_signed!(i8 i16 i32 i64 isize);

/// Extension type identifier, always within `0..=127`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExtType(u8);

impl ExtType {
    pub const MAX: u8 = 127;

    /// Returns `None` when `id` is outside `0..=127`.
    pub fn new(id: i64) -> Option<Self> {
        if (0..=Self::MAX as i64).contains(&id) {
            Some(ExtType(id as u8))
        } else {
            None
        }
    }

    /// Interprets a wire type byte; negative (reserved) ids yield `None`.
    pub fn from_wire(id: i8) -> Option<Self> {
        Self::new(id as i64)
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl fmt::Display for ExtType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An application-defined value: a type id plus an opaque payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extension {
    pub ext_type: ExtType,
    pub data: Vec<u8>,
}

impl Extension {
    pub fn new(ext_type: ExtType, data: impl Into<Vec<u8>>) -> Self {
        Self {
            ext_type,
            data: data.into(),
        }
    }
}

/// A MessagePack value.
///
/// Text and binary payloads share [`Value::Bytes`]; the wire format tells
/// them apart, the value model does not. Map pairs keep their encoded order
/// and duplicate keys are allowed.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Nil,
    Bool(bool),
    Int(Integer),
    Float(f64),
    Bytes(Vec<u8>),
    Array(Vec<Value>),
    Map(Vec<(Value, Value)>),
    Ext(Extension),
}

impl Value {
    pub fn kind(&self) -> CoreType {
        match self {
            Value::Nil => CoreType::Nil,
            Value::Bool(_) => CoreType::Bool,
            Value::Int(_) => CoreType::Int,
            Value::Float(_) => CoreType::Float,
            Value::Bytes(_) => CoreType::Bytes,
            Value::Array(_) => CoreType::Array,
            Value::Map(_) => CoreType::Map,
            Value::Ext(_) => CoreType::Ext,
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::Int(n) => n.as_u64(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(n) => Some(n.as_f64()),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// The payload as text, when it is valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        self.as_bytes().and_then(|b| std::str::from_utf8(b).ok())
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&[(Value, Value)]> {
        match self {
            Value::Map(pairs) => Some(pairs),
            _ => None,
        }
    }

    pub fn as_ext(&self) -> Option<&Extension> {
        match self {
            Value::Ext(ext) => Some(ext),
            _ => None,
        }
    }

    /// First map value whose key is the byte string `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map()?
            .iter()
            .find(|(k, _)| k.as_bytes() == Some(key.as_bytes()))
            .map(|(_, v)| v)
    }

    /// Builds a map from string keys.
    pub fn map<K, I>(pairs: I) -> Value
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Map(
            pairs
                .into_iter()
                .map(|(k, v)| (Value::Bytes(k.into().into_bytes()), v))
                .collect(),
        )
    }
}

macro_rules! value_from_integer {
    ($($t:ty)*) => {$(
        impl From<$t> for Value {
            fn from(n: $t) -> Self {
                Value::Int(n.into())
            }
        }
    )*};
}

value_from_integer!(u8 u16 u32 u64 usize i8 i16 i32 i64 isize Integer);

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<f32> for Value {
    fn from(f: f32) -> Self {
        Value::Float(f as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Bytes(s.as_bytes().to_vec())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Bytes(s.into_bytes())
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(b)
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Value::Bytes(b.to_vec())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<Vec<(Value, Value)>> for Value {
    fn from(pairs: Vec<(Value, Value)>) -> Self {
        Value::Map(pairs)
    }
}

impl From<Extension> for Value {
    fn from(ext: Extension) -> Self {
        Value::Ext(ext)
    }
}
