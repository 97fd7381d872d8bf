//! Host values: application types that can be packed through the registry.

use std::any::Any;
use std::fmt;

use crate::value::{CoreType, Value};

/// One link of a host type's ancestry.
///
/// A type's chain lists its own tag first, then those of its ancestors and of
/// any capability it takes part in, most specific first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    /// A built-in value category. Registry targets of this kind are
    /// accepted but never matched.
    Core(CoreType),
    Named(&'static str),
}

impl TypeTag {
    pub const fn named(name: &'static str) -> Self {
        TypeTag::Named(name)
    }

    pub fn is_core(&self) -> bool {
        matches!(self, TypeTag::Core(_))
    }

    pub fn name(&self) -> &'static str {
        match self {
            TypeTag::Core(core) => core.name(),
            TypeTag::Named(name) => name,
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<CoreType> for TypeTag {
    fn from(core: CoreType) -> Self {
        TypeTag::Core(core)
    }
}

/// A value the registry can turn into an extension.
///
/// ```
/// use std::any::Any;
/// use simplemsgpack::{HostValue, TypeTag};
///
/// struct Point(i32, i32);
///
/// impl HostValue for Point {
///     fn type_chain(&self) -> &[TypeTag] {
///         const CHAIN: &[TypeTag] = &[TypeTag::named("Point"), TypeTag::named("Shape")];
///         CHAIN
///     }
///     fn as_any(&self) -> &dyn Any {
///         self
///     }
/// }
/// ```
pub trait HostValue: Any {
    /// Own tag first, then ancestors and capabilities.
    fn type_chain(&self) -> &[TypeTag];

    fn as_any(&self) -> &dyn Any;

    fn type_name(&self) -> &'static str {
        self.type_chain().first().map_or("<untagged>", TypeTag::name)
    }
}

const NIL_CHAIN: &[TypeTag] = &[TypeTag::Core(CoreType::Nil)];
const BOOL_CHAIN: &[TypeTag] = &[TypeTag::Core(CoreType::Bool)];
const INT_CHAIN: &[TypeTag] = &[TypeTag::Core(CoreType::Int)];
const FLOAT_CHAIN: &[TypeTag] = &[TypeTag::Core(CoreType::Float)];
const BYTES_CHAIN: &[TypeTag] = &[TypeTag::Core(CoreType::Bytes)];
const ARRAY_CHAIN: &[TypeTag] = &[TypeTag::Core(CoreType::Array)];
const MAP_CHAIN: &[TypeTag] = &[TypeTag::Core(CoreType::Map)];
const EXT_CHAIN: &[TypeTag] = &[TypeTag::Core(CoreType::Ext)];

impl HostValue for Value {
    fn type_chain(&self) -> &[TypeTag] {
        match self.kind() {
            CoreType::Nil => NIL_CHAIN,
            CoreType::Bool => BOOL_CHAIN,
            CoreType::Int => INT_CHAIN,
            CoreType::Float => FLOAT_CHAIN,
            CoreType::Bytes => BYTES_CHAIN,
            CoreType::Array => ARRAY_CHAIN,
            CoreType::Map => MAP_CHAIN,
            CoreType::Ext => EXT_CHAIN,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
