//! Extension type registry.
//!
//! Pack handlers turn a [`HostValue`] into an extension payload and are
//! selected by walking the value's [`TypeTag`] chain; unpack handlers turn a
//! payload back into a [`Value`] and are selected by ext type id. Both tables
//! have 128 slots, one per id in `0..=127`.
//!
//! Writers swap in a fresh [`ExtTables`] under a write lock; encoders and
//! decoders grab one [`Registry::snapshot`] per call and never lock again.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use crate::error::{HandlerError, PackError, RegistryError};
use crate::host::{HostValue, TypeTag};
use crate::value::{ExtType, Extension, Value};

const SLOTS: usize = ExtType::MAX as usize + 1;

type PackFn = dyn Fn(&dyn HostValue) -> Result<Vec<u8>, HandlerError> + Send + Sync;
type UnpackFn = dyn Fn(&[u8]) -> Result<Value, HandlerError> + Send + Sync;

/// Turns a host value into an extension payload.
#[derive(Clone)]
pub struct PackHandler(Arc<PackFn>);

impl PackHandler {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&dyn HostValue) -> Result<Vec<u8>, HandlerError> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn call(&self, host: &dyn HostValue) -> Result<Vec<u8>, HandlerError> {
        (self.0)(host)
    }
}

impl fmt::Debug for PackHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PackHandler(..)")
    }
}

/// Turns an extension payload back into a value.
#[derive(Clone)]
pub struct UnpackHandler(Arc<UnpackFn>);

impl UnpackHandler {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&[u8]) -> Result<Value, HandlerError> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn call(&self, data: &[u8]) -> Result<Value, HandlerError> {
        (self.0)(data)
    }
}

impl fmt::Debug for UnpackHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("UnpackHandler(..)")
    }
}

#[derive(Clone, Debug)]
struct PackEntry {
    target: TypeTag,
    handler: PackHandler,
}

/// One immutable generation of the registry tables.
#[derive(Clone)]
pub struct ExtTables {
    packers: Vec<Option<PackEntry>>,
    /// Target tag to the slot that most recently claimed it.
    by_target: HashMap<TypeTag, ExtType>,
    unpackers: Vec<Option<UnpackHandler>>,
}

impl Default for ExtTables {
    fn default() -> Self {
        Self {
            packers: vec![None; SLOTS],
            by_target: HashMap::new(),
            unpackers: vec![None; SLOTS],
        }
    }
}

impl fmt::Debug for ExtTables {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let packers: Vec<(u8, TypeTag)> = self
            .packers
            .iter()
            .enumerate()
            .filter_map(|(id, entry)| entry.as_ref().map(|e| (id as u8, e.target)))
            .collect();
        let unpackers: Vec<usize> = self
            .unpackers
            .iter()
            .enumerate()
            .filter_map(|(id, handler)| handler.as_ref().map(|_| id))
            .collect();
        f.debug_struct("ExtTables")
            .field("packers", &packers)
            .field("unpackers", &unpackers)
            .finish()
    }
}

impl ExtTables {
    fn set_packer(&mut self, ext_type: ExtType, target: TypeTag, handler: PackHandler) {
        if let Some(old) = self.packers[ext_type.get() as usize].take() {
            if self.by_target.get(&old.target) == Some(&ext_type) {
                self.by_target.remove(&old.target);
                // another slot may still serve the displaced target
                if let Some(other) = self.slot_for(old.target) {
                    self.by_target.insert(old.target, other);
                }
            }
        }
        self.packers[ext_type.get() as usize] = Some(PackEntry { target, handler });
        self.by_target.insert(target, ext_type);
    }

    fn slot_for(&self, target: TypeTag) -> Option<ExtType> {
        self.packers
            .iter()
            .position(|entry| entry.as_ref().is_some_and(|e| e.target == target))
            .and_then(|id| ExtType::new(id as i64))
    }

    fn set_unpacker(&mut self, ext_type: ExtType, handler: UnpackHandler) {
        self.unpackers[ext_type.get() as usize] = Some(handler);
    }

    /// Finds the pack handler for `host`.
    ///
    /// Tags are tried in chain order and the first one with a registered
    /// packer wins. Core tags never match, and a value whose own tag is a
    /// core type never resolves at all.
    pub fn resolve_pack(&self, host: &dyn HostValue) -> Option<(ExtType, PackHandler)> {
        let chain = host.type_chain();
        if chain.first().map_or(true, TypeTag::is_core) {
            return None;
        }
        chain
            .iter()
            .filter(|tag| !tag.is_core())
            .find_map(|tag| {
                let ext_type = *self.by_target.get(tag)?;
                let entry = self.packers[ext_type.get() as usize].as_ref()?;
                Some((ext_type, entry.handler.clone()))
            })
    }

    pub fn resolve_unpack(&self, ext_type: ExtType) -> Option<&UnpackHandler> {
        self.unpackers[ext_type.get() as usize].as_ref()
    }

    /// Unpack handler for a raw wire type byte. Negative ids never resolve.
    pub fn resolve_unpack_wire(&self, type_id: i8) -> Option<&UnpackHandler> {
        ExtType::from_wire(type_id).and_then(|t| self.resolve_unpack(t))
    }

    pub fn ext_packer_registered(&self, target: TypeTag) -> bool {
        self.by_target.contains_key(&target)
    }

    pub fn ext_unpacker_registered(&self, type_id: i64) -> bool {
        ExtType::new(type_id).is_some_and(|t| self.resolve_unpack(t).is_some())
    }

    /// Converts `host` into a [`Value`] ready for encoding.
    ///
    /// A `Value` is returned unchanged; anything else goes through its pack
    /// handler and becomes [`Value::Ext`].
    pub fn promote(&self, host: &dyn HostValue) -> Result<Value, PackError> {
        if let Some(value) = host.as_any().downcast_ref::<Value>() {
            return Ok(value.clone());
        }
        self.promote_ext(host).map(Value::Ext)
    }

    pub(crate) fn promote_ext(&self, host: &dyn HostValue) -> Result<Extension, PackError> {
        let (ext_type, handler) = self
            .resolve_pack(host)
            .ok_or_else(|| PackError::Unsupported {
                type_name: host.type_name().to_string(),
            })?;
        let data = handler.call(host).map_err(|source| PackError::Handler {
            type_id: ext_type.get(),
            source,
        })?;
        Ok(Extension::new(ext_type, data))
    }
}

/// Registry of extension pack and unpack handlers.
///
/// Use [`Registry::global`] for the process-wide instance or
/// [`Registry::new`] for an isolated one.
#[derive(Default)]
pub struct Registry {
    tables: RwLock<Arc<ExtTables>>,
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Registry").field(&self.snapshot()).finish()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry used by the crate-level functions.
    pub fn global() -> &'static Registry {
        static GLOBAL: OnceLock<Registry> = OnceLock::new();
        GLOBAL.get_or_init(Registry::new)
    }

    /// The current tables. Later registrations do not affect the snapshot.
    pub fn snapshot(&self) -> Arc<ExtTables> {
        self.tables
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn update(&self, f: impl FnOnce(&mut ExtTables)) {
        let mut guard = self.tables.write().unwrap_or_else(PoisonError::into_inner);
        f(Arc::make_mut(&mut *guard));
    }

    /// Routes host values whose chain contains `target` to ext type
    /// `type_id`. Re-registering an id replaces its previous packer.
    pub fn register_pack_type(
        &self,
        type_id: i64,
        target: TypeTag,
        handler: Option<PackHandler>,
    ) -> Result<(), RegistryError> {
        let op = "register_pack_type";
        let ext_type = ExtType::new(type_id).ok_or(RegistryError::OutOfRange { op, type_id })?;
        let handler = handler.ok_or(RegistryError::MissingHandler { op, type_id })?;
        self.update(|tables| tables.set_packer(ext_type, target, handler));
        Ok(())
    }

    /// Decodes ext type `type_id` through `handler`. Re-registering an id
    /// replaces its previous unpacker.
    pub fn register_unpack_type(
        &self,
        type_id: i64,
        handler: Option<UnpackHandler>,
    ) -> Result<(), RegistryError> {
        let op = "register_unpack_type";
        let ext_type = ExtType::new(type_id).ok_or(RegistryError::OutOfRange { op, type_id })?;
        let handler = handler.ok_or(RegistryError::MissingHandler { op, type_id })?;
        self.update(|tables| tables.set_unpacker(ext_type, handler));
        Ok(())
    }

    pub fn resolve_pack(&self, host: &dyn HostValue) -> Option<(ExtType, PackHandler)> {
        self.snapshot().resolve_pack(host)
    }

    pub fn resolve_unpack(&self, ext_type: ExtType) -> Option<UnpackHandler> {
        self.snapshot().resolve_unpack(ext_type).cloned()
    }

    pub fn ext_packer_registered(&self, target: TypeTag) -> bool {
        self.snapshot().ext_packer_registered(target)
    }

    pub fn ext_unpacker_registered(&self, type_id: i64) -> bool {
        self.snapshot().ext_unpacker_registered(type_id)
    }

    pub fn promote(&self, host: &dyn HostValue) -> Result<Value, PackError> {
        self.snapshot().promote(host)
    }
}
