//! Function block type library and data type registry.
//!
//! Compiled FB types register a `'static` interface and a body factory.
//! Generic FB types register under `GEN_<KIND>` and synthesize an interface
//! from the requested type name, e.g. `STRUCT_MUX_1POINT` resolves to
//! `GEN_STRUCT_MUX` configured with `STRUCT_MUX_1POINT`. Synthesized
//! interfaces are shared by every instance of one configuration and released
//! with the last of them.

#![allow(missing_docs)]

use std::fmt;
use std::sync::{Arc, Weak};

use fbrt_types::{StringDictionary, StringId, StructField, TypeId, TypeRegistry};
use parking_lot::{Mutex, RwLock};
use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use tracing::debug;

use crate::error::RuntimeError;
use crate::fb::FbBody;
use crate::interface::{InterfaceSpec, SpecHandle};
use crate::value::{default_value_for_port, default_value_for_type_id, AnyValue};

/// Factory for the body of a compiled FB type.
pub type BodyFactory = fn() -> Box<dyn FbBody>;

/// FB type whose interface depends on a configuration string.
pub trait GenericFbType: Send + Sync {
    /// Builds the interface for `config`, the full requested type name.
    fn create_interface_spec(
        &self,
        config: &str,
        library: &TypeLibrary,
    ) -> Result<InterfaceSpec, RuntimeError>;

    /// Creates a body for an instance using `spec`.
    fn create_body(&self, spec: &InterfaceSpec) -> Box<dyn FbBody>;
}

#[derive(Clone)]
enum FbTypeEntry {
    Static {
        spec: &'static InterfaceSpec,
        factory: BodyFactory,
    },
    Generic(Arc<dyn GenericFbType>),
}

/// Registry of data types and FB types known to a resource.
pub struct TypeLibrary {
    dictionary: Arc<StringDictionary>,
    registry: RwLock<TypeRegistry>,
    fb_types: RwLock<FxHashMap<StringId, FbTypeEntry>>,
    spec_cache: Mutex<FxHashMap<SmolStr, Weak<InterfaceSpec>>>,
}

impl fmt::Debug for TypeLibrary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeLibrary")
            .field("fb_types", &self.fb_types.read().len())
            .field("cached_specs", &self.spec_cache.lock().len())
            .finish_non_exhaustive()
    }
}

impl TypeLibrary {
    /// Library with the built-in data types and no FB types.
    #[must_use]
    pub fn new(dictionary: Arc<StringDictionary>) -> Self {
        Self {
            dictionary,
            registry: RwLock::new(TypeRegistry::new()),
            fb_types: RwLock::new(FxHashMap::default()),
            spec_cache: Mutex::new(FxHashMap::default()),
        }
    }

    /// Library with the standard FB types registered.
    #[must_use]
    pub fn standard(dictionary: Arc<StringDictionary>) -> Self {
        let library = Self::new(dictionary);
        crate::stdlib::fbs::register(&library);
        library
    }

    #[must_use]
    pub fn dictionary(&self) -> &Arc<StringDictionary> {
        &self.dictionary
    }

    /// Registers a struct data type.
    pub fn register_struct(&self, name: &str, fields: Vec<StructField>) -> TypeId {
        self.dictionary.insert(name);
        for field in &fields {
            self.dictionary.insert(&field.name);
        }
        self.registry.write().register_struct(name, fields)
    }

    /// Registers a one-dimensional array data type.
    pub fn register_array(&self, name: &str, element: TypeId, lower: i64, upper: i64) -> TypeId {
        self.dictionary.insert(name);
        self.registry
            .write()
            .register_array(name, element, lower, upper)
    }

    /// Resolves a data type name, built-in names case-insensitively.
    #[must_use]
    pub fn resolve_type(&self, name: &str) -> Option<TypeId> {
        TypeId::from_builtin_name(name).or_else(|| self.registry.read().lookup(name))
    }

    #[must_use]
    pub fn type_name(&self, id: TypeId) -> SmolStr {
        self.registry
            .read()
            .type_name(id)
            .unwrap_or_else(|| SmolStr::new_inline("?"))
    }

    #[must_use]
    pub fn is_assignable(&self, target: TypeId, source: TypeId) -> bool {
        self.registry.read().is_assignable(target, source)
    }

    /// Initial value of a port declared with `type_id`.
    pub fn default_port_value(&self, type_id: TypeId) -> Result<AnyValue, RuntimeError> {
        let value = default_value_for_port(type_id, &self.registry.read());
        value.map_err(|err| {
            RuntimeError::UnknownType(SmolStr::new(format!("{} ({err:?})", self.type_name(type_id))))
        })
    }

    /// Creates a default value of the data type interned as `type_name`.
    #[must_use]
    pub fn create_data_type_instance(&self, type_name: StringId) -> Option<AnyValue> {
        let name = self.dictionary.get(type_name)?;
        let type_id = self.resolve_type(&name)?;
        if type_id.is_generic() {
            return None;
        }
        default_value_for_type_id(type_id, &self.registry.read()).ok()
    }

    /// Registers a compiled FB type.
    pub fn register_fb_type(&self, name: &str, spec: &'static InterfaceSpec, factory: BodyFactory) {
        let id = self.dictionary.insert(name);
        self.fb_types
            .write()
            .insert(id, FbTypeEntry::Static { spec, factory });
    }

    /// Registers a generic FB type under its `GEN_` name.
    pub fn register_generic_fb_type(&self, name: &str, generic: Arc<dyn GenericFbType>) {
        let id = self.dictionary.insert(name);
        self.fb_types
            .write()
            .insert(id, FbTypeEntry::Generic(generic));
    }

    /// Registered FB type names, sorted.
    #[must_use]
    pub fn fb_type_names(&self) -> Vec<SmolStr> {
        let mut names: Vec<SmolStr> = self
            .fb_types
            .read()
            .keys()
            .map(|id| self.dictionary.name(*id))
            .collect();
        names.sort();
        names
    }

    fn lookup_fb_type(&self, name: &str) -> Option<FbTypeEntry> {
        let types = self.fb_types.read();
        let direct = self.dictionary.get_id(name);
        if let Some(entry) = types.get(&direct) {
            return Some(entry.clone());
        }
        let generic = generic_type_name(name)?;
        types.get(&self.dictionary.get_id(&generic)).cloned()
    }

    /// Interface of the FB type `name`, synthesizing it for generic types.
    pub fn interface_of(&self, name: &str) -> Result<SpecHandle, RuntimeError> {
        match self.entry(name)? {
            FbTypeEntry::Static { spec, .. } => Ok(SpecHandle::Static(spec)),
            FbTypeEntry::Generic(generic) => self.generic_spec(name, generic.as_ref()),
        }
    }

    /// Resolves `name` and creates the interface and body for a new instance.
    pub fn instantiate(&self, name: &str) -> Result<(SpecHandle, Box<dyn FbBody>), RuntimeError> {
        match self.entry(name)? {
            FbTypeEntry::Static { spec, factory } => Ok((SpecHandle::Static(spec), factory())),
            FbTypeEntry::Generic(generic) => {
                let spec = self.generic_spec(name, generic.as_ref())?;
                let body = generic.create_body(&spec);
                Ok((spec, body))
            }
        }
    }

    fn entry(&self, name: &str) -> Result<FbTypeEntry, RuntimeError> {
        self.lookup_fb_type(name)
            .ok_or_else(|| RuntimeError::UnknownFbType(SmolStr::new(name)))
    }

    fn generic_spec(
        &self,
        config: &str,
        generic: &dyn GenericFbType,
    ) -> Result<SpecHandle, RuntimeError> {
        let mut cache = self.spec_cache.lock();
        if let Some(spec) = cache.get(config).and_then(Weak::upgrade) {
            return Ok(SpecHandle::Shared(spec));
        }
        let spec = generic
            .create_interface_spec(config, self)
            .and_then(|spec| spec.validate().map(|()| spec))
            .map_err(|err| {
                debug!("generic interface for {config} failed: {err}");
                err
            })?;
        let spec = Arc::new(spec);
        cache.retain(|_, cached| cached.strong_count() > 0);
        cache.insert(SmolStr::new(config), Arc::downgrade(&spec));
        Ok(SpecHandle::Shared(spec))
    }

    /// Synthesized interfaces currently alive.
    #[must_use]
    pub fn live_generic_specs(&self) -> usize {
        self.spec_cache
            .lock()
            .values()
            .filter(|spec| spec.strong_count() > 0)
            .count()
    }
}

/// Generic type serving a configured type name: `<KIND>_<digit>...` maps to
/// `GEN_<KIND>`, splitting at the first `_` followed by a digit.
#[must_use]
pub fn generic_type_name(name: &str) -> Option<String> {
    let bytes = name.as_bytes();
    let split = bytes
        .windows(2)
        .position(|pair| pair[0] == b'_' && pair[1].is_ascii_digit())?;
    if split == 0 {
        return None;
    }
    Some(format!("GEN_{}", &name[..split]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generic_names_split_at_first_numbered_segment() {
        assert_eq!(
            generic_type_name("STRUCT_MUX_1POINT").as_deref(),
            Some("GEN_STRUCT_MUX")
        );
        assert_eq!(
            generic_type_name("STRUCT_DEMUX_2MY_POINT").as_deref(),
            Some("GEN_STRUCT_DEMUX")
        );
        assert_eq!(generic_type_name("E_RS"), None);
        assert_eq!(generic_type_name("_1X"), None);
    }

    #[test]
    fn data_type_instances_resolve_by_interned_name() {
        let library = TypeLibrary::new(StringDictionary::shared());
        library.register_struct(
            "POINT",
            vec![
                StructField::new("X", TypeId::INT),
                StructField::new("Y", TypeId::INT),
            ],
        );
        let id = library.dictionary().get_id("POINT");
        let value = library.create_data_type_instance(id).unwrap();
        assert_eq!(value.type_name(), "POINT");
        assert_eq!(
            library.create_data_type_instance(fbrt_types::names::DINT),
            Some(AnyValue::DInt(0))
        );
        assert_eq!(
            library.create_data_type_instance(fbrt_types::names::ANY_NUM),
            None
        );
        assert_eq!(library.create_data_type_instance(StringId::INVALID), None);
    }
}
