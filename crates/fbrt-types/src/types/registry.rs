use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use super::defs::{builtin_definition, StructField, Type, TypeId, BUILTIN_IDS};

/// Data types known to a resource: the built-ins plus registered structs and
/// arrays. Names resolve case-insensitively.
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    types: FxHashMap<TypeId, Type>,
    /// Upper-cased name of each user type.
    by_name: FxHashMap<SmolStr, TypeId>,
    /// Name as registered.
    names: FxHashMap<TypeId, SmolStr>,
    next_id: u32,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Registry holding only the built-in types.
    #[must_use]
    pub fn new() -> Self {
        let types = BUILTIN_IDS
            .iter()
            .filter_map(|id| builtin_definition(*id).map(|ty| (*id, ty)))
            .chain(std::iter::once((TypeId::UNKNOWN, Type::Unknown)))
            .collect();
        Self {
            types,
            by_name: FxHashMap::default(),
            names: FxHashMap::default(),
            next_id: TypeId::USER_TYPES_START,
        }
    }

    /// Registers `ty` under a fresh id. A repeated name is rebound to the new
    /// id; values already carrying the old id keep it.
    fn register(&mut self, name: SmolStr, ty: Type) -> TypeId {
        let id = TypeId(self.next_id);
        self.next_id += 1;
        self.by_name
            .insert(SmolStr::new(name.to_ascii_uppercase()), id);
        self.names.insert(id, name);
        self.types.insert(id, ty);
        id
    }

    /// Registers a struct type.
    pub fn register_struct(
        &mut self,
        name: impl Into<SmolStr>,
        fields: Vec<StructField>,
    ) -> TypeId {
        let name = name.into();
        self.register(name.clone(), Type::Struct { name, fields })
    }

    /// Registers a one-dimensional array type with inclusive bounds.
    pub fn register_array(
        &mut self,
        name: impl Into<SmolStr>,
        element: TypeId,
        lower: i64,
        upper: i64,
    ) -> TypeId {
        let name = name.into();
        let ty = Type::Array {
            name: name.clone(),
            element,
            lower,
            upper,
        };
        self.register(name, ty)
    }

    #[must_use]
    pub fn type_name(&self, id: TypeId) -> Option<SmolStr> {
        id.builtin_name()
            .map(SmolStr::new_inline)
            .or_else(|| self.names.get(&id).cloned())
    }

    #[must_use]
    pub fn get(&self, id: TypeId) -> Option<&Type> {
        self.types.get(&id)
    }

    /// Resolves a built-in or registered type name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<TypeId> {
        TypeId::from_builtin_name(name).or_else(|| {
            self.by_name
                .get(name.to_ascii_uppercase().as_str())
                .copied()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_resolve_by_any_alias() {
        let registry = TypeRegistry::new();
        assert_eq!(registry.lookup("INT"), Some(TypeId::INT));
        assert_eq!(registry.lookup("int"), Some(TypeId::INT));
        assert_eq!(registry.lookup("TIME_OF_DAY"), Some(TypeId::TOD));
        assert_eq!(registry.lookup("POINT"), None);
        assert_eq!(registry.get(TypeId::UNKNOWN), Some(&Type::Unknown));
        assert_eq!(registry.get(TypeId::ANY_NUM), Some(&Type::AnyNum));
    }

    #[test]
    fn user_types_keep_their_spelling() {
        let mut registry = TypeRegistry::new();
        let id = registry.register_struct("Point", vec![StructField::new("X", TypeId::INT)]);
        assert!(id.0 >= TypeId::USER_TYPES_START);
        assert_eq!(registry.lookup("Point"), Some(id));
        assert_eq!(registry.lookup("POINT"), Some(id));
        assert_eq!(registry.type_name(id).as_deref(), Some("Point"));

        let again = registry.register_array("Point", TypeId::INT, 0, 1);
        assert_eq!(registry.lookup("point"), Some(again));
        assert!(registry.get(id).is_some());
    }
}
