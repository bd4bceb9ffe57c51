use super::defs::{Type, TypeId};
use super::registry::TypeRegistry;

impl TypeRegistry {
    /// Returns true if a value of type `source` may be connected or assigned
    /// to a port declared as `target`: same type, an implicit widening, or
    /// membership in a generic family.
    #[must_use]
    pub fn is_assignable(&self, target: TypeId, source: TypeId) -> bool {
        if target == source {
            return true;
        }
        match (self.get(target), self.get(source)) {
            (Some(target), Some(source)) => target
                .family_contains(source)
                .unwrap_or_else(|| self.converts(target, source)),
            _ => false,
        }
    }

    /// Returns true if `source` implicitly widens to the concrete type
    /// `target` without loss.
    #[must_use]
    pub fn is_widening(&self, target: TypeId, source: TypeId) -> bool {
        match (self.get(target), self.get(source)) {
            (Some(target), Some(source)) if !target.is_generic() => {
                self.converts(target, source)
            }
            _ => false,
        }
    }

    fn converts(&self, target: &Type, source: &Type) -> bool {
        if target == source {
            return true;
        }
        match target {
            Type::Array {
                element,
                lower,
                upper,
                ..
            } => {
                let Type::Array {
                    element: source_element,
                    lower: source_lower,
                    upper: source_upper,
                    ..
                } = source
                else {
                    return false;
                };
                (lower, upper) == (source_lower, source_upper)
                    && (element == source_element
                        || matches!(
                            (self.get(*element), self.get(*source_element)),
                            (Some(t), Some(s)) if self.converts(t, s)
                        ))
            }
            // declared lengths do not matter
            Type::String { .. } | Type::WString { .. } => {
                std::mem::discriminant(target) == std::mem::discriminant(source)
            }
            _ => widens(target, source),
        }
    }
}

/// IEC implicit conversions between elementary types.
fn widens(target: &Type, source: &Type) -> bool {
    match target {
        Type::Int => matches!(source, Type::SInt | Type::USInt),
        Type::DInt => matches!(source, Type::SInt | Type::Int | Type::USInt | Type::UInt),
        Type::LInt => {
            matches!(source, Type::DInt | Type::UDInt) || widens(&Type::DInt, source)
        }
        Type::UInt => matches!(source, Type::USInt),
        Type::UDInt => matches!(source, Type::USInt | Type::UInt),
        Type::ULInt => matches!(source, Type::USInt | Type::UInt | Type::UDInt),
        Type::Real => matches!(source, Type::SInt | Type::Int | Type::USInt | Type::UInt),
        Type::LReal => {
            matches!(source, Type::Real | Type::DInt | Type::UDInt) || widens(&Type::Real, source)
        }
        Type::Byte => matches!(source, Type::Bool),
        Type::Word => matches!(source, Type::Byte) || widens(&Type::Byte, source),
        Type::DWord => matches!(source, Type::Word) || widens(&Type::Word, source),
        Type::LWord => matches!(source, Type::DWord) || widens(&Type::DWord, source),
        Type::LTime => matches!(source, Type::Time),
        Type::LDate => matches!(source, Type::Date),
        Type::LTod => matches!(source, Type::Tod),
        Type::Ldt => matches!(source, Type::Dt),
        Type::WChar => matches!(source, Type::Char),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StructField;

    #[test]
    fn widening_follows_the_iec_table() {
        let registry = TypeRegistry::new();
        assert!(registry.is_assignable(TypeId::DINT, TypeId::INT));
        assert!(registry.is_assignable(TypeId::LINT, TypeId::SINT));
        assert!(registry.is_assignable(TypeId::REAL, TypeId::INT));
        assert!(registry.is_assignable(TypeId::LREAL, TypeId::UDINT));
        assert!(registry.is_assignable(TypeId::LWORD, TypeId::BOOL));
        assert!(registry.is_assignable(TypeId::LDT, TypeId::DT));
        assert!(!registry.is_assignable(TypeId::INT, TypeId::DINT));
        assert!(!registry.is_assignable(TypeId::REAL, TypeId::DINT));
        assert!(!registry.is_assignable(TypeId::UINT, TypeId::SINT));
    }

    #[test]
    fn generic_families_accept_their_members() {
        let mut registry = TypeRegistry::new();
        assert!(registry.is_assignable(TypeId::ANY_ELEMENTARY, TypeId::BOOL));
        assert!(registry.is_assignable(TypeId::ANY_UNSIGNED, TypeId::UDINT));
        assert!(!registry.is_assignable(TypeId::ANY_UNSIGNED, TypeId::DINT));
        assert!(registry.is_assignable(TypeId::ANY_CHARS, TypeId::WSTRING));

        let point = registry.register_struct("POINT", vec![StructField::new("X", TypeId::INT)]);
        assert!(registry.is_assignable(TypeId::ANY_DERIVED, point));
        assert!(registry.is_assignable(TypeId::ANY, point));
        assert!(!registry.is_assignable(TypeId::ANY_ELEMENTARY, point));
    }

    #[test]
    fn arrays_match_on_bounds_and_element() {
        let mut registry = TypeRegistry::new();
        let a = registry.register_array("A", TypeId::INT, 0, 3);
        let b = registry.register_array("B", TypeId::SINT, 0, 3);
        let c = registry.register_array("C", TypeId::INT, 1, 4);
        assert!(registry.is_assignable(a, b));
        assert!(!registry.is_assignable(b, a));
        assert!(!registry.is_assignable(a, c));
    }

    #[test]
    fn generic_targets_are_not_widening() {
        let registry = TypeRegistry::new();
        assert!(registry.is_widening(TypeId::LREAL, TypeId::REAL));
        assert!(!registry.is_widening(TypeId::ANY_NUM, TypeId::REAL));
        assert!(registry.is_assignable(TypeId::ANY_NUM, TypeId::REAL));
    }
}
