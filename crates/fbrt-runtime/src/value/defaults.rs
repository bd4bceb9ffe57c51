use fbrt_types::{Type, TypeId, TypeRegistry};
use indexmap::IndexMap;
use smol_str::SmolStr;

use super::{
    AnyValue, ArrayValue, DateTimeValue, DateValue, Duration, LDateTimeValue, LDateValue,
    LTimeOfDayValue, StructValue, TimeOfDayValue,
};

/// Errors when computing default values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultValueError {
    /// Type ID is not registered.
    UnknownType,
    /// Generic families have no value of their own.
    UnsupportedType,
    /// Array bounds are invalid.
    InvalidArrayBounds,
}

impl AnyValue {
    /// Zero/default value for an elementary type tag. Returns `None` for
    /// generic, derived and unknown tags.
    #[must_use]
    pub fn default_for(type_id: TypeId) -> Option<Self> {
        Some(match type_id {
            TypeId::BOOL => Self::Bool(false),
            TypeId::SINT => Self::SInt(0),
            TypeId::INT => Self::Int(0),
            TypeId::DINT => Self::DInt(0),
            TypeId::LINT => Self::LInt(0),
            TypeId::USINT => Self::USInt(0),
            TypeId::UINT => Self::UInt(0),
            TypeId::UDINT => Self::UDInt(0),
            TypeId::ULINT => Self::ULInt(0),
            TypeId::REAL => Self::Real(0.0),
            TypeId::LREAL => Self::LReal(0.0),
            TypeId::BYTE => Self::Byte(0),
            TypeId::WORD => Self::Word(0),
            TypeId::DWORD => Self::DWord(0),
            TypeId::LWORD => Self::LWord(0),
            TypeId::TIME => Self::Time(Duration::ZERO),
            TypeId::LTIME => Self::LTime(Duration::ZERO),
            TypeId::DATE => Self::Date(DateValue::new(0)),
            TypeId::LDATE => Self::LDate(LDateValue::new(0)),
            TypeId::TOD => Self::Tod(TimeOfDayValue::new(0)),
            TypeId::LTOD => Self::LTod(LTimeOfDayValue::new(0)),
            TypeId::DT => Self::Dt(DateTimeValue::new(0)),
            TypeId::LDT => Self::Ldt(LDateTimeValue::new(0)),
            TypeId::STRING => Self::String(SmolStr::default()),
            TypeId::WSTRING => Self::WString(String::new()),
            TypeId::CHAR => Self::Char(0),
            TypeId::WCHAR => Self::WChar(0),
            _ => return None,
        })
    }

    /// Replaces `self` with the default value of an elementary type tag.
    /// Returns `false` (leaving `self` untouched) for unknown tags.
    pub fn set_default_value(&mut self, type_id: TypeId) -> bool {
        match Self::default_for(type_id) {
            Some(value) => {
                *self = value;
                true
            }
            None => false,
        }
    }

    /// Default value of the same type as `self`. Derived values keep their
    /// shape and member names.
    #[must_use]
    pub fn zeroed(&self) -> Self {
        match self {
            Self::Array(array) => Self::Array(Box::new(ArrayValue {
                type_id: array.type_id,
                type_name: array.type_name.clone(),
                element_type: array.element_type,
                lower: array.lower,
                elements: array.elements.iter().map(Self::zeroed).collect(),
            })),
            Self::Struct(value) => Self::Struct(Box::new(StructValue {
                type_id: value.type_id,
                type_name: value.type_name.clone(),
                fields: value
                    .fields
                    .iter()
                    .map(|(name, member)| (name.clone(), member.zeroed()))
                    .collect(),
            })),
            other => Self::default_for(other.type_id()).unwrap_or_else(|| other.clone()),
        }
    }

    /// Resets the active variant to its default value.
    pub fn reset(&mut self) {
        *self = self.zeroed();
    }
}

/// Largest element count of an array type.
pub const MAX_ARRAY_ELEMENTS: usize = 65_536;

/// Element count of an array with inclusive bounds `lower..=upper`, or `None`
/// when the bounds are reversed or exceed [`MAX_ARRAY_ELEMENTS`].
#[must_use]
pub fn array_len(lower: i64, upper: i64) -> Option<usize> {
    let span = upper.checked_sub(lower)?.checked_add(1)?;
    usize::try_from(span)
        .ok()
        .filter(|len| (1..=MAX_ARRAY_ELEMENTS).contains(len))
}

/// Concrete type a generic port holds before it is configured: the first
/// member of the family in declaration order. `ANY_DERIVED` has none.
#[must_use]
pub fn generic_representative(type_id: TypeId) -> Option<TypeId> {
    Some(match type_id {
        TypeId::ANY
        | TypeId::ANY_ELEMENTARY
        | TypeId::ANY_MAGNITUDE
        | TypeId::ANY_NUM
        | TypeId::ANY_INT
        | TypeId::ANY_SIGNED => TypeId::SINT,
        TypeId::ANY_UNSIGNED => TypeId::USINT,
        TypeId::ANY_REAL => TypeId::REAL,
        TypeId::ANY_DURATION => TypeId::TIME,
        TypeId::ANY_BIT => TypeId::BOOL,
        TypeId::ANY_CHARS | TypeId::ANY_CHAR => TypeId::CHAR,
        TypeId::ANY_STRING => TypeId::STRING,
        TypeId::ANY_DATE => TypeId::DATE,
        _ => return None,
    })
}

/// Default value for a type ID using the provided registry.
pub fn default_value_for_type_id(
    type_id: TypeId,
    registry: &TypeRegistry,
) -> Result<AnyValue, DefaultValueError> {
    let ty = registry
        .get(type_id)
        .ok_or(DefaultValueError::UnknownType)?;
    default_value_for_type(type_id, ty, registry)
}

/// Initial value of a port declared with `type_id`. Generic declarations get
/// their family representative; `ANY_DERIVED` gets an empty struct.
pub fn default_value_for_port(
    type_id: TypeId,
    registry: &TypeRegistry,
) -> Result<AnyValue, DefaultValueError> {
    if type_id == TypeId::ANY_DERIVED {
        return Ok(AnyValue::Struct(Box::new(StructValue {
            type_id,
            type_name: SmolStr::new_inline("ANY_DERIVED"),
            fields: IndexMap::new(),
        })));
    }
    match generic_representative(type_id) {
        Some(concrete) => default_value_for_type_id(concrete, registry),
        None => default_value_for_type_id(type_id, registry),
    }
}

fn default_value_for_type(
    type_id: TypeId,
    ty: &Type,
    registry: &TypeRegistry,
) -> Result<AnyValue, DefaultValueError> {
    match ty {
        Type::Array {
            name,
            element,
            lower,
            upper,
        } => {
            let total = array_len(*lower, *upper).ok_or(DefaultValueError::InvalidArrayBounds)?;
            let prototype = default_value_for_type_id(*element, registry)?;
            Ok(AnyValue::Array(Box::new(ArrayValue {
                type_id,
                type_name: name.clone(),
                element_type: *element,
                lower: *lower,
                elements: vec![prototype; total],
            })))
        }
        Type::Struct { name, fields } => {
            let mut values = IndexMap::with_capacity(fields.len());
            for field in fields {
                values.insert(
                    field.name.clone(),
                    default_value_for_type_id(field.type_id, registry)?,
                );
            }
            Ok(AnyValue::Struct(Box::new(StructValue {
                type_id,
                type_name: name.clone(),
                fields: values,
            })))
        }
        Type::String { .. } => Ok(AnyValue::String(SmolStr::default())),
        Type::WString { .. } => Ok(AnyValue::WString(String::new())),
        Type::Unknown => Err(DefaultValueError::UnknownType),
        other if other.is_generic() => Err(DefaultValueError::UnsupportedType),
        _ => AnyValue::default_for(type_id).ok_or(DefaultValueError::UnsupportedType),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fbrt_types::StructField;

    #[test]
    fn unknown_tags_leave_value_untouched() {
        let mut value = AnyValue::Int(7);
        assert!(!value.set_default_value(TypeId::ANY_NUM));
        assert_eq!(value, AnyValue::Int(7));
        assert!(value.set_default_value(TypeId::TIME));
        assert_eq!(value, AnyValue::Time(Duration::ZERO));
    }

    #[test]
    fn struct_defaults_follow_declaration_order() {
        let mut registry = TypeRegistry::new();
        let id = registry.register_struct(
            "POINT",
            vec![
                StructField::new("Y", TypeId::REAL),
                StructField::new("X", TypeId::INT),
            ],
        );
        let value = default_value_for_type_id(id, &registry).unwrap();
        let names: Vec<_> = value.as_struct().unwrap().member_names().cloned().collect();
        assert_eq!(names, ["Y", "X"]);
        assert_eq!(value.type_id(), id);
        assert_eq!(value.type_name(), "POINT");
    }

    #[test]
    fn array_bounds_are_checked() {
        assert_eq!(array_len(1, 3), Some(3));
        assert_eq!(array_len(-2, 2), Some(5));
        assert_eq!(array_len(3, 1), None);
        assert_eq!(array_len(i64::MIN, i64::MAX), None);
        assert_eq!(array_len(0, MAX_ARRAY_ELEMENTS as i64), None);

        let mut registry = TypeRegistry::new();
        let big = registry.register_array("BIG", TypeId::INT, i64::MIN, i64::MAX);
        assert_eq!(
            default_value_for_type_id(big, &registry),
            Err(DefaultValueError::InvalidArrayBounds)
        );
    }

    #[test]
    fn generic_ports_use_family_representative() {
        let registry = TypeRegistry::new();
        assert_eq!(
            default_value_for_port(TypeId::ANY_REAL, &registry),
            Ok(AnyValue::Real(0.0))
        );
        assert_eq!(
            default_value_for_type_id(TypeId::ANY_NUM, &registry),
            Err(DefaultValueError::UnsupportedType)
        );
    }
}
