use std::sync::OnceLock;

use fbrt_types::{TypeId, TypeRegistry};

use super::{
    AnyValue, DateTimeValue, DateValue, Duration, LDateTimeValue, LDateValue, LTimeOfDayValue,
    TimeOfDayValue,
};

fn builtin_registry() -> &'static TypeRegistry {
    static REGISTRY: OnceLock<TypeRegistry> = OnceLock::new();
    REGISTRY.get_or_init(TypeRegistry::new)
}

/// Returns true if a value of elementary type `source` converts to `target`
/// without loss under IEC implicit conversion rules.
#[must_use]
pub fn is_implicit_conversion(target: TypeId, source: TypeId) -> bool {
    target == source || builtin_registry().is_widening(target, source)
}

impl AnyValue {
    /// Copies `other` into `self`, keeping the active variant.
    ///
    /// Identical variants are copied; implicit widening conversions are
    /// applied; arrays of equal length and structs of the same type are copied
    /// member-wise. Anything else resets `self` to its zero value.
    pub fn set_value(&mut self, other: &AnyValue) {
        if self.type_id() == other.type_id() && !self.is_derived() {
            self.clone_from(other);
            return;
        }
        match (&mut *self, other) {
            (Self::Array(target), Self::Array(source)) => {
                if target.len() == source.len() {
                    for (dst, src) in target.elements.iter_mut().zip(source.elements.iter()) {
                        dst.set_value(src);
                    }
                    return;
                }
            }
            (Self::Struct(target), Self::Struct(source)) => {
                if target.type_name == source.type_name {
                    for (name, dst) in &mut target.fields {
                        if let Some(src) = source.fields.get(name) {
                            dst.set_value(src);
                        }
                    }
                    return;
                }
            }
            (target, source) => {
                if let Some(converted) = convert(source, target.type_id()) {
                    *target = converted;
                    return;
                }
            }
        }
        self.reset();
    }

    /// Replaces `self` with `other`, switching the active variant. This is the
    /// assignment used by ports declared with a generic type.
    pub fn assign(&mut self, other: &AnyValue) {
        self.clone_from(other);
    }

    /// Structural equality within the active variant. Values of different
    /// types are never equal; arrays and structs compare element-wise.
    #[must_use]
    pub fn equals(&self, other: &AnyValue) -> bool {
        self == other
    }
}

/// Converts `value` to the elementary type `target` if the conversion is an
/// implicit widening.
#[must_use]
pub fn convert(value: &AnyValue, target: TypeId) -> Option<AnyValue> {
    let source = value.type_id();
    if source == target {
        return Some(value.clone());
    }
    if !is_implicit_conversion(target, source) {
        return None;
    }
    if let Some(nanos) = value.as_nanos() {
        return Some(match target {
            TypeId::LTIME => AnyValue::LTime(Duration::from_nanos(nanos)),
            TypeId::TIME => AnyValue::Time(Duration::from_nanos(nanos)),
            TypeId::DATE => AnyValue::Date(DateValue::new(nanos)),
            TypeId::LDATE => AnyValue::LDate(LDateValue::new(nanos)),
            TypeId::TOD => AnyValue::Tod(TimeOfDayValue::new(nanos)),
            TypeId::LTOD => AnyValue::LTod(LTimeOfDayValue::new(nanos)),
            TypeId::DT => AnyValue::Dt(DateTimeValue::new(nanos)),
            TypeId::LDT => AnyValue::Ldt(LDateTimeValue::new(nanos)),
            _ => return None,
        });
    }
    match (value, target) {
        (AnyValue::Char(c), TypeId::WCHAR) => return Some(AnyValue::WChar(u16::from(*c))),
        (AnyValue::Real(v), TypeId::LREAL) => return Some(AnyValue::LReal(f64::from(*v))),
        _ => {}
    }
    let int = value.as_i128()?;
    match target {
        TypeId::REAL => Some(AnyValue::Real(int as f32)),
        TypeId::LREAL => Some(AnyValue::LReal(int as f64)),
        _ => from_i128(int, target),
    }
}

/// Builds an integer or bit-string value of type `target`, failing when
/// `value` does not fit.
pub(crate) fn from_i128(value: i128, target: TypeId) -> Option<AnyValue> {
    Some(match target {
        TypeId::BOOL => match value {
            0 => AnyValue::Bool(false),
            1 => AnyValue::Bool(true),
            _ => return None,
        },
        TypeId::SINT => AnyValue::SInt(i8::try_from(value).ok()?),
        TypeId::INT => AnyValue::Int(i16::try_from(value).ok()?),
        TypeId::DINT => AnyValue::DInt(i32::try_from(value).ok()?),
        TypeId::LINT => AnyValue::LInt(i64::try_from(value).ok()?),
        TypeId::USINT => AnyValue::USInt(u8::try_from(value).ok()?),
        TypeId::UINT => AnyValue::UInt(u16::try_from(value).ok()?),
        TypeId::UDINT => AnyValue::UDInt(u32::try_from(value).ok()?),
        TypeId::ULINT => AnyValue::ULInt(u64::try_from(value).ok()?),
        TypeId::BYTE => AnyValue::Byte(u8::try_from(value).ok()?),
        TypeId::WORD => AnyValue::Word(u16::try_from(value).ok()?),
        TypeId::DWORD => AnyValue::DWord(u32::try_from(value).ok()?),
        TypeId::LWORD => AnyValue::LWord(u64::try_from(value).ok()?),
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widening_keeps_target_variant() {
        let mut target = AnyValue::DInt(0);
        target.set_value(&AnyValue::Int(-12));
        assert_eq!(target, AnyValue::DInt(-12));

        let mut real = AnyValue::LReal(0.0);
        real.set_value(&AnyValue::Real(1.5));
        assert_eq!(real, AnyValue::LReal(1.5));
    }

    #[test]
    fn incompatible_values_reset_to_zero() {
        let mut target = AnyValue::Int(5);
        target.set_value(&AnyValue::DInt(70_000));
        assert_eq!(target, AnyValue::Int(0));

        let mut text = AnyValue::from("abc");
        text.set_value(&AnyValue::Bool(true));
        assert_eq!(text, AnyValue::from(""));
    }

    #[test]
    fn assign_switches_variant() {
        let mut value = AnyValue::SInt(1);
        value.assign(&AnyValue::LReal(2.5));
        assert_eq!(value, AnyValue::LReal(2.5));
        assert!(!AnyValue::Int(1).equals(&AnyValue::DInt(1)));
    }

    #[test]
    fn time_widening() {
        assert_eq!(
            convert(&AnyValue::Time(Duration::from_secs(1)), TypeId::LTIME),
            Some(AnyValue::LTime(Duration::from_secs(1)))
        );
        assert_eq!(convert(&AnyValue::LTime(Duration::ZERO), TypeId::TIME), None);
    }
}
