use fbrt_types::TypeId;
use indexmap::IndexMap;
use smol_str::SmolStr;

use super::{
    DateTimeValue, DateValue, Duration, LDateTimeValue, LDateValue, LTimeOfDayValue,
    TimeOfDayValue,
};

/// One-dimensional array value. Elements are owned and always share the
/// element type.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayValue {
    pub type_id: TypeId,
    pub type_name: SmolStr,
    pub element_type: TypeId,
    pub lower: i64,
    pub elements: Vec<AnyValue>,
}

impl ArrayValue {
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Upper bound (inclusive).
    #[must_use]
    pub fn upper(&self) -> i64 {
        self.lower + self.elements.len() as i64 - 1
    }

    /// Element at IEC index `index` (offset by the lower bound).
    #[must_use]
    pub fn get(&self, index: i64) -> Option<&AnyValue> {
        let offset = usize::try_from(index.checked_sub(self.lower)?).ok()?;
        self.elements.get(offset)
    }

    pub fn get_mut(&mut self, index: i64) -> Option<&mut AnyValue> {
        let offset = usize::try_from(index.checked_sub(self.lower)?).ok()?;
        self.elements.get_mut(offset)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AnyValue> {
        self.elements.iter()
    }
}

/// Struct value with named members in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct StructValue {
    pub type_id: TypeId,
    pub type_name: SmolStr,
    pub fields: IndexMap<SmolStr, AnyValue>,
}

impl StructValue {
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Member names in declaration order.
    pub fn member_names(&self) -> impl Iterator<Item = &SmolStr> {
        self.fields.keys()
    }

    #[must_use]
    pub fn member(&self, name: &str) -> Option<&AnyValue> {
        self.fields.get(name)
    }

    pub fn member_mut(&mut self, name: &str) -> Option<&mut AnyValue> {
        self.fields.get_mut(name)
    }

    pub fn member_at_mut(&mut self, index: usize) -> Option<(&SmolStr, &mut AnyValue)> {
        self.fields.get_index_mut(index)
    }
}

/// Runtime value of a data port. Exactly one variant is active; the derived
/// variants own their storage behind a box.
#[derive(Debug, Clone, PartialEq)]
pub enum AnyValue {
    Bool(bool),

    SInt(i8),
    Int(i16),
    DInt(i32),
    LInt(i64),

    USInt(u8),
    UInt(u16),
    UDInt(u32),
    ULInt(u64),

    Real(f32),
    LReal(f64),

    Byte(u8),
    Word(u16),
    DWord(u32),
    LWord(u64),

    Time(Duration),
    LTime(Duration),
    Date(DateValue),
    LDate(LDateValue),
    Tod(TimeOfDayValue),
    LTod(LTimeOfDayValue),
    Dt(DateTimeValue),
    Ldt(LDateTimeValue),

    String(SmolStr),
    WString(String),
    Char(u8),
    WChar(u16),

    Array(Box<ArrayValue>),
    Struct(Box<StructValue>),
}

impl AnyValue {
    /// Type id of the active variant.
    #[must_use]
    pub fn type_id(&self) -> TypeId {
        match self {
            Self::Bool(_) => TypeId::BOOL,
            Self::SInt(_) => TypeId::SINT,
            Self::Int(_) => TypeId::INT,
            Self::DInt(_) => TypeId::DINT,
            Self::LInt(_) => TypeId::LINT,
            Self::USInt(_) => TypeId::USINT,
            Self::UInt(_) => TypeId::UINT,
            Self::UDInt(_) => TypeId::UDINT,
            Self::ULInt(_) => TypeId::ULINT,
            Self::Real(_) => TypeId::REAL,
            Self::LReal(_) => TypeId::LREAL,
            Self::Byte(_) => TypeId::BYTE,
            Self::Word(_) => TypeId::WORD,
            Self::DWord(_) => TypeId::DWORD,
            Self::LWord(_) => TypeId::LWORD,
            Self::Time(_) => TypeId::TIME,
            Self::LTime(_) => TypeId::LTIME,
            Self::Date(_) => TypeId::DATE,
            Self::LDate(_) => TypeId::LDATE,
            Self::Tod(_) => TypeId::TOD,
            Self::LTod(_) => TypeId::LTOD,
            Self::Dt(_) => TypeId::DT,
            Self::Ldt(_) => TypeId::LDT,
            Self::String(_) => TypeId::STRING,
            Self::WString(_) => TypeId::WSTRING,
            Self::Char(_) => TypeId::CHAR,
            Self::WChar(_) => TypeId::WCHAR,
            Self::Array(array) => array.type_id,
            Self::Struct(value) => value.type_id,
        }
    }

    /// Type name of the active variant; derived values report their own
    /// declared type name.
    #[must_use]
    pub fn type_name(&self) -> SmolStr {
        match self {
            Self::Struct(value) => value.type_name.clone(),
            Self::Array(array) => array.type_name.clone(),
            other => SmolStr::new(other.type_id().builtin_name().unwrap_or("?")),
        }
    }

    #[must_use]
    pub fn is_derived(&self) -> bool {
        matches!(self, Self::Array(_) | Self::Struct(_))
    }

    #[must_use]
    pub fn as_struct(&self) -> Option<&StructValue> {
        match self {
            Self::Struct(value) => Some(&**value),
            _ => None,
        }
    }

    pub fn as_struct_mut(&mut self) -> Option<&mut StructValue> {
        match self {
            Self::Struct(value) => Some(&mut **value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_array(&self) -> Option<&ArrayValue> {
        match self {
            Self::Array(array) => Some(&**array),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Integer view of any integer or bit-string variant.
    #[must_use]
    pub fn as_i128(&self) -> Option<i128> {
        Some(match self {
            Self::SInt(v) => i128::from(*v),
            Self::Int(v) => i128::from(*v),
            Self::DInt(v) => i128::from(*v),
            Self::LInt(v) => i128::from(*v),
            Self::USInt(v) | Self::Byte(v) => i128::from(*v),
            Self::UInt(v) | Self::Word(v) => i128::from(*v),
            Self::UDInt(v) | Self::DWord(v) => i128::from(*v),
            Self::ULInt(v) | Self::LWord(v) => i128::from(*v),
            Self::Bool(v) => i128::from(*v),
            _ => return None,
        })
    }

    /// Floating view of any numeric variant.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Real(v) => Some(f64::from(*v)),
            Self::LReal(v) => Some(*v),
            other if other.is_integer() => other.as_i128().map(|v| v as f64),
            _ => None,
        }
    }

    /// Nanosecond view of any duration or date/time variant.
    #[must_use]
    pub fn as_nanos(&self) -> Option<i64> {
        Some(match self {
            Self::Time(d) | Self::LTime(d) => d.as_nanos(),
            Self::Date(v) => v.nanos(),
            Self::LDate(v) => v.nanos(),
            Self::Tod(v) => v.nanos(),
            Self::LTod(v) => v.nanos(),
            Self::Dt(v) => v.nanos(),
            Self::Ldt(v) => v.nanos(),
            _ => return None,
        })
    }

    #[must_use]
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            Self::SInt(_)
                | Self::Int(_)
                | Self::DInt(_)
                | Self::LInt(_)
                | Self::USInt(_)
                | Self::UInt(_)
                | Self::UDInt(_)
                | Self::ULInt(_)
        )
    }

    #[must_use]
    pub fn is_numeric(&self) -> bool {
        self.is_integer() || matches!(self, Self::Real(_) | Self::LReal(_))
    }
}

impl From<bool> for AnyValue {
    fn from(value: bool) -> Self {
        AnyValue::Bool(value)
    }
}

impl From<i8> for AnyValue {
    fn from(value: i8) -> Self {
        AnyValue::SInt(value)
    }
}

impl From<i16> for AnyValue {
    fn from(value: i16) -> Self {
        AnyValue::Int(value)
    }
}

impl From<i32> for AnyValue {
    fn from(value: i32) -> Self {
        AnyValue::DInt(value)
    }
}

impl From<i64> for AnyValue {
    fn from(value: i64) -> Self {
        AnyValue::LInt(value)
    }
}

impl From<u8> for AnyValue {
    fn from(value: u8) -> Self {
        AnyValue::USInt(value)
    }
}

impl From<u16> for AnyValue {
    fn from(value: u16) -> Self {
        AnyValue::UInt(value)
    }
}

impl From<u32> for AnyValue {
    fn from(value: u32) -> Self {
        AnyValue::UDInt(value)
    }
}

impl From<u64> for AnyValue {
    fn from(value: u64) -> Self {
        AnyValue::ULInt(value)
    }
}

impl From<f32> for AnyValue {
    fn from(value: f32) -> Self {
        AnyValue::Real(value)
    }
}

impl From<f64> for AnyValue {
    fn from(value: f64) -> Self {
        AnyValue::LReal(value)
    }
}

impl From<&str> for AnyValue {
    fn from(value: &str) -> Self {
        AnyValue::String(SmolStr::new(value))
    }
}

impl From<StructValue> for AnyValue {
    fn from(value: StructValue) -> Self {
        AnyValue::Struct(Box::new(value))
    }
}

impl From<ArrayValue> for AnyValue {
    fn from(value: ArrayValue) -> Self {
        AnyValue::Array(Box::new(value))
    }
}
