//! Type definitions for data ports and values.
//!
//! The set mirrors the closed value model of the runtime: 27 elementary
//! types, one-dimensional arrays, structs, and the generic `ANY_*` families
//! that may only appear as declared port types.

use smol_str::SmolStr;

/// Identifier of a data type. Built-in ids are fixed; user types are
/// numbered from [`TypeId::USER_TYPES_START`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub u32);

/// Declares the built-in types once: the id constant, its canonical name and
/// aliases, and its definition.
macro_rules! builtin_types {
    ($(
        $(#[$meta:meta])*
        $konst:ident = $id:literal, $name:literal $(| $alias:literal)* => $def:expr;
    )*) => {
        impl TypeId {
            $(
                $(#[$meta])*
                pub const $konst: Self = Self($id);
            )*

            /// Resolves a built-in type name, ignoring case.
            #[must_use]
            pub fn from_builtin_name(name: &str) -> Option<Self> {
                match name.to_ascii_uppercase().as_str() {
                    $( $name $(| $alias)* => Some(Self::$konst), )*
                    _ => None,
                }
            }

            /// Canonical name of a built-in type.
            #[must_use]
            pub fn builtin_name(self) -> Option<&'static str> {
                match self {
                    $( Self::$konst => Some($name), )*
                    _ => None,
                }
            }
        }

        pub(super) const BUILTIN_IDS: &[TypeId] = &[$(TypeId::$konst),*];

        pub(super) fn builtin_definition(id: TypeId) -> Option<Type> {
            Some(match id {
                $( TypeId::$konst => $def, )*
                _ => return None,
            })
        }
    };
}

builtin_types! {
    /// `BOOL`.
    BOOL = 1, "BOOL" => Type::Bool;
    /// 8-bit signed integer.
    SINT = 2, "SINT" => Type::SInt;
    /// 16-bit signed integer.
    INT = 3, "INT" => Type::Int;
    /// 32-bit signed integer.
    DINT = 4, "DINT" => Type::DInt;
    /// 64-bit signed integer.
    LINT = 5, "LINT" => Type::LInt;
    /// 8-bit unsigned integer.
    USINT = 6, "USINT" => Type::USInt;
    /// 16-bit unsigned integer.
    UINT = 7, "UINT" => Type::UInt;
    /// 32-bit unsigned integer.
    UDINT = 8, "UDINT" => Type::UDInt;
    /// 64-bit unsigned integer.
    ULINT = 9, "ULINT" => Type::ULInt;
    /// 32-bit float.
    REAL = 10, "REAL" => Type::Real;
    /// 64-bit float.
    LREAL = 11, "LREAL" => Type::LReal;
    /// 8-bit bit string.
    BYTE = 12, "BYTE" => Type::Byte;
    /// 16-bit bit string.
    WORD = 13, "WORD" => Type::Word;
    /// 32-bit bit string.
    DWORD = 14, "DWORD" => Type::DWord;
    /// 64-bit bit string.
    LWORD = 15, "LWORD" => Type::LWord;
    /// Duration, millisecond resolution on the wire.
    TIME = 16, "TIME" => Type::Time;
    /// Duration, nanosecond resolution.
    LTIME = 17, "LTIME" => Type::LTime;
    /// Calendar date.
    DATE = 18, "DATE" => Type::Date;
    /// Calendar date, long form.
    LDATE = 19, "LDATE" => Type::LDate;
    /// Time of day.
    TOD = 20, "TIME_OF_DAY" | "TOD" => Type::Tod;
    /// Time of day, long form.
    LTOD = 21, "LTIME_OF_DAY" | "LTOD" => Type::LTod;
    /// Date and time.
    DT = 22, "DATE_AND_TIME" | "DT" => Type::Dt;
    /// Date and time, long form.
    LDT = 23, "LDATE_AND_TIME" | "LDT" => Type::Ldt;
    /// Single-byte string.
    STRING = 24, "STRING" => Type::String { max_len: None };
    /// Wide string.
    WSTRING = 25, "WSTRING" => Type::WString { max_len: None };
    /// Single-byte character.
    CHAR = 26, "CHAR" => Type::Char;
    /// Wide character.
    WCHAR = 27, "WCHAR" => Type::WChar;

    /// Any type at all.
    ANY = 30, "ANY" => Type::Any;
    /// Arrays and structs.
    ANY_DERIVED = 31, "ANY_DERIVED" => Type::AnyDerived;
    /// Every elementary type.
    ANY_ELEMENTARY = 32, "ANY_ELEMENTARY" => Type::AnyElementary;
    /// Numbers and durations.
    ANY_MAGNITUDE = 33, "ANY_MAGNITUDE" => Type::AnyMagnitude;
    /// Integers and reals.
    ANY_NUM = 34, "ANY_NUM" => Type::AnyNum;
    /// Signed and unsigned integers.
    ANY_INT = 35, "ANY_INT" => Type::AnyInt;
    /// `SINT` to `LINT`.
    ANY_SIGNED = 36, "ANY_SIGNED" => Type::AnySigned;
    /// `USINT` to `ULINT`.
    ANY_UNSIGNED = 37, "ANY_UNSIGNED" => Type::AnyUnsigned;
    /// `REAL` and `LREAL`.
    ANY_REAL = 38, "ANY_REAL" => Type::AnyReal;
    /// `TIME` and `LTIME`.
    ANY_DURATION = 39, "ANY_DURATION" => Type::AnyDuration;
    /// `BOOL` and the bit strings.
    ANY_BIT = 40, "ANY_BIT" => Type::AnyBit;
    /// Characters and strings.
    ANY_CHARS = 41, "ANY_CHARS" => Type::AnyChars;
    /// `STRING` and `WSTRING`.
    ANY_STRING = 42, "ANY_STRING" => Type::AnyString;
    /// `CHAR` and `WCHAR`.
    ANY_CHAR = 43, "ANY_CHAR" => Type::AnyChar;
    /// Dates, times of day and date-and-times.
    ANY_DATE = 44, "ANY_DATE" => Type::AnyDate;
}

impl TypeId {
    /// Placeholder for values of no known type.
    pub const UNKNOWN: Self = Self(0);

    /// First id handed out to user types.
    pub const USER_TYPES_START: u32 = 100;

    /// The elementary types, in value-model order.
    pub const ELEMENTARY: [Self; 27] = [
        Self::BOOL,
        Self::SINT,
        Self::INT,
        Self::DINT,
        Self::LINT,
        Self::USINT,
        Self::UINT,
        Self::UDINT,
        Self::ULINT,
        Self::REAL,
        Self::LREAL,
        Self::BYTE,
        Self::WORD,
        Self::DWORD,
        Self::LWORD,
        Self::TIME,
        Self::LTIME,
        Self::DATE,
        Self::LDATE,
        Self::TOD,
        Self::LTOD,
        Self::DT,
        Self::LDT,
        Self::STRING,
        Self::WSTRING,
        Self::CHAR,
        Self::WCHAR,
    ];

    /// Returns true for the generic `ANY_*` family ids.
    #[must_use]
    pub fn is_generic(self) -> bool {
        (Self::ANY.0..=Self::ANY_DATE.0).contains(&self.0)
    }
}

/// Member of a struct type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructField {
    /// Member name.
    pub name: SmolStr,
    /// Member type.
    pub type_id: TypeId,
}

impl StructField {
    /// Creates a member definition.
    pub fn new(name: impl Into<SmolStr>, type_id: TypeId) -> Self {
        Self {
            name: name.into(),
            type_id,
        }
    }
}

/// A data type known to the runtime. Variants are named after the IEC types
/// they stand for.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    Unknown,

    Bool,
    SInt,
    Int,
    DInt,
    LInt,
    USInt,
    UInt,
    UDInt,
    ULInt,
    Real,
    LReal,
    Byte,
    Word,
    DWord,
    LWord,
    Time,
    LTime,
    Date,
    LDate,
    Tod,
    LTod,
    Dt,
    Ldt,
    String { max_len: Option<u32> },
    WString { max_len: Option<u32> },
    Char,
    WChar,

    /// One-dimensional array with inclusive bounds.
    Array {
        name: SmolStr,
        element: TypeId,
        lower: i64,
        upper: i64,
    },
    /// Struct with members in declaration order.
    Struct {
        name: SmolStr,
        fields: Vec<StructField>,
    },

    // generic families, valid as declared port types only
    Any,
    AnyDerived,
    AnyElementary,
    AnyMagnitude,
    AnyNum,
    AnyInt,
    AnySigned,
    AnyUnsigned,
    AnyReal,
    AnyDuration,
    AnyBit,
    AnyChars,
    AnyString,
    AnyChar,
    AnyDate,
}

#[allow(missing_docs)]
impl Type {
    #[must_use]
    pub fn is_signed(&self) -> bool {
        matches!(self, Self::SInt | Self::Int | Self::DInt | Self::LInt)
    }

    #[must_use]
    pub fn is_unsigned(&self) -> bool {
        matches!(self, Self::USInt | Self::UInt | Self::UDInt | Self::ULInt)
    }

    #[must_use]
    pub fn is_integer(&self) -> bool {
        self.is_signed() || self.is_unsigned()
    }

    #[must_use]
    pub fn is_real(&self) -> bool {
        matches!(self, Self::Real | Self::LReal)
    }

    #[must_use]
    pub fn is_numeric(&self) -> bool {
        self.is_integer() || self.is_real()
    }

    /// `BOOL` counts as a one-bit string.
    #[must_use]
    pub fn is_bit_string(&self) -> bool {
        matches!(
            self,
            Self::Bool | Self::Byte | Self::Word | Self::DWord | Self::LWord
        )
    }

    #[must_use]
    pub fn is_string(&self) -> bool {
        matches!(self, Self::String { .. } | Self::WString { .. })
    }

    #[must_use]
    pub fn is_char(&self) -> bool {
        matches!(self, Self::Char | Self::WChar)
    }

    #[must_use]
    pub fn is_duration(&self) -> bool {
        matches!(self, Self::Time | Self::LTime)
    }

    #[must_use]
    pub fn is_date(&self) -> bool {
        matches!(
            self,
            Self::Date | Self::LDate | Self::Tod | Self::LTod | Self::Dt | Self::Ldt
        )
    }

    #[must_use]
    pub fn is_elementary(&self) -> bool {
        self.is_numeric()
            || self.is_bit_string()
            || self.is_string()
            || self.is_char()
            || self.is_duration()
            || self.is_date()
    }

    #[must_use]
    pub fn is_derived(&self) -> bool {
        matches!(self, Self::Array { .. } | Self::Struct { .. })
    }

    /// Returns true for the `ANY_*` families.
    #[must_use]
    pub fn is_generic(&self) -> bool {
        self.family_contains(&Self::Unknown).is_some()
    }

    /// Membership of `member` in this generic family, or `None` if this is
    /// not a family.
    #[must_use]
    pub fn family_contains(&self, member: &Type) -> Option<bool> {
        Some(match self {
            Self::Any => true,
            Self::AnyDerived => member.is_derived(),
            Self::AnyElementary => member.is_elementary(),
            Self::AnyMagnitude => member.is_numeric() || member.is_duration(),
            Self::AnyNum => member.is_numeric(),
            Self::AnyInt => member.is_integer(),
            Self::AnySigned => member.is_signed(),
            Self::AnyUnsigned => member.is_unsigned(),
            Self::AnyReal => member.is_real(),
            Self::AnyDuration => member.is_duration(),
            Self::AnyBit => member.is_bit_string(),
            Self::AnyChars => member.is_string() || member.is_char(),
            Self::AnyString => member.is_string(),
            Self::AnyChar => member.is_char(),
            Self::AnyDate => member.is_date(),
            _ => return None,
        })
    }
}
