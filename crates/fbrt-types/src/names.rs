//! Well-known interned names.
//!
//! These are seeded into every [`StringDictionary`](crate::StringDictionary)
//! in declaration order, which lets static interface tables be written with
//! `const` ids.

use crate::strings::StringId;

macro_rules! well_known {
    ($($name:ident => $text:literal),* $(,)?) => {
        #[allow(non_camel_case_types, clippy::upper_case_acronyms, dead_code)]
        #[repr(u32)]
        enum Seed {
            $($name),*
        }

        $(
            #[doc = concat!("Interned id of `", $text, "`.")]
            pub const $name: StringId = StringId(Seed::$name as u32);
        )*

        /// Names seeded into every dictionary, in id order.
        pub const SEEDED: &[&str] = &[$($text),*];
    };
}

well_known! {
    // event ports
    REQ => "REQ",
    CNF => "CNF",
    INIT => "INIT",
    INITO => "INITO",
    EI => "EI",
    EO => "EO",
    EO0 => "EO0",
    EO1 => "EO1",
    EO2 => "EO2",
    EO3 => "EO3",
    S => "S",
    R => "R",
    CD => "CD",
    // data ports
    QI => "QI",
    QO => "QO",
    K => "K",
    Q => "Q",
    IN => "IN",
    IN1 => "IN1",
    IN2 => "IN2",
    OUT => "OUT",
    LD => "LD",
    PV => "PV",
    CV => "CV",
    // data types
    BOOL => "BOOL",
    SINT => "SINT",
    INT => "INT",
    DINT => "DINT",
    LINT => "LINT",
    USINT => "USINT",
    UINT => "UINT",
    UDINT => "UDINT",
    ULINT => "ULINT",
    REAL => "REAL",
    LREAL => "LREAL",
    BYTE => "BYTE",
    WORD => "WORD",
    DWORD => "DWORD",
    LWORD => "LWORD",
    TIME => "TIME",
    LTIME => "LTIME",
    DATE => "DATE",
    LDATE => "LDATE",
    TIME_OF_DAY => "TIME_OF_DAY",
    LTIME_OF_DAY => "LTIME_OF_DAY",
    DATE_AND_TIME => "DATE_AND_TIME",
    LDATE_AND_TIME => "LDATE_AND_TIME",
    STRING => "STRING",
    WSTRING => "WSTRING",
    CHAR => "CHAR",
    WCHAR => "WCHAR",
    ANY => "ANY",
    ANY_NUM => "ANY_NUM",
    ANY_REAL => "ANY_REAL",
    ANY_INT => "ANY_INT",
    ANY_ELEMENTARY => "ANY_ELEMENTARY",
    // function block types
    E_RS => "E_RS",
    E_DEMUX => "E_DEMUX",
    F_ADD => "F_ADD",
    F_ADD_DT_TIME => "F_ADD_DT_TIME",
    F_ACOS => "F_ACOS",
    FB_CTD_UDINT => "FB_CTD_UDINT",
    GEN_STRUCT_MUX => "GEN_STRUCT_MUX",
    GEN_STRUCT_DEMUX => "GEN_STRUCT_DEMUX",
}
