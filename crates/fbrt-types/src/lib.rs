//! `fbrt-types` - data types and name interning for the `fbrt` function-block runtime.
//!
//! This crate holds everything the runtime needs to talk *about* data without
//! holding any:
//!
//! - **Types**: elementary IEC 61131-3 types, the generic `ANY_*` families,
//!   user structs and arrays, and a registry resolving them by name.
//! - **Names**: a bidirectional string dictionary so ports, types and
//!   instances are addressed by small integer ids.
//! - **Identifiers**: validation of instance and port names.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod ident;
pub mod names;
pub mod strings;
pub mod types;

pub use ident::{is_valid_identifier, is_valid_type_name};
pub use strings::{StringDictionary, StringId};
pub use types::{StructField, Type, TypeId, TypeRegistry};
