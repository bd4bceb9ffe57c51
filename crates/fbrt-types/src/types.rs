//! Type system for IEC 61499 data ports.
//!
//! Elementary types and the generic families have fixed ids; structs and
//! arrays are registered by the application or the runtime configuration
//! and numbered from [`TypeId::USER_TYPES_START`].

mod compat;
mod defs;
mod registry;

pub use defs::{StructField, Type, TypeId};
pub use registry::TypeRegistry;
