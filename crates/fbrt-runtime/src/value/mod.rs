//! Runtime value types, literals and IEC coercion.

#![allow(missing_docs)]

mod coerce;
mod datetime;
mod defaults;
mod format;
mod literal;
mod types;

pub use coerce::{convert, is_implicit_conversion};
pub use datetime::*;
pub use defaults::*;
pub use literal::ValueParseError;
pub use types::*;
