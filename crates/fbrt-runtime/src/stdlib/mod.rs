//! Standard library registry.

pub mod fbs;
