//! Execution core for IEC 61499 function-block networks.
//!
//! A [`Resource`] holds function block instances created from a
//! [`TypeLibrary`], wires their ports with event and data connections and
//! delivers events through an [`EventChain`]. Values follow IEC 61131-3
//! typing, including implicit widening and generic port families.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]

/// Runtime configuration loading.
pub mod config;
/// Data and event connections.
pub mod connection;
mod datetime;
/// Runtime errors.
pub mod error;
/// Event delivery.
pub mod exec;
/// Function block instances.
pub mod fb;
/// Interface tables and port addressing.
pub mod interface;
/// Tracing setup.
pub mod logging;
/// Resource container.
pub mod resource;
/// Standard function block library.
pub mod stdlib;
/// FB type library.
pub mod typelib;
/// Runtime values.
pub mod value;

pub use config::RuntimeConfig;
pub use error::RuntimeError;
pub use exec::{EventChain, EventEntry, ExecutionContext};
pub use fb::{FbBody, FbCell, FbContext, FbState, FunctionBlock, MgmCommand, MgmResponse};
pub use interface::{EventId, InterfaceSpec, PortId, SpecHandle};
pub use resource::Resource;
pub use typelib::{GenericFbType, TypeLibrary};
pub use value::AnyValue;
