//! Runtime errors for configuration, wiring and instance management.

#![allow(missing_docs)]

use smol_str::SmolStr;
use thiserror::Error;

use crate::value::{DefaultValueError, ValueParseError};

/// Errors reported at construction, configuration and wiring time.
///
/// Event delivery never returns these; hot-path anomalies are logged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// Configuration file or section could not be used.
    #[error("invalid configuration: {0}")]
    InvalidConfig(SmolStr),

    /// Data type name not present in the type registry.
    #[error("unknown data type '{0}'")]
    UnknownType(SmolStr),

    /// Generic configuration resolved to a type that is not a struct.
    #[error("type '{0}' is not a struct")]
    NotAStruct(SmolStr),

    /// Generic configuration string could not be decoded.
    #[error("invalid generic configuration '{0}'")]
    InvalidGenericConfig(SmolStr),

    /// Function block type not present in the type library.
    #[error("unknown function block type '{0}'")]
    UnknownFbType(SmolStr),

    /// No such connection between the two ports.
    #[error("no connection {0}")]
    NotConnected(SmolStr),

    /// Data input already holds a different connection.
    #[error("data input '{0}' is already connected")]
    AlreadyConnected(SmolStr),

    /// Source and destination port types are incompatible.
    #[error("cannot connect {source_type} to {target_type}")]
    TypeMismatch {
        source_type: SmolStr,
        target_type: SmolStr,
    },

    /// Port name not present in the interface.
    #[error("unknown port '{0}'")]
    UnknownPort(SmolStr),

    /// No function block instance with this name.
    #[error("unknown instance '{0}'")]
    UnknownInstance(SmolStr),

    /// Instance name already taken in the resource.
    #[error("instance '{0}' already exists")]
    DuplicateInstance(SmolStr),

    /// Instance name is not a valid identifier.
    #[error("invalid instance name '{0}'")]
    InvalidInstanceName(SmolStr),

    /// Instance is running or not marked deletable.
    #[error("instance '{0}' cannot be deleted in its current state")]
    NotDeletable(SmolStr),

    /// Literal could not be parsed into the port's value.
    #[error("invalid literal: {0}")]
    InvalidLiteral(SmolStr),
}

impl From<ValueParseError> for RuntimeError {
    fn from(value: ValueParseError) -> Self {
        Self::InvalidLiteral(SmolStr::new(value.to_string()))
    }
}

impl From<DefaultValueError> for RuntimeError {
    fn from(value: DefaultValueError) -> Self {
        Self::InvalidConfig(SmolStr::new(format!("{value:?}")))
    }
}
