//! Domain-level errors: raised while turning a signature into a schema

use thiserror::Error;

/// A signature that cannot be turned into a valid grammar.
///
/// Always names the offending parameter; compile-time only.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("duplicate parameter name: {0}")]
    DuplicateName(String),

    #[error("alias {alias} of parameter {param} is already used by {other}")]
    DuplicateAlias {
        alias: String,
        param: String,
        other: String,
    },

    #[error("invalid alias {alias:?} for parameter {param}: {reason}")]
    InvalidAlias {
        alias: String,
        param: String,
        reason: String,
    },

    #[error("required positional {param} follows optional positional {after}")]
    RequiredAfterOptional { param: String, after: String },

    #[error("positional {param} follows catch-all positional {rest}")]
    PositionalAfterRest { param: String, rest: String },

    #[error("catch-all {param} conflicts with catch-all {other}: only one allowed")]
    DuplicateCatchAll { param: String, other: String },

    #[error("parameter {param}: {reason}")]
    InvalidDefault { param: String, reason: String },
}

/// An annotation with no registered converter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("no converter registered for type {tag:?} (parameter {param})")]
pub struct UnknownTypeError {
    pub tag: String,
    pub param: String,
}

/// A converter rejected a raw string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{reason}")]
pub struct ConversionError {
    pub reason: String,
}

impl ConversionError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Anything that stops a signature from compiling.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("{0}")]
    UnknownType(#[from] UnknownTypeError),
}

/// Result type for schema compilation.
pub type CompileResult<T> = Result<T, CompileError>;
