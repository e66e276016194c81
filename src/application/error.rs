//! Application-level errors: raised while parsing and dispatching argv
//!
//! Unlike compile errors these are expected at runtime and carry enough
//! context (token, option, parameter) to tell the user what to fix.

use thiserror::Error;

use crate::domain::ConversionError;

/// A token sequence that does not fit a schema.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unrecognized option {token}")]
    UnrecognizedOption { token: String },

    #[error("{option} needs an argument")]
    MissingValue { option: String, param: String },

    #[error("{option} needs an argument of type {type_name}: {source}")]
    ConversionFailed {
        token: String,
        option: String,
        param: String,
        type_name: String,
        #[source]
        source: ConversionError,
    },

    #[error("too many arguments: unexpected {token:?}")]
    TooManyArguments { token: String },

    #[error("missing required argument {param}")]
    MissingRequiredArgument { param: String },

    #[error("{option} does not take a value")]
    UnexpectedValue { option: String, param: String },
}

impl ParseError {
    /// The offending token, when one exists.
    pub fn token(&self) -> Option<&str> {
        match self {
            ParseError::UnrecognizedOption { token }
            | ParseError::ConversionFailed { token, .. }
            | ParseError::TooManyArguments { token } => Some(token),
            ParseError::MissingValue { option, .. } | ParseError::UnexpectedValue { option, .. } => {
                Some(option)
            }
            ParseError::MissingRequiredArgument { .. } => None,
        }
    }

    /// The parameter involved, when the error concerns a known parameter.
    pub fn param(&self) -> Option<&str> {
        match self {
            ParseError::MissingValue { param, .. }
            | ParseError::ConversionFailed { param, .. }
            | ParseError::MissingRequiredArgument { param }
            | ParseError::UnexpectedValue { param, .. } => Some(param),
            ParseError::UnrecognizedOption { .. } | ParseError::TooManyArguments { .. } => None,
        }
    }
}

/// A sub-command name that cannot be resolved.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("unknown command {name:?}")]
    UnknownCommand { name: String, available: Vec<String> },

    #[error("no command specified")]
    NoCommandGiven,
}

/// Either flavour of bad command line.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArgumentError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

/// A bad command line together with the sub-command path it occurred under.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{error}")]
pub struct UsageError {
    /// Sub-command names consumed before the failure
    pub path: Vec<String>,
    pub error: ArgumentError,
}

impl UsageError {
    pub fn new(path: Vec<String>, error: impl Into<ArgumentError>) -> Self {
        Self {
            path,
            error: error.into(),
        }
    }

    pub fn parse_error(&self) -> Option<&ParseError> {
        match &self.error {
            ArgumentError::Parse(e) => Some(e),
            ArgumentError::Dispatch(_) => None,
        }
    }

    pub fn dispatch_error(&self) -> Option<&DispatchError> {
        match &self.error {
            ArgumentError::Dispatch(e) => Some(e),
            ArgumentError::Parse(_) => None,
        }
    }
}

/// Result type for parsing and dispatching.
pub type UsageResult<T> = Result<T, UsageError>;
