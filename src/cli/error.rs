//! CLI-level errors (wraps compile, usage, handler and settings errors)

use thiserror::Error;

use crate::application::UsageError;
use crate::config::SettingsError;
use crate::domain::{CompileError, HandlerError};

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Usage(#[from] UsageError),

    /// Returned by the target handler, passed through unchanged
    #[error("{0}")]
    Application(HandlerError),

    #[error(transparent)]
    Config(#[from] SettingsError),

    #[error("write output: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Compile(_) => crate::exitcode::SOFTWARE,
            CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Application(_) => crate::exitcode::FAILURE,
            CliError::Config(_) => crate::exitcode::CONFIG,
            CliError::Io(_) => crate::exitcode::IOERR,
        }
    }
}
