//! Application layer: compile, parse and dispatch
//!
//! Turns schema sources into schemas and argument vectors into bound calls.
//! Nothing here prints or exits.

pub mod compiler;
pub mod dispatcher;
pub mod error;
pub mod parser;
pub mod transform;

pub use compiler::{compile, CompileOptions, Compiler, HELP_PARAM};
pub use dispatcher::{Command, CommandTable, Dispatched, Resolved};
pub use error::{ArgumentError, DispatchError, ParseError, UsageError, UsageResult};
pub use parser::{parse, ParseOutcome};
pub use transform::{compose, with_alternate, with_parameter, wrap, Transform};
