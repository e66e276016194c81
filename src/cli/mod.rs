//! CLI layer: documentation, help rendering, output and the runner

pub mod docs;
pub mod error;
pub mod help;
pub mod output;
pub mod runner;

pub use docs::{Docs, SignatureDocsExt};
pub use error::{CliError, CliResult};
pub use help::{render_help, render_table_help, render_table_usage, render_usage};
pub use runner::{compile_options, compile_with, Runner, Target};
