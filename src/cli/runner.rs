//! Runner: argv -> parse/dispatch -> invocation -> printing -> exit code

use std::io::Write;

use tracing::{debug, instrument};

use crate::application::{
    parse, CommandTable, CompileOptions, Compiler, DispatchError, Dispatched, ParseOutcome,
    Resolved, UsageError,
};
use crate::cli::error::{CliError, CliResult};
use crate::cli::help::{render_help, render_table_help, render_table_usage, render_usage};
use crate::cli::output;
use crate::config::Settings;
use crate::domain::{BoundCall, ConverterRegistry, Schema, SchemaSource, Value};
use crate::exitcode;

/// What a runner drives: one schema or a table of sub-commands.
#[derive(Debug, Clone)]
pub enum Target {
    Single(Schema),
    Table(CommandTable),
}

impl From<Schema> for Target {
    fn from(schema: Schema) -> Self {
        Target::Single(schema)
    }
}

impl From<CommandTable> for Target {
    fn from(table: CommandTable) -> Self {
        Target::Table(table)
    }
}

/// Compiler options derived from settings.
pub fn compile_options(settings: &Settings) -> CompileOptions {
    CompileOptions {
        help_names: settings.help_names.clone(),
    }
}

/// Compile `source` with the built-in converters and `settings`.
pub fn compile_with(source: &dyn SchemaSource, settings: &Settings) -> CliResult<Schema> {
    let registry = ConverterRegistry::with_builtins();
    let schema = Compiler::with_options(&registry, compile_options(settings)).compile(source)?;
    Ok(schema)
}

pub struct Runner {
    prog: String,
    target: Target,
    settings: Settings,
}

impl Runner {
    /// Program name defaults to the schema or table name.
    pub fn new(target: impl Into<Target>) -> Self {
        let target = target.into();
        let prog = match &target {
            Target::Single(schema) => schema.name().to_string(),
            Target::Table(table) => table.name().to_string(),
        };
        Self {
            prog,
            target,
            settings: Settings::default(),
        }
    }

    pub fn prog(mut self, prog: impl Into<String>) -> Self {
        self.prog = prog.into();
        self
    }

    /// Table help names follow `settings.help_names`.
    pub fn settings(mut self, settings: Settings) -> Self {
        if let Target::Table(table) = self.target {
            self.target = Target::Table(table.help_names(settings.help_names.clone()));
        }
        self.settings = settings;
        self
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    /// Run with `args` (program name excluded) and return the exit code.
    pub fn run<S: AsRef<str>>(&self, args: &[S], out: &mut dyn Write, err: &mut dyn Write) -> i32 {
        match self.execute(args, out) {
            Ok(code) => code,
            Err(e) => {
                let code = e.exit_code();
                if let Err(io) = self.report(&e, err) {
                    debug!(error = %io, "could not report error");
                }
                code
            }
        }
    }

    /// Dispatch, invoke and print; errors are left to the caller.
    #[instrument(level = "debug", skip_all, fields(prog = %self.prog))]
    pub fn execute<S: AsRef<str>>(&self, args: &[S], out: &mut dyn Write) -> CliResult<i32> {
        let dispatched = self.dispatch(args)?;
        debug!(path = ?dispatched.path(), "dispatched");

        match dispatched {
            Dispatched::Help { path } => {
                out.write_all(self.help_text(&path).as_bytes())?;
                Ok(exitcode::HELP)
            }
            Dispatched::Call { path, call } => {
                let schema = self.schema_at(&path)?;
                let value = schema.invoke(&call).map_err(CliError::Application)?;
                print_value(out, &value)?;
                Ok(exitcode::OK)
            }
            Dispatched::Alternate { path, name } => {
                let schema = self.schema_at(&path)?;
                let Some(alternate) = schema.alternate(&name) else {
                    return Err(CliError::Application(
                        format!("no alternate action {name:?}").into(),
                    ));
                };
                let value = (alternate.handler)(&BoundCall::new(path)).map_err(CliError::Application)?;
                print_value(out, &value)?;
                Ok(exitcode::OK)
            }
        }
    }

    fn dispatch<S: AsRef<str>>(&self, args: &[S]) -> CliResult<Dispatched> {
        let dispatched = match &self.target {
            Target::Single(schema) => match parse(schema, args) {
                Ok(ParseOutcome::Call(call)) => Dispatched::Call {
                    path: Vec::new(),
                    call,
                },
                Ok(ParseOutcome::Help) => Dispatched::Help { path: Vec::new() },
                Ok(ParseOutcome::Alternate(name)) => Dispatched::Alternate {
                    path: Vec::new(),
                    name,
                },
                Err(e) => return Err(UsageError::new(Vec::new(), e).into()),
            },
            Target::Table(table) => table.dispatch(args)?,
        };
        Ok(dispatched)
    }

    fn resolve(&self, path: &[String]) -> Option<Resolved<'_>> {
        match &self.target {
            Target::Single(schema) if path.is_empty() => Some(Resolved::Schema(schema)),
            Target::Single(_) => None,
            Target::Table(table) => table.resolve(path),
        }
    }

    fn schema_at(&self, path: &[String]) -> CliResult<&Schema> {
        match self.resolve(path) {
            Some(Resolved::Schema(schema)) => Ok(schema),
            _ => Err(UsageError::new(path.to_vec(), DispatchError::NoCommandGiven).into()),
        }
    }

    /// Program name followed by the command path.
    fn display_prog(&self, path: &[String]) -> String {
        std::iter::once(self.prog.as_str())
            .chain(path.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Help text for the schema or table at `path`.
    pub fn help_text(&self, path: &[String]) -> String {
        let prog = self.display_prog(path);
        match self.resolve(path) {
            Some(Resolved::Schema(schema)) => render_help(schema, &prog, &self.settings),
            Some(Resolved::Table(table)) => render_table_help(table, &prog, &self.settings),
            None => String::new(),
        }
    }

    fn usage_line(&self, path: &[String]) -> Option<String> {
        let prog = self.display_prog(path);
        match self.resolve(path)? {
            Resolved::Schema(schema) => Some(render_usage(schema, &prog)),
            Resolved::Table(table) => Some(render_table_usage(table, &prog)),
        }
    }

    fn help_hint(&self, path: &[String]) -> Option<String> {
        let aliases: Vec<String> = match self.resolve(path)? {
            Resolved::Schema(schema) => schema.help_aliases().into_iter().map(String::from).collect(),
            Resolved::Table(table) => table.help_aliases(),
        };
        let alias = aliases
            .iter()
            .find(|a| a.starts_with("--"))
            .or_else(|| aliases.first())?;
        Some(format!(
            "Try '{} {}' for more information.",
            self.display_prog(path),
            alias
        ))
    }

    fn report(&self, error: &CliError, err: &mut dyn Write) -> std::io::Result<()> {
        let color = self.settings.color;
        output::error(err, error, color)?;

        let CliError::Usage(usage) = error else {
            return Ok(());
        };
        if let Some(DispatchError::UnknownCommand { available, .. }) = usage.dispatch_error() {
            if !available.is_empty() {
                output::info(err, &format!("Available commands: {}", available.join(", ")))?;
            }
        }
        if let Some(line) = self.usage_line(&usage.path) {
            output::info(err, &line)?;
        }
        if let Some(hint) = self.help_hint(&usage.path) {
            output::hint(err, &hint, color)?;
        }
        Ok(())
    }
}

/// Lists print one item per line; `Value::None` prints nothing.
fn print_value(out: &mut dyn Write, value: &Value) -> std::io::Result<()> {
    match value {
        Value::None => Ok(()),
        Value::List(items) => items.iter().try_for_each(|item| output::info(out, item)),
        other => output::info(out, other),
    }
}
