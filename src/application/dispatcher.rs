//! Sub-command dispatch over a table of named schemas

use tracing::{debug, instrument};

use crate::application::error::{DispatchError, UsageError, UsageResult};
use crate::application::parser::{parse, ParseOutcome};
use crate::domain::{name_to_alias, BoundCall, Schema};

/// Entry of a command table: a leaf schema or a nested table.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Leaf(Schema),
    Group(CommandTable),
}

impl Command {
    pub fn summary(&self) -> &str {
        match self {
            Command::Leaf(schema) => schema.summary(),
            Command::Group(table) => table.summary(),
        }
    }
}

/// Mapping from command name to schema or nested table.
///
/// Lookup is exact; insertion order is kept for help display.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandTable {
    name: String,
    description: Vec<String>,
    footnotes: Vec<String>,
    commands: Vec<(String, Command)>,
    default: Option<String>,
    help_names: Vec<String>,
}

/// Where dispatch ended up.
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatched {
    /// Parsed call for the leaf schema at `path`
    Call { path: Vec<String>, call: BoundCall },
    /// Help requested for the schema or table at `path`
    Help { path: Vec<String> },
    /// Alternate action `name` of the leaf schema at `path`
    Alternate { path: Vec<String>, name: String },
}

impl Dispatched {
    pub fn path(&self) -> &[String] {
        match self {
            Dispatched::Call { path, .. }
            | Dispatched::Help { path }
            | Dispatched::Alternate { path, .. } => path,
        }
    }
}

/// Resolved target of a command path.
#[derive(Debug, Clone, Copy)]
pub enum Resolved<'a> {
    Schema(&'a Schema),
    Table(&'a CommandTable),
}

impl CommandTable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: Vec::new(),
            footnotes: Vec::new(),
            commands: Vec::new(),
            default: None,
            help_names: vec!["help".into(), "h".into()],
        }
    }

    /// Add a leaf command named after its schema.
    pub fn command(self, schema: Schema) -> Self {
        let name = schema.name().to_string();
        self.entry(name, Command::Leaf(schema))
    }

    /// Add a nested table under its own name.
    pub fn group(self, table: CommandTable) -> Self {
        let name = table.name.clone();
        self.entry(name, Command::Group(table))
    }

    /// Add or replace an entry under an explicit name.
    pub fn entry(mut self, name: impl Into<String>, command: Command) -> Self {
        let name = name.into();
        match self.commands.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = command,
            None => self.commands.push((name, command)),
        }
        self
    }

    /// Command used when no name is given on the command line.
    pub fn default_command(mut self, name: impl Into<String>) -> Self {
        self.default = Some(name.into());
        self
    }

    pub fn summary_text(mut self, text: impl Into<String>) -> Self {
        self.description.insert(0, text.into());
        self
    }

    pub fn footnote(mut self, text: impl Into<String>) -> Self {
        self.footnotes.push(text.into());
        self
    }

    /// Names recognized as a help request before any command name.
    /// Applies to nested tables as well.
    pub fn help_names(mut self, names: Vec<String>) -> Self {
        self.commands = std::mem::take(&mut self.commands)
            .into_iter()
            .map(|(name, command)| match command {
                Command::Group(table) => (name, Command::Group(table.help_names(names.clone()))),
                leaf => (name, leaf),
            })
            .collect();
        self.help_names = names;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn help_aliases(&self) -> Vec<String> {
        self.help_names.iter().map(|n| name_to_alias(n)).collect()
    }

    pub fn summary(&self) -> &str {
        self.description.first().map(String::as_str).unwrap_or("")
    }

    pub fn description(&self) -> &[String] {
        &self.description
    }

    pub fn footnotes(&self) -> &[String] {
        &self.footnotes
    }

    pub fn get(&self, name: &str) -> Option<&Command> {
        self.commands
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, c)| c)
    }

    /// Commands in insertion order.
    pub fn commands(&self) -> impl Iterator<Item = (&str, &Command)> {
        self.commands.iter().map(|(n, c)| (n.as_str(), c))
    }

    pub fn names(&self) -> Vec<String> {
        self.commands.iter().map(|(n, _)| n.clone()).collect()
    }

    pub fn default_name(&self) -> Option<&str> {
        self.default.as_deref()
    }

    /// Walk `path` down the tree.
    pub fn resolve(&self, path: &[String]) -> Option<Resolved<'_>> {
        let Some((first, rest)) = path.split_first() else {
            return Some(Resolved::Table(self));
        };
        match self.get(first)? {
            Command::Leaf(schema) if rest.is_empty() => Some(Resolved::Schema(schema)),
            Command::Leaf(_) => None,
            Command::Group(table) => table.resolve(rest),
        }
    }

    /// Resolve the sub-command named by the first non-option token and
    /// parse the remaining tokens against it.
    #[instrument(level = "debug", skip_all, fields(table = %self.name, tokens = tokens.len()))]
    pub fn dispatch<S: AsRef<str>>(&self, tokens: &[S]) -> UsageResult<Dispatched> {
        let tokens: Vec<&str> = tokens.iter().map(|t| t.as_ref()).collect();
        self.dispatch_at(Vec::new(), &tokens)
    }

    fn dispatch_at(&self, mut path: Vec<String>, tokens: &[&str]) -> UsageResult<Dispatched> {
        let found = tokens
            .iter()
            .position(|t| *t == "--" || !t.starts_with('-') || *t == "-");

        // After `--` the next token is still the command name; `--` stays for the leaf.
        let idx = match found {
            Some(i) if tokens[i] == "--" => Some(i + 1).filter(|&next| next < tokens.len()),
            other => other,
        };
        let Some(idx) = idx else {
            return self.dispatch_without_name(path, tokens);
        };

        let name = tokens[idx];
        let Some(command) = self.get(name) else {
            return Err(UsageError::new(
                path,
                DispatchError::UnknownCommand {
                    name: name.to_string(),
                    available: self.names(),
                },
            ));
        };
        debug!(command = name, "dispatching");

        let mut remaining: Vec<&str> = Vec::with_capacity(tokens.len().saturating_sub(1));
        remaining.extend_from_slice(&tokens[..idx]);
        remaining.extend_from_slice(&tokens[idx + 1..]);
        path.push(name.to_string());

        match command {
            Command::Leaf(schema) => parse_leaf(schema, path, &remaining),
            Command::Group(table) => table.dispatch_at(path, &remaining),
        }
    }

    /// Only options (or nothing) before any command name.
    fn dispatch_without_name(&self, mut path: Vec<String>, tokens: &[&str]) -> UsageResult<Dispatched> {
        let help_aliases = self.help_aliases();
        let options_end = tokens.iter().position(|t| *t == "--").unwrap_or(tokens.len());
        if tokens[..options_end]
            .iter()
            .any(|t| help_aliases.iter().any(|h| h == t))
        {
            return Ok(Dispatched::Help { path });
        }

        match self.default.as_deref().and_then(|name| self.get(name).map(|c| (name, c))) {
            Some((name, command)) => {
                debug!(command = name, "dispatching to default command");
                path.push(name.to_string());
                match command {
                    Command::Leaf(schema) => parse_leaf(schema, path, tokens),
                    Command::Group(table) => table.dispatch_at(path, tokens),
                }
            }
            None => Err(UsageError::new(path, DispatchError::NoCommandGiven)),
        }
    }
}

fn parse_leaf(schema: &Schema, path: Vec<String>, tokens: &[&str]) -> UsageResult<Dispatched> {
    match parse(schema, tokens) {
        Ok(ParseOutcome::Call(mut call)) => {
            call.set_path(path.clone());
            Ok(Dispatched::Call { path, call })
        }
        Ok(ParseOutcome::Help) => Ok(Dispatched::Help { path }),
        Ok(ParseOutcome::Alternate(name)) => Ok(Dispatched::Alternate { path, name }),
        Err(e) => Err(UsageError::new(path, e)),
    }
}
