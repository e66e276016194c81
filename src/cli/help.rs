//! Help screen rendering
//!
//! Reads schemas and command tables only through their public accessors.

use itertools::Itertools;

use crate::application::CommandTable;
use crate::config::Settings;
use crate::domain::{Action, ParamKind, Parameter, Schema, Value};

const INDENT: usize = 2;
const MAX_LABEL: usize = 28;

/// One-line usage summary, e.g. `Usage: prog [OPTIONS] name [files...]`.
pub fn render_usage(schema: &Schema, prog: &str) -> String {
    let mut parts = vec!["Usage:".to_string(), prog.to_string()];

    let optional_named = schema
        .named()
        .any(|p| !p.required)
        || schema.catch_all_named().is_some();
    if optional_named {
        parts.push("[OPTIONS]".to_string());
    }
    parts.extend(
        schema
            .named()
            .filter(|p| p.required)
            .map(|p| format!("{}={}", p.display_name(), p.converter.display_name())),
    );
    parts.extend(
        schema
            .positionals()
            .sorted_by_key(|p| p.position)
            .map(|p| if p.required { p.name.clone() } else { format!("[{}]", p.name) }),
    );
    if let Some(rest) = schema.rest() {
        parts.push(format!("[{}...]", rest.name));
    }
    parts.join(" ")
}

/// Usage line for a command table.
pub fn render_table_usage(table: &CommandTable, prog: &str) -> String {
    match table.default_name() {
        Some(_) => format!("Usage: {prog} [OPTIONS] [COMMAND] [ARGS]..."),
        None => format!("Usage: {prog} [OPTIONS] COMMAND [ARGS]..."),
    }
}

/// Full help screen for one schema.
pub fn render_help(schema: &Schema, prog: &str, settings: &Settings) -> String {
    let width = settings.width;
    let mut sections = vec![render_usage(schema, prog)];

    sections.extend(schema.description().iter().map(|p| fill(p, width)));

    let arguments: Vec<(String, String)> = schema
        .positionals()
        .sorted_by_key(|p| p.position)
        .chain(schema.rest())
        .map(|p| {
            let label = if p.kind == ParamKind::PositionalRest {
                format!("{}...", p.name)
            } else {
                p.name.clone()
            };
            (label, describe(p))
        })
        .collect();
    if !arguments.is_empty() {
        sections.push(format!("Arguments:\n{}", columns(&arguments, width)));
    }

    let options: Vec<(String, String)> = schema
        .named()
        .chain(schema.catch_all_named())
        .filter(|p| !(settings.hide_help && p.action == Some(Action::Help)))
        .sorted_by(|a, b| a.name.cmp(&b.name))
        .map(|p| (option_label(p), describe(p)))
        .collect();
    if !options.is_empty() {
        sections.push(format!("Options:\n{}", columns(&options, width)));
    }

    sections.extend(schema.footnotes().iter().map(|p| fill(p, width)));
    sections.join("\n\n") + "\n"
}

/// Help screen for a command table: its commands and their summaries.
pub fn render_table_help(table: &CommandTable, prog: &str, settings: &Settings) -> String {
    let width = settings.width;
    let mut sections = vec![render_table_usage(table, prog)];

    sections.extend(table.description().iter().map(|p| fill(p, width)));

    let commands: Vec<(String, String)> = table
        .commands()
        .map(|(name, command)| {
            let label = if table.default_name() == Some(name) {
                format!("{name} (default)")
            } else {
                name.to_string()
            };
            (label, command.summary().to_string())
        })
        .collect();
    if !commands.is_empty() {
        sections.push(format!("Commands:\n{}", columns(&commands, width)));
    }

    let help = table.help_aliases();
    if !help.is_empty() && !settings.hide_help {
        let label = help.iter().sorted_by_key(|a| a.starts_with("--")).join(", ");
        let rows = vec![(label, "Show this help".to_string())];
        sections.push(format!("Options:\n{}", columns(&rows, width)));
    }

    sections.extend(table.footnotes().iter().map(|p| fill(p, width)));
    sections.join("\n\n") + "\n"
}

/// `-n, --name=TYPE`; flags list their negated spelling as well.
fn option_label(param: &Parameter) -> String {
    // short spellings first
    let aliases = param
        .aliases
        .iter()
        .sorted_by_key(|a| a.starts_with("--"))
        .join(", ");
    match param.kind {
        ParamKind::NamedFlag => match &param.negated {
            Some(negated) => format!("{aliases}, {negated}"),
            None => aliases,
        },
        ParamKind::NamedValueMap => format!("--KEY={}", param.converter.display_name()),
        _ => format!("{}={}", aliases, param.converter.display_name()),
    }
}

fn describe(param: &Parameter) -> String {
    let mut text = param.description.clone();
    let mut push = |extra: String| {
        if !text.is_empty() {
            text.push(' ');
        }
        text.push_str(&extra);
    };
    if param.kind == ParamKind::NamedValueList {
        push("(repeatable)".to_string());
    }
    if !param.required && shows_default(&param.default) {
        push(format!("(default: {})", param.default));
    }
    text
}

fn shows_default(value: &Value) -> bool {
    match value {
        Value::None | Value::Bool(false) => false,
        Value::List(items) => !items.is_empty(),
        Value::Map(entries) => !entries.is_empty(),
        _ => true,
    }
}

/// Two-column layout: labels left, wrapped descriptions right.
fn columns(rows: &[(String, String)], width: usize) -> String {
    let label_width = rows
        .iter()
        .map(|(label, _)| label.chars().count())
        .filter(|&w| w <= MAX_LABEL)
        .max()
        .unwrap_or(0);
    let desc_col = INDENT + label_width + 2;
    let desc_width = width.saturating_sub(desc_col).max(20);
    let pad = " ".repeat(desc_col);

    rows.iter()
        .map(|(label, desc)| {
            let lines = wrap(desc, desc_width);
            let head = format!("{}{}", " ".repeat(INDENT), label);
            let head_len = head.chars().count();
            let mut out = Vec::with_capacity(lines.len() + 1);
            let mut lines = lines.into_iter();
            if head_len + 2 <= desc_col {
                match lines.next() {
                    Some(first) => out.push(format!("{}{}{}", head, " ".repeat(desc_col - head_len), first)),
                    None => out.push(head),
                }
            } else {
                out.push(head);
            }
            out.extend(lines.map(|l| format!("{pad}{l}")));
            out.join("\n")
        })
        .join("\n")
}

fn fill(paragraph: &str, width: usize) -> String {
    wrap(paragraph, width).join("\n")
}

/// Greedy word wrap. Words longer than `width` get a line of their own.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        if !line.is_empty() && line.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}
