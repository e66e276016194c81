//! Parameter model: one CLI-facing argument descriptor and the values it binds

use std::collections::BTreeMap;
use std::fmt;

use crate::domain::converter::Converter;

/// A parsed or default value bound to a parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent optional value (no default given, nothing parsed)
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// Accumulated repeatable option or catch-all positional
    List(Vec<Value>),
    /// Catch-all named values, keyed by option name
    Map(BTreeMap<String, Value>),
}

impl Value {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    /// Name of the built-in converter able to produce this value, if any.
    pub fn type_tag(&self) -> Option<&'static str> {
        match self {
            Value::Bool(_) => Some("bool"),
            Value::Int(_) => Some("int"),
            Value::Float(_) => Some("float"),
            Value::Str(_) => Some("str"),
            Value::None | Value::List(_) | Value::Map(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => write!(f, "none"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Str(s) => write!(f, "{}", s),
            Value::List(items) => {
                let parts: Vec<String> = items.iter().map(|v| v.to_string()).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            Value::Map(entries) => {
                let parts: Vec<String> = entries
                    .iter()
                    .map(|(k, v)| format!("{}={}", k, v))
                    .collect();
                write!(f, "{{{}}}", parts.join(", "))
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

/// How a parameter is matched on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
    /// Fixed positional slot
    Positional,
    /// Absorbs every positional beyond the fixed slots
    PositionalRest,
    /// Boolean switch; presence is the value
    NamedFlag,
    /// Option taking exactly one value
    NamedValue,
    /// Repeatable option, each occurrence appends
    NamedValueList,
    /// Catch-all for unknown long options
    NamedValueMap,
}

impl ParamKind {
    pub fn is_positional(self) -> bool {
        matches!(self, ParamKind::Positional | ParamKind::PositionalRest)
    }

    pub fn is_named(self) -> bool {
        !self.is_positional()
    }

    /// Whether an option of this kind consumes a value token.
    pub fn takes_value(self) -> bool {
        matches!(
            self,
            ParamKind::NamedValue | ParamKind::NamedValueList | ParamKind::NamedValueMap
        )
    }
}

/// Synthesized flags that divert the parse instead of binding a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Help,
    /// Alternate action registered under this name (e.g. `version`)
    Alternate(String),
}

/// One CLI parameter compiled from one declared parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub kind: ParamKind,
    /// Literal tokens selecting this parameter (`-n`, `--name`)
    pub aliases: Vec<String>,
    pub required: bool,
    pub default: Value,
    pub converter: Converter,
    /// Spelling that sets a flag to false (`--no-name`)
    pub negated: Option<String>,
    /// Slot index for positional kinds
    pub position: Option<usize>,
    pub description: String,
    pub action: Option<Action>,
}

impl Parameter {
    /// Display label: first alias for named parameters, the name otherwise.
    pub fn display_name(&self) -> &str {
        self.aliases.first().map(String::as_str).unwrap_or(&self.name)
    }

    pub fn is_flag(&self) -> bool {
        self.kind == ParamKind::NamedFlag
    }

    pub fn matches(&self, token: &str) -> Option<bool> {
        if self.aliases.iter().any(|a| a == token) {
            Some(true)
        } else if self.negated.as_deref() == Some(token) {
            Some(false)
        } else {
            None
        }
    }
}

/// Convert a parameter name to its CLI alias (`dry_run` -> `--dry-run`, `v` -> `-v`).
pub fn name_to_alias(name: &str) -> String {
    let name = name.trim_start_matches('-');
    if name.chars().count() == 1 {
        format!("-{}", name)
    } else {
        format!("--{}", name.replace('_', "-"))
    }
}

/// Convert a long option spelling back to a parameter-style key (`--dry-run` -> `dry_run`).
pub fn alias_to_name(alias: &str) -> String {
    alias.trim_start_matches('-').replace('-', "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_single_char_name_when_aliasing_then_short_form() {
        assert_eq!(name_to_alias("v"), "-v");
    }

    #[test]
    fn given_snake_case_name_when_aliasing_then_long_form_with_hyphens() {
        assert_eq!(name_to_alias("dry_run"), "--dry-run");
        assert_eq!(alias_to_name("--dry-run"), "dry_run");
    }

    #[test]
    fn given_nested_values_when_displaying_then_renders_compactly() {
        let mut map = BTreeMap::new();
        map.insert("a".to_string(), Value::Int(1));
        assert_eq!(Value::from(vec!["x", "y"]).to_string(), "[x, y]");
        assert_eq!(Value::Map(map).to_string(), "{a=1}");
        assert_eq!(Value::Float(2.5).to_string(), "2.5");
    }

    #[test]
    fn given_value_kinds_when_querying_then_only_named_value_kinds_take_values() {
        assert!(ParamKind::NamedValue.takes_value());
        assert!(ParamKind::NamedValueList.takes_value());
        assert!(!ParamKind::NamedFlag.takes_value());
        assert!(!ParamKind::Positional.takes_value());
    }
}
