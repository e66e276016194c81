//! Compiled schema: the immutable parameter grammar of one function

use std::fmt;

use crate::domain::bound::BoundCall;
use crate::domain::parameter::{Action, ParamKind, Parameter, Value};
use crate::domain::signature::{Alternate, Handler, HandlerResult};

/// Ordered parameters plus documentation and the callable they bind to.
///
/// Built by the compiler and never mutated afterwards, so one schema can
/// serve any number of concurrent invocations.
#[derive(Clone)]
pub struct Schema {
    name: String,
    params: Vec<Parameter>,
    description: Vec<String>,
    footnotes: Vec<String>,
    handler: Option<Handler>,
    alternates: Vec<Alternate>,
}

impl Schema {
    pub(crate) fn from_parts(
        name: String,
        params: Vec<Parameter>,
        description: Vec<String>,
        footnotes: Vec<String>,
        handler: Option<Handler>,
        alternates: Vec<Alternate>,
    ) -> Self {
        Self {
            name,
            params,
            description,
            footnotes,
            handler,
            alternates,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// All parameters in declaration order, synthesized ones last.
    pub fn parameters(&self) -> impl Iterator<Item = &Parameter> {
        self.params.iter()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.params.iter().find(|p| p.name == name)
    }

    /// Fixed positional slots in position order (catch-all excluded).
    pub fn positionals(&self) -> impl Iterator<Item = &Parameter> {
        self.params
            .iter()
            .filter(|p| p.kind == ParamKind::Positional)
    }

    pub fn rest(&self) -> Option<&Parameter> {
        self.params
            .iter()
            .find(|p| p.kind == ParamKind::PositionalRest)
    }

    pub fn catch_all_named(&self) -> Option<&Parameter> {
        self.params
            .iter()
            .find(|p| p.kind == ParamKind::NamedValueMap)
    }

    /// Named parameters selectable by an alias.
    pub fn named(&self) -> impl Iterator<Item = &Parameter> {
        self.params
            .iter()
            .filter(|p| p.kind.is_named() && p.kind != ParamKind::NamedValueMap)
    }

    /// Look up an alias; the flag tells whether the plain (true) or the
    /// negated (false) spelling matched.
    pub fn find_alias(&self, token: &str) -> Option<(&Parameter, bool)> {
        self.named()
            .find_map(|p| p.matches(token).map(|plain| (p, plain)))
    }

    pub fn has_options(&self) -> bool {
        self.named().next().is_some() || self.catch_all_named().is_some()
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

    pub fn help_aliases(&self) -> Vec<&str> {
        self.params
            .iter()
            .filter(|p| p.action == Some(Action::Help))
            .flat_map(|p| p.aliases.iter().map(String::as_str))
            .collect()
    }

    pub fn alternate(&self, name: &str) -> Option<&Alternate> {
        self.alternates.iter().find(|a| a.name == name)
    }

    pub fn handler(&self) -> Option<&Handler> {
        self.handler.as_ref()
    }

    /// Call the target handler with a bound call.
    pub fn invoke(&self, call: &BoundCall) -> HandlerResult {
        match &self.handler {
            Some(handler) => handler(call),
            None => Err(format!("command {} has no handler", self.name).into()),
        }
    }

    /// Serialize a bound call back into tokens that parse to the same call.
    pub fn unparse(&self, call: &BoundCall) -> Vec<String> {
        let mut tokens = Vec::new();

        for param in self.named().filter(|p| p.action.is_none()) {
            let Some(value) = call.get(&param.name) else {
                continue;
            };
            let Some(alias) = param.aliases.first() else {
                continue;
            };
            match param.kind {
                ParamKind::NamedFlag => {
                    let on = value.as_bool().unwrap_or(false);
                    let default = param.default.as_bool().unwrap_or(false);
                    if on && !default {
                        tokens.push(alias.clone());
                    } else if !on && default {
                        if let Some(negated) = &param.negated {
                            tokens.push(negated.clone());
                        }
                    }
                }
                ParamKind::NamedValue => {
                    if !value.is_none() && (param.required || *value != param.default) {
                        tokens.push(alias.clone());
                        tokens.push(value.to_string());
                    }
                }
                ParamKind::NamedValueList => {
                    for item in value.as_list().unwrap_or(&[]) {
                        tokens.push(alias.clone());
                        tokens.push(item.to_string());
                    }
                }
                _ => {}
            }
        }

        if let Some(map_param) = self.catch_all_named() {
            if let Some(entries) = call.map(&map_param.name) {
                for (key, value) in entries {
                    tokens.push(format!("--{}", key.replace('_', "-")));
                    tokens.push(value.to_string());
                }
            }
        }

        let mut positional = Vec::new();
        for param in self.positionals() {
            match call.get(&param.name) {
                Some(Value::None) | None => break,
                Some(value) => positional.push(value.to_string()),
            }
        }
        if let Some(rest) = self.rest() {
            positional.extend(call.list(&rest.name).iter().map(|v| v.to_string()));
        }
        if !positional.is_empty() {
            tokens.push("--".to_string());
            tokens.extend(positional);
        }

        tokens
    }
}

// Grammar equality: handlers are not comparable and do not take part.
impl PartialEq for Schema {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.params == other.params
            && self.description == other.description
            && self.footnotes == other.footnotes
            && self
                .alternates
                .iter()
                .map(|a| &a.name)
                .eq(other.alternates.iter().map(|a| &a.name))
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("description", &self.description)
            .field("footnotes", &self.footnotes)
            .field("has_handler", &self.handler.is_some())
            .field("alternates", &self.alternates)
            .finish()
    }
}
