//! Token parser: binds an argument vector to a compiled schema
//!
//! Single left-to-right pass with one token of lookahead for options that
//! take a value.

use std::collections::{BTreeMap, HashMap};

use tracing::{debug, instrument, trace};

use crate::application::error::ParseError;
use crate::domain::{alias_to_name, Action, BoundCall, ParamKind, Parameter, Schema, Value};

/// What a successful parse produced.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    /// Every parameter bound, ready to invoke the target
    Call(BoundCall),
    /// A help flag was given; the target must not run
    Help,
    /// An alternate action flag was given
    Alternate(String),
}

impl ParseOutcome {
    pub fn into_call(self) -> Option<BoundCall> {
        match self {
            ParseOutcome::Call(call) => Some(call),
            ParseOutcome::Help | ParseOutcome::Alternate(_) => None,
        }
    }
}

/// Parse `tokens` against `schema`.
#[instrument(level = "debug", skip_all, fields(command = schema.name(), tokens = tokens.len()))]
pub fn parse<S: AsRef<str>>(schema: &Schema, tokens: &[S]) -> Result<ParseOutcome, ParseError> {
    let tokens: Vec<&str> = tokens.iter().map(|t| t.as_ref()).collect();
    let mut state = ParseState::new(schema);
    let mut stream = tokens.iter().copied();
    let mut escaped = false;

    while let Some(token) = stream.next() {
        if escaped {
            state.positional(token)?;
            continue;
        }

        let diverted = if token == "--" {
            trace!("option parsing stopped by --");
            escaped = true;
            None
        } else if token.starts_with("--") {
            state.long(token, &mut stream)?
        } else if is_short_cluster(token) {
            state.short(token, &mut stream)?
        } else {
            state.positional(token)?;
            None
        };

        if let Some(outcome) = diverted {
            debug!(outcome = ?outcome, "parse short-circuited");
            return Ok(outcome);
        }
    }

    state.finish().map(ParseOutcome::Call)
}

/// `-x`, `-abc`: a dash followed by anything but a number.
///
/// Only digit-led or `.`-led bodies count as numbers, so `-inf` and
/// `-nan` stay option clusters.
fn is_short_cluster(token: &str) -> bool {
    let Some(body) = token.strip_prefix('-') else {
        return false;
    };
    match body.chars().next() {
        None => false,
        Some(c) if c.is_ascii_digit() => false,
        Some('.') => body.parse::<f64>().is_err(),
        Some(_) => true,
    }
}

/// Leading `-` and digits of an attached int value: `3v` -> `3`.
fn int_prefix(text: &str) -> &str {
    let sign = usize::from(text.starts_with('-'));
    let digits = text[sign..].bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        ""
    } else {
        &text[..sign + digits]
    }
}

/// Accumulators owned by one parse.
struct ParseState<'s> {
    schema: &'s Schema,
    positionals: Vec<&'s Parameter>,
    next_slot: usize,
    values: HashMap<String, Value>,
    lists: HashMap<String, Vec<Value>>,
    rest: Vec<Value>,
    extra: BTreeMap<String, Value>,
}

impl<'s> ParseState<'s> {
    fn new(schema: &'s Schema) -> Self {
        let mut positionals: Vec<&Parameter> = schema.positionals().collect();
        positionals.sort_by_key(|p| p.position);
        Self {
            schema,
            positionals,
            next_slot: 0,
            values: HashMap::new(),
            lists: HashMap::new(),
            rest: Vec::new(),
            extra: BTreeMap::new(),
        }
    }

    fn long<'t>(
        &mut self,
        token: &'t str,
        stream: &mut impl Iterator<Item = &'t str>,
    ) -> Result<Option<ParseOutcome>, ParseError> {
        let (option, attached) = match token.split_once('=') {
            Some((option, value)) => (option, Some(value)),
            None => (token, None),
        };

        let schema = self.schema;
        if let Some((param, plain)) = schema.find_alias(option) {
            return self.named(param, plain, option, attached, stream);
        }

        let Some(catch_all) = schema.catch_all_named() else {
            return Err(ParseError::UnrecognizedOption {
                token: option.to_string(),
            });
        };
        let raw = match attached {
            Some(raw) => raw,
            None => stream.next().ok_or_else(|| ParseError::MissingValue {
                option: option.to_string(),
                param: catch_all.name.clone(),
            })?,
        };
        let value = convert(catch_all, option, raw)?;
        trace!(option, "bound to catch-all {}", catch_all.name);
        self.extra.insert(alias_to_name(option), value);
        Ok(None)
    }

    fn short<'t>(
        &mut self,
        token: &'t str,
        stream: &mut impl Iterator<Item = &'t str>,
    ) -> Result<Option<ParseOutcome>, ParseError> {
        let schema = self.schema;
        let body = &token[1..];
        let mut pos = 0;
        while let Some(ch) = body[pos..].chars().next() {
            pos += ch.len_utf8();
            let alias = format!("-{}", ch);
            let Some((param, plain)) = schema.find_alias(&alias) else {
                return Err(ParseError::UnrecognizedOption { token: alias });
            };
            if param.kind.takes_value() {
                let remainder = &body[pos..];
                // An int takes only its digits and the cluster goes on: -c3v == -c 3 -v
                if param.converter.tag() == "int" {
                    let digits = int_prefix(remainder);
                    if !digits.is_empty() && digits.len() < remainder.len() {
                        pos += digits.len();
                        if let Some(outcome) = self.named(param, plain, &alias, Some(digits), stream)? {
                            return Ok(Some(outcome));
                        }
                        continue;
                    }
                }
                // Otherwise the rest of the cluster is the value: -xvfNAME == -x -v -f NAME
                let attached = (!remainder.is_empty()).then_some(remainder);
                return self.named(param, plain, &alias, attached, stream);
            }
            if let Some(outcome) = self.named(param, plain, &alias, None, stream)? {
                return Ok(Some(outcome));
            }
        }
        Ok(None)
    }

    fn named<'t>(
        &mut self,
        param: &'s Parameter,
        plain: bool,
        option: &str,
        attached: Option<&'t str>,
        stream: &mut impl Iterator<Item = &'t str>,
    ) -> Result<Option<ParseOutcome>, ParseError> {
        match param.kind {
            ParamKind::NamedFlag => {
                if attached.is_some() {
                    return Err(ParseError::UnexpectedValue {
                        option: option.to_string(),
                        param: param.name.clone(),
                    });
                }
                match &param.action {
                    Some(Action::Help) => return Ok(Some(ParseOutcome::Help)),
                    Some(Action::Alternate(name)) => {
                        return Ok(Some(ParseOutcome::Alternate(name.clone())))
                    }
                    None => {}
                }
                trace!(option, value = plain, "flag");
                self.values.insert(param.name.clone(), Value::Bool(plain));
            }
            ParamKind::NamedValue | ParamKind::NamedValueList => {
                let raw = match attached {
                    Some(raw) => raw,
                    None => stream.next().ok_or_else(|| ParseError::MissingValue {
                        option: option.to_string(),
                        param: param.name.clone(),
                    })?,
                };
                let value = convert(param, option, raw)?;
                trace!(option, value = %value, "option");
                if param.kind == ParamKind::NamedValueList {
                    self.lists.entry(param.name.clone()).or_default().push(value);
                } else {
                    self.values.insert(param.name.clone(), value);
                }
            }
            ParamKind::Positional | ParamKind::PositionalRest | ParamKind::NamedValueMap => {
                return Err(ParseError::UnrecognizedOption {
                    token: option.to_string(),
                });
            }
        }
        Ok(None)
    }

    fn positional(&mut self, token: &str) -> Result<(), ParseError> {
        if let Some(param) = self.positionals.get(self.next_slot).copied() {
            self.next_slot += 1;
            let value = convert(param, &param.name, token)?;
            trace!(param = %param.name, value = %value, "positional");
            self.values.insert(param.name.clone(), value);
            return Ok(());
        }
        let schema = self.schema;
        match schema.rest() {
            Some(rest) => {
                let value = convert(rest, &rest.name, token)?;
                self.rest.push(value);
                Ok(())
            }
            None => Err(ParseError::TooManyArguments {
                token: token.to_string(),
            }),
        }
    }

    fn finish(mut self) -> Result<BoundCall, ParseError> {
        let mut call = BoundCall::new(Vec::new());
        let schema = self.schema;
        for param in schema.parameters() {
            if param.action.is_some() {
                continue;
            }
            let value = match param.kind {
                ParamKind::PositionalRest => Value::List(std::mem::take(&mut self.rest)),
                ParamKind::NamedValueMap => Value::Map(std::mem::take(&mut self.extra)),
                ParamKind::NamedValueList => match self.lists.remove(&param.name) {
                    Some(items) => Value::List(items),
                    None => param.default.clone(),
                },
                ParamKind::Positional | ParamKind::NamedFlag | ParamKind::NamedValue => {
                    match self.values.remove(&param.name) {
                        Some(value) => value,
                        None if param.required => {
                            return Err(ParseError::MissingRequiredArgument {
                                param: param.name.clone(),
                            })
                        }
                        None => param.default.clone(),
                    }
                }
            };
            call.insert(param.name.clone(), value);
        }
        Ok(call)
    }
}

fn convert(param: &Parameter, option: &str, raw: &str) -> Result<Value, ParseError> {
    param
        .converter
        .convert(raw)
        .map_err(|source| ParseError::ConversionFailed {
            token: raw.to_string(),
            option: option.to_string(),
            param: param.name.clone(),
            type_name: param.converter.display_name(),
            source,
        })
}
