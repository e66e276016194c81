//! Signature compiler: turns a schema source into a validated `Schema`

use std::collections::{HashMap, HashSet};

use tracing::{debug, instrument, trace};

use crate::domain::{
    name_to_alias, Action, CompileError, CompileResult, Converter, ConverterRegistry, ParamKind,
    ParamMarker, ParamSpec, Parameter, Schema, SchemaError, SchemaSource, UnknownTypeError, Value,
};

/// Name of the synthesized help parameter.
pub const HELP_PARAM: &str = "help";

/// Knobs the surrounding runner installs into every compiled schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    /// Names of the synthesized help flag (`help` -> `--help`, `h` -> `-h`)
    pub help_names: Vec<String>,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            help_names: vec!["help".into(), "h".into()],
        }
    }
}

/// Compiles schema sources against a converter registry.
pub struct Compiler<'a> {
    registry: &'a ConverterRegistry,
    options: CompileOptions,
}

impl<'a> Compiler<'a> {
    pub fn new(registry: &'a ConverterRegistry) -> Self {
        Self::with_options(registry, CompileOptions::default())
    }

    pub fn with_options(registry: &'a ConverterRegistry, options: CompileOptions) -> Self {
        Self { registry, options }
    }

    /// Compile a source into a schema, validating every grammar invariant.
    #[instrument(level = "debug", skip(self, source), fields(command = source.name()))]
    pub fn compile(&self, source: &dyn SchemaSource) -> CompileResult<Schema> {
        let mut params: Vec<Parameter> = Vec::new();
        let mut names: HashSet<String> = HashSet::new();
        let mut position = 0usize;
        let mut optional_positional: Option<String> = None;
        let mut rest: Option<String> = None;
        let mut catch_all: Option<String> = None;

        for spec in source.parameters() {
            if !names.insert(spec.name.clone()) {
                return Err(SchemaError::DuplicateName(spec.name.clone()).into());
            }

            let param = match spec.marker {
                ParamMarker::VarPositional => {
                    if let Some(other) = &rest {
                        return Err(SchemaError::DuplicateCatchAll {
                            param: spec.name.clone(),
                            other: other.clone(),
                        }
                        .into());
                    }
                    reject_default(spec)?;
                    rest = Some(spec.name.clone());
                    let param = Parameter {
                        position: Some(position),
                        ..self.base(spec, ParamKind::PositionalRest, Value::List(Vec::new()))?
                    };
                    position += 1;
                    param
                }
                ParamMarker::VarKeyword => {
                    if let Some(other) = &catch_all {
                        return Err(SchemaError::DuplicateCatchAll {
                            param: spec.name.clone(),
                            other: other.clone(),
                        }
                        .into());
                    }
                    reject_default(spec)?;
                    catch_all = Some(spec.name.clone());
                    self.base(spec, ParamKind::NamedValueMap, Value::Map(Default::default()))?
                }
                _ if matches!(spec.default, Some(Value::Bool(_))) => self.flag(spec)?,
                ParamMarker::PositionalOrKeyword => {
                    if let Some(rest) = &rest {
                        return Err(SchemaError::PositionalAfterRest {
                            param: spec.name.clone(),
                            rest: rest.clone(),
                        }
                        .into());
                    }
                    if spec.default.is_none() {
                        if let Some(after) = &optional_positional {
                            return Err(SchemaError::RequiredAfterOptional {
                                param: spec.name.clone(),
                                after: after.clone(),
                            }
                            .into());
                        }
                    } else if optional_positional.is_none() {
                        optional_positional = Some(spec.name.clone());
                    }
                    let param = Parameter {
                        position: Some(position),
                        ..self.base(spec, ParamKind::Positional, Value::None)?
                    };
                    position += 1;
                    param
                }
                ParamMarker::KeywordOnly => {
                    let is_list = spec.repeatable || matches!(spec.default, Some(Value::List(_)));
                    if is_list {
                        let mut param =
                            self.base(spec, ParamKind::NamedValueList, Value::List(Vec::new()))?;
                        param.required = false;
                        param.aliases = aliases_for(spec)?;
                        if !matches!(param.default, Value::List(_)) {
                            let single = std::mem::replace(&mut param.default, Value::None);
                            param.default = Value::List(vec![single]);
                        }
                        param
                    } else {
                        let mut param = self.base(spec, ParamKind::NamedValue, Value::None)?;
                        param.aliases = aliases_for(spec)?;
                        param
                    }
                }
            };

            trace!(param = %param.name, kind = ?param.kind, "compiled parameter");
            params.push(param);
        }

        self.synthesize_alternates(source, &mut params, &mut names)?;
        self.synthesize_help(&mut params, &names)?;
        check_unique_aliases(&params)?;

        debug!(params = params.len(), "schema compiled");
        Ok(Schema::from_parts(
            source.name().to_string(),
            params,
            source.description().to_vec(),
            source.footnotes().to_vec(),
            source.handler(),
            source.alternates().to_vec(),
        ))
    }

    /// Parameter skeleton shared by every kind; `empty` is the default used
    /// when the declaration has none.
    fn base(&self, spec: &ParamSpec, kind: ParamKind, empty: Value) -> CompileResult<Parameter> {
        let converter = self.converter_for(spec)?;
        Ok(Parameter {
            name: spec.name.clone(),
            kind,
            aliases: Vec::new(),
            required: spec.default.is_none(),
            default: spec.default.clone().unwrap_or(empty),
            converter,
            negated: None,
            position: None,
            description: spec.description.clone(),
            action: None,
        })
    }

    fn flag(&self, spec: &ParamSpec) -> CompileResult<Parameter> {
        let default = spec.default.as_ref().and_then(Value::as_bool).unwrap_or(false);
        let negated = default.then(|| format!("--no-{}", spec.name.replace('_', "-")));
        Ok(Parameter {
            name: spec.name.clone(),
            kind: ParamKind::NamedFlag,
            aliases: aliases_for(spec)?,
            required: false,
            default: Value::Bool(default),
            converter: self.resolve("bool", &spec.name)?,
            negated,
            position: None,
            description: spec.description.clone(),
            action: None,
        })
    }

    fn converter_for(&self, spec: &ParamSpec) -> CompileResult<Converter> {
        let inferred = match &spec.default {
            Some(Value::List(items)) => items.first().and_then(Value::type_tag),
            Some(value) => value.type_tag(),
            None => None,
        };
        let tag = spec.annotation.as_deref().or(inferred).unwrap_or("str");
        self.resolve(tag, &spec.name)
    }

    fn resolve(&self, tag: &str, param: &str) -> CompileResult<Converter> {
        self.registry.resolve(tag).map_err(|e| {
            CompileError::UnknownType(UnknownTypeError {
                param: param.to_string(),
                ..e
            })
        })
    }

    fn synthesize_alternates(
        &self,
        source: &dyn SchemaSource,
        params: &mut Vec<Parameter>,
        names: &mut HashSet<String>,
    ) -> CompileResult<()> {
        for alt in source.alternates() {
            if !names.insert(alt.name.clone()) {
                return Err(SchemaError::DuplicateName(alt.name.clone()).into());
            }
            let alias = name_to_alias(&alt.name);
            validate_alias(&alias, &alt.name)?;
            params.push(Parameter {
                name: alt.name.clone(),
                kind: ParamKind::NamedFlag,
                aliases: vec![alias],
                required: false,
                default: Value::Bool(false),
                converter: self.resolve("bool", &alt.name)?,
                negated: None,
                position: None,
                description: alt.description.clone(),
                action: Some(Action::Alternate(alt.name.clone())),
            });
        }
        Ok(())
    }

    /// Help aliases already claimed by a declared parameter are dropped.
    fn synthesize_help(&self, params: &mut Vec<Parameter>, names: &HashSet<String>) -> CompileResult<()> {
        if self.options.help_names.is_empty() || names.contains(HELP_PARAM) {
            return Ok(());
        }
        let taken: HashSet<&str> = params
            .iter()
            .flat_map(|p| p.aliases.iter().chain(p.negated.iter()))
            .map(String::as_str)
            .collect();
        let mut aliases = Vec::new();
        for name in &self.options.help_names {
            let alias = name_to_alias(name);
            validate_alias(&alias, HELP_PARAM)?;
            if taken.contains(alias.as_str()) {
                debug!(alias = %alias, "help alias shadowed by declared parameter");
                continue;
            }
            aliases.push(alias);
        }
        if aliases.is_empty() {
            return Ok(());
        }
        params.push(Parameter {
            name: HELP_PARAM.to_string(),
            kind: ParamKind::NamedFlag,
            aliases,
            required: false,
            default: Value::Bool(false),
            converter: self.resolve("bool", HELP_PARAM)?,
            negated: None,
            position: None,
            description: "Show this help".to_string(),
            action: Some(Action::Help),
        });
        Ok(())
    }
}

/// Compile with the built-in converters and default options.
pub fn compile(source: &dyn SchemaSource) -> CompileResult<Schema> {
    let registry = ConverterRegistry::with_builtins();
    Compiler::new(&registry).compile(source)
}

fn reject_default(spec: &ParamSpec) -> CompileResult<()> {
    match spec.default {
        Some(_) => Err(SchemaError::InvalidDefault {
            param: spec.name.clone(),
            reason: "catch-all parameters cannot declare a default".to_string(),
        }
        .into()),
        None => Ok(()),
    }
}

fn aliases_for(spec: &ParamSpec) -> CompileResult<Vec<String>> {
    let mut aliases = Vec::new();
    for raw in std::iter::once(&spec.name).chain(spec.aliases.iter()) {
        let alias = if raw.starts_with('-') {
            raw.clone()
        } else {
            name_to_alias(raw)
        };
        validate_alias(&alias, &spec.name)?;
        if !aliases.contains(&alias) {
            aliases.push(alias);
        }
    }
    Ok(aliases)
}

fn validate_alias(alias: &str, param: &str) -> CompileResult<()> {
    let invalid = |reason: &str| -> CompileResult<()> {
        Err(SchemaError::InvalidAlias {
            alias: alias.to_string(),
            param: param.to_string(),
            reason: reason.to_string(),
        }
        .into())
    };

    let bare = alias.trim_start_matches('-');
    if bare.is_empty() {
        return invalid("alias is empty");
    }
    if alias.chars().any(char::is_whitespace) {
        return invalid("aliases may not contain whitespace");
    }
    if alias.starts_with("--") {
        if bare.contains('=') {
            return invalid("long aliases may not contain '='");
        }
        return Ok(());
    }
    let mut chars = bare.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_digit() => invalid("digits are not valid short aliases"),
        (Some(_), None) => Ok(()),
        _ => invalid("short aliases are a single character"),
    }
}

fn check_unique_aliases(params: &[Parameter]) -> CompileResult<()> {
    let mut owners: HashMap<&str, &str> = HashMap::new();
    for param in params {
        for alias in param.aliases.iter().chain(param.negated.iter()) {
            if let Some(other) = owners.insert(alias, &param.name) {
                return Err(SchemaError::DuplicateAlias {
                    alias: alias.clone(),
                    param: param.name.clone(),
                    other: other.to_string(),
                }
                .into());
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ParamSpec, Signature};

    #[test]
    fn given_short_digit_alias_when_validating_then_rejected() {
        assert!(validate_alias("-3", "x").is_err());
        assert!(validate_alias("-x", "x").is_ok());
        assert!(validate_alias("--two words", "x").is_err());
        assert!(validate_alias("-ab", "x").is_err());
    }

    #[test]
    fn given_help_alias_claimed_by_user_when_compiling_then_help_keeps_remaining_alias() {
        let sig = Signature::new("connect")
            .param(ParamSpec::keyword("host").alias("h").default("localhost"));

        let schema = compile(&sig).unwrap();

        let help = schema.get(HELP_PARAM).expect("help flag");
        assert_eq!(help.aliases, vec!["--help".to_string()]);
        assert_eq!(schema.find_alias("-h").unwrap().0.name, "host");
    }

    #[test]
    fn given_no_help_names_when_compiling_then_no_help_flag() {
        let registry = ConverterRegistry::with_builtins();
        let compiler = Compiler::with_options(
            &registry,
            CompileOptions {
                help_names: Vec::new(),
            },
        );
        let schema = compiler.compile(&Signature::new("bare")).unwrap();
        assert!(schema.is_empty());
    }
}
