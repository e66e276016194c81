//! Converter registry: maps a type tag to a string -> value coercion
//!
//! Built-ins cover `str`, `int`, `float` and `bool`. Extra converters are
//! registered at startup, before any signature compiles; the registry is
//! read-only afterwards and cheap to share.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::domain::error::{ConversionError, UnknownTypeError};
use crate::domain::parameter::Value;

type ConvertFn = dyn Fn(&str) -> Result<Value, ConversionError> + Send + Sync;

/// A resolved coercion function, tagged with the type it produces.
#[derive(Clone)]
pub struct Converter {
    tag: String,
    func: Arc<ConvertFn>,
}

impl Converter {
    pub fn new<F>(tag: impl Into<String>, func: F) -> Self
    where
        F: Fn(&str) -> Result<Value, ConversionError> + Send + Sync + 'static,
    {
        Self {
            tag: tag.into(),
            func: Arc::new(func),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Upper-case tag as shown in help (`--count=INT`).
    pub fn display_name(&self) -> String {
        self.tag.to_uppercase()
    }

    pub fn convert(&self, raw: &str) -> Result<Value, ConversionError> {
        (self.func)(raw)
    }
}

impl fmt::Debug for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Converter").field("tag", &self.tag).finish()
    }
}

// Two converters are the same grammar-wise when they carry the same tag.
impl PartialEq for Converter {
    fn eq(&self, other: &Self) -> bool {
        self.tag == other.tag
    }
}

/// Registry of converters keyed by type tag.
#[derive(Clone, Debug)]
pub struct ConverterRegistry {
    converters: HashMap<String, Converter>,
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl ConverterRegistry {
    /// Empty registry, without even the built-ins.
    pub fn empty() -> Self {
        Self {
            converters: HashMap::new(),
        }
    }

    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        registry.register("str", |raw| Ok(Value::Str(raw.to_string())));
        registry.register("int", convert_int);
        registry.register("float", convert_float);
        registry.register("bool", convert_bool);
        registry
    }

    /// Register (or replace) the converter for `tag`.
    pub fn register<F>(&mut self, tag: impl Into<String>, func: F) -> &mut Self
    where
        F: Fn(&str) -> Result<Value, ConversionError> + Send + Sync + 'static,
    {
        let tag = tag.into();
        tracing::trace!(tag = %tag, "register converter");
        self.converters
            .insert(tag.clone(), Converter::new(tag, func));
        self
    }

    pub fn resolve(&self, tag: &str) -> Result<Converter, UnknownTypeError> {
        self.converters
            .get(tag)
            .cloned()
            .ok_or_else(|| UnknownTypeError {
                tag: tag.to_string(),
                param: String::new(),
            })
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.converters.contains_key(tag)
    }
}

fn convert_int(raw: &str) -> Result<Value, ConversionError> {
    raw.parse::<i64>()
        .map(Value::Int)
        .map_err(|e| ConversionError::new(format!("{:?} is not an integer: {}", raw, e)))
}

fn convert_float(raw: &str) -> Result<Value, ConversionError> {
    raw.parse::<f64>()
        .map(Value::Float)
        .map_err(|e| ConversionError::new(format!("{:?} is not a number: {}", raw, e)))
}

fn convert_bool(raw: &str) -> Result<Value, ConversionError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(Value::Bool(true)),
        "false" | "no" | "off" | "0" => Ok(Value::Bool(false)),
        _ => Err(ConversionError::new(format!("{:?} is not a boolean", raw))),
    }
}
