//! Schema sources: explicit descriptors of a function's parameter list
//!
//! A `Signature` is built once at startup and stands in for runtime
//! reflection. Anything implementing `SchemaSource` can feed the compiler.

use std::fmt;
use std::sync::Arc;

use crate::domain::bound::BoundCall;
use crate::domain::parameter::Value;

/// Error raised by a target handler. Passed through to the caller untouched.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// `Value::None` means "nothing to print".
pub type HandlerResult = Result<Value, HandlerError>;

/// The callable a schema dispatches to.
pub type Handler = Arc<dyn Fn(&BoundCall) -> HandlerResult + Send + Sync>;

/// Build a `Handler` from a closure.
pub fn handler<F>(f: F) -> Handler
where
    F: Fn(&BoundCall) -> HandlerResult + Send + Sync + 'static,
{
    Arc::new(f)
}

/// How a parameter was declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamMarker {
    PositionalOrKeyword,
    KeywordOnly,
    /// `*args`-style catch-all
    VarPositional,
    /// `**kwargs`-style catch-all
    VarKeyword,
}

/// One declared parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSpec {
    pub name: String,
    pub marker: ParamMarker,
    pub default: Option<Value>,
    pub annotation: Option<String>,
    /// Extra names; `n` becomes `-n`, `name` becomes `--name`
    pub aliases: Vec<String>,
    pub repeatable: bool,
    pub description: String,
}

impl ParamSpec {
    fn new(name: impl Into<String>, marker: ParamMarker) -> Self {
        Self {
            name: name.into(),
            marker,
            default: None,
            annotation: None,
            aliases: Vec::new(),
            repeatable: false,
            description: String::new(),
        }
    }

    pub fn positional(name: impl Into<String>) -> Self {
        Self::new(name, ParamMarker::PositionalOrKeyword)
    }

    pub fn keyword(name: impl Into<String>) -> Self {
        Self::new(name, ParamMarker::KeywordOnly)
    }

    pub fn var_positional(name: impl Into<String>) -> Self {
        Self::new(name, ParamMarker::VarPositional)
    }

    pub fn var_keyword(name: impl Into<String>) -> Self {
        Self::new(name, ParamMarker::VarKeyword)
    }

    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn annotation(mut self, tag: impl Into<String>) -> Self {
        self.annotation = Some(tag.into());
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Keyword parameter that may be given several times.
    pub fn repeatable(mut self) -> Self {
        self.repeatable = true;
        self
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = text.into();
        self
    }
}

/// A named action triggered by its own flag, e.g. `--version`.
#[derive(Clone)]
pub struct Alternate {
    pub name: String,
    pub description: String,
    pub handler: Handler,
}

impl fmt::Debug for Alternate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Alternate")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish()
    }
}

/// Capability the compiler consumes: ordered parameter descriptors plus
/// the documentation and callable that go with them.
pub trait SchemaSource {
    fn name(&self) -> &str;

    fn parameters(&self) -> &[ParamSpec];

    /// Description paragraphs; the first one is the summary.
    fn description(&self) -> &[String] {
        &[]
    }

    fn footnotes(&self) -> &[String] {
        &[]
    }

    fn handler(&self) -> Option<Handler> {
        None
    }

    fn alternates(&self) -> &[Alternate] {
        &[]
    }
}

/// Explicit descriptor of a function signature.
#[derive(Clone, Default)]
pub struct Signature {
    name: String,
    params: Vec<ParamSpec>,
    description: Vec<String>,
    footnotes: Vec<String>,
    handler: Option<Handler>,
    alternates: Vec<Alternate>,
}

impl Signature {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn param(mut self, spec: ParamSpec) -> Self {
        self.params.push(spec);
        self
    }

    pub fn summary(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        if self.description.is_empty() {
            self.description.push(text);
        } else {
            self.description[0] = text;
        }
        self
    }

    pub fn paragraph(mut self, text: impl Into<String>) -> Self {
        self.description.push(text.into());
        self
    }

    pub fn footnote(mut self, text: impl Into<String>) -> Self {
        self.footnotes.push(text.into());
        self
    }

    /// Attach a description to an already declared parameter.
    pub fn describe(mut self, param: &str, text: impl Into<String>) -> Self {
        if let Some(spec) = self.params.iter_mut().find(|p| p.name == param) {
            spec.description = text.into();
        }
        self
    }

    pub fn handler<F>(mut self, f: F) -> Self
    where
        F: Fn(&BoundCall) -> HandlerResult + Send + Sync + 'static,
    {
        self.handler = Some(Arc::new(f));
        self
    }

    pub fn with_handler(mut self, handler: Handler) -> Self {
        self.handler = Some(handler);
        self
    }

    pub fn alternate<F>(mut self, name: impl Into<String>, description: impl Into<String>, f: F) -> Self
    where
        F: Fn(&BoundCall) -> HandlerResult + Send + Sync + 'static,
    {
        self.alternates.push(Alternate {
            name: name.into(),
            description: description.into(),
            handler: Arc::new(f),
        });
        self
    }

    /// Run a signature transformer over `self`.
    pub fn apply<T>(self, transform: T) -> Self
    where
        T: FnOnce(Signature) -> Signature,
    {
        transform(self)
    }

    pub fn params_mut(&mut self) -> &mut Vec<ParamSpec> {
        &mut self.params
    }

    pub fn current_handler(&self) -> Option<&Handler> {
        self.handler.as_ref()
    }
}

impl SchemaSource for Signature {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> &[ParamSpec] {
        &self.params
    }

    fn description(&self) -> &[String] {
        &self.description
    }

    fn footnotes(&self) -> &[String] {
        &self.footnotes
    }

    fn handler(&self) -> Option<Handler> {
        self.handler.clone()
    }

    fn alternates(&self) -> &[Alternate] {
        &self.alternates
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signature")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("description", &self.description)
            .field("footnotes", &self.footnotes)
            .field("has_handler", &self.handler.is_some())
            .field("alternates", &self.alternates)
            .finish()
    }
}
