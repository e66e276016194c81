//! Signature transformers
//!
//! A transformer is a plain function from `Signature` to `Signature`, so
//! they compose like any other function and stay reusable across targets.

use std::sync::Arc;

use tracing::debug;

use crate::domain::{handler, BoundCall, Handler, HandlerResult, ParamSpec, SchemaSource, Signature};

/// Reusable `Signature -> Signature` rewrite.
pub type Transform = Arc<dyn Fn(Signature) -> Signature + Send + Sync>;

/// Append a parameter.
pub fn with_parameter(spec: ParamSpec) -> Transform {
    Arc::new(move |sig: Signature| sig.param(spec.clone()))
}

/// Wrap the target handler. `wrapper` receives the bound call and the
/// handler it replaces.
///
/// A signature without a handler is returned unchanged.
pub fn wrap<W>(wrapper: W) -> Transform
where
    W: Fn(&BoundCall, &Handler) -> HandlerResult + Send + Sync + 'static,
{
    let wrapper = Arc::new(wrapper);
    Arc::new(move |sig: Signature| {
        let Some(inner) = sig.current_handler().cloned() else {
            debug!(command = sig.name(), "nothing to wrap");
            return sig;
        };
        let wrapper = Arc::clone(&wrapper);
        sig.with_handler(handler(move |call| wrapper(call, &inner)))
    })
}

/// Add an alternate action such as `--version`.
pub fn with_alternate(name: impl Into<String>, description: impl Into<String>, action: Handler) -> Transform {
    let name = name.into();
    let description = description.into();
    Arc::new(move |sig: Signature| {
        let action = Arc::clone(&action);
        sig.alternate(name.clone(), description.clone(), move |call| action(call))
    })
}

/// Apply `transforms` left to right.
pub fn compose<I>(transforms: I) -> Transform
where
    I: IntoIterator<Item = Transform>,
{
    let transforms: Vec<Transform> = transforms.into_iter().collect();
    Arc::new(move |sig: Signature| transforms.iter().fold(sig, |sig, t| t(sig)))
}
