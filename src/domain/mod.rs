//! Domain layer: parameter model, schema sources, converters and schemas
//!
//! This layer is independent of external concerns (no I/O, no printing, no config loading).

pub mod bound;
pub mod converter;
pub mod error;
pub mod parameter;
pub mod schema;
pub mod signature;

pub use bound::BoundCall;
pub use converter::{Converter, ConverterRegistry};
pub use error::{CompileError, CompileResult, ConversionError, SchemaError, UnknownTypeError};
pub use parameter::{alias_to_name, name_to_alias, Action, ParamKind, Parameter, Value};
pub use schema::Schema;
pub use signature::{
    handler, Alternate, Handler, HandlerError, HandlerResult, ParamMarker, ParamSpec, SchemaSource,
    Signature,
};
