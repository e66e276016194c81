//! sigcli: command-line interfaces derived from function signatures
//!
//! Layers, inner to outer:
//! - `domain`: parameter model, schema sources, converters, compiled schemas
//! - `application`: signature compiler, token parser, dispatcher, transformers
//! - `cli`: documentation, help rendering, output and the runner
//!
//! ```no_run
//! use sigcli::cli::{compile_with, Runner};
//! use sigcli::config::Settings;
//! use sigcli::domain::{ParamSpec, Signature, Value};
//!
//! let sig = Signature::new("greet")
//!     .param(ParamSpec::positional("name"))
//!     .param(ParamSpec::keyword("capitalize").default(true))
//!     .handler(|call| Ok(Value::from(format!("Hello {}", call.str("name").unwrap_or("")))));
//! let schema = compile_with(&sig, &Settings::default()).expect("compiles");
//! let code = Runner::new(schema).run(&["john"], &mut std::io::stdout(), &mut std::io::stderr());
//! std::process::exit(code);
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod util;
