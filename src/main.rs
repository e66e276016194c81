use std::io;
use std::path::Path;
use std::process;

use colored::Colorize;
use tracing::debug;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

use sigcli::application::{compose, with_alternate, wrap, CommandTable, Transform};
use sigcli::cli::{compile_with, CliError, CliResult, Docs, Runner, SignatureDocsExt};
use sigcli::config::Settings;
use sigcli::domain::{handler, BoundCall, HandlerResult, ParamSpec, Signature, Value};

const GREET_DOCS: &str = "
Greet someone.

name: who to greet

capitalize: uppercase the first letter of the name

repeat: how many times to greet

Greetings go to standard output, one per line.
";

fn main() {
    let settings = match Settings::load(None) {
        Ok(settings) => settings,
        Err(e) => {
            let e = CliError::from(e);
            report(&e);
            process::exit(e.exit_code());
        }
    };
    setup_logging(&settings.log_level);

    let mut argv = std::env::args();
    let prog = argv
        .next()
        .as_deref()
        .and_then(|p| Path::new(p).file_name())
        .and_then(|n| n.to_str())
        .map(String::from)
        .unwrap_or_else(|| "sigcli".to_string());
    let args: Vec<String> = argv.collect();

    let table = match build_table(&settings) {
        Ok(table) => table,
        Err(e) => {
            report(&e);
            process::exit(e.exit_code());
        }
    };

    let code = Runner::new(table)
        .prog(prog)
        .settings(settings)
        .run(&args, &mut io::stdout(), &mut io::stderr());
    debug!(code, "exiting");
    process::exit(code);
}

fn build_table(settings: &Settings) -> CliResult<CommandTable> {
    let common = common_transforms();
    let compile = |sig: Signature| compile_with(&common(sig), settings);

    let calc = CommandTable::new("calc")
        .summary_text("Small arithmetic helpers")
        .command(compile(add_signature())?)
        .command(compile(sum_signature())?);

    Ok(CommandTable::new("sigcli")
        .summary_text("Demo commands built from function signatures")
        .command(compile(greet_signature())?)
        .command(compile(echo_signature())?)
        .command(compile(env_signature())?)
        .command(compile(config_signature(settings.clone()))?)
        .group(calc)
        .default_command("greet")
        .footnote("Set RUST_LOG=sigcli=debug to trace parsing and dispatch."))
}

/// `--version` on every command, plus a debug trace around each handler.
fn common_transforms() -> Transform {
    compose([
        with_alternate(
            "version",
            "Show the version and exit",
            handler(|_| Ok(Value::from(env!("CARGO_PKG_VERSION")))),
        ),
        wrap(|call, inner| {
            debug!(path = ?call.path(), "invoking");
            inner(call)
        }),
    ])
}

fn greet_signature() -> Signature {
    Signature::new("greet")
        .param(ParamSpec::positional("name").default("world"))
        .param(ParamSpec::keyword("capitalize").alias("c").default(true))
        .param(ParamSpec::keyword("repeat").alias("r").default(1i64))
        .docs(&Docs::parse(GREET_DOCS))
        .handler(greet)
}

fn greet(call: &BoundCall) -> HandlerResult {
    let name = call.str("name").ok_or("name is not a string")?;
    let name = if call.flag("capitalize") {
        capitalize(name)
    } else {
        name.to_string()
    };
    let repeat = call.int("repeat").unwrap_or(1);
    if repeat < 0 {
        return Err(format!("repeat must not be negative, got {repeat}").into());
    }
    let lines: Vec<Value> = (0..repeat).map(|_| Value::from(format!("Hello {name}!"))).collect();
    Ok(Value::List(lines))
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn echo_signature() -> Signature {
    Signature::new("echo")
        .summary("Print the words given, joined by a separator")
        .param(ParamSpec::var_positional("words").description("words to print"))
        .param(ParamSpec::keyword("sep").alias("s").default(" ").description("separator"))
        .param(ParamSpec::keyword("upper").alias("u").default(false).description("uppercase the output"))
        .handler(|call| {
            let sep = call.str("sep").unwrap_or(" ");
            let text = call.list("words").iter().map(|w| w.to_string()).collect::<Vec<_>>().join(sep);
            Ok(Value::from(if call.flag("upper") { text.to_uppercase() } else { text }))
        })
}

fn env_signature() -> Signature {
    Signature::new("env")
        .summary("Print arbitrary --key value pairs as KEY=value")
        .param(ParamSpec::var_keyword("vars"))
        .handler(|call| {
            let lines = call
                .map("vars")
                .into_iter()
                .flatten()
                .map(|(k, v)| Value::from(format!("{}={}", k.to_uppercase(), v)))
                .collect::<Vec<_>>();
            Ok(Value::List(lines))
        })
}

fn config_signature(settings: Settings) -> Signature {
    Signature::new("config")
        .summary("Show the effective settings")
        .param(ParamSpec::keyword("template").alias("t").default(false))
        .describe("template", "print a commented template instead")
        .handler(move |call| {
            if call.flag("template") {
                return Ok(Value::from(Settings::template()));
            }
            let rendered = settings.to_toml()?;
            Ok(Value::from(rendered))
        })
}

fn add_signature() -> Signature {
    Signature::new("add")
        .summary("Add two integers")
        .param(ParamSpec::positional("a").annotation("int"))
        .param(ParamSpec::positional("b").annotation("int"))
        .handler(|call| {
            let a = call.int("a").ok_or("a is not an integer")?;
            let b = call.int("b").ok_or("b is not an integer")?;
            let sum = a.checked_add(b).ok_or("integer overflow")?;
            Ok(Value::Int(sum))
        })
}

fn sum_signature() -> Signature {
    Signature::new("sum")
        .summary("Sum any number of floats")
        .param(ParamSpec::var_positional("numbers").annotation("float"))
        .handler(|call| {
            let total: f64 = call.list("numbers").iter().filter_map(Value::as_float).sum();
            Ok(Value::Float(total))
        })
}

fn setup_logging(fallback: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    // Create a subscriber with formatted output directed to stderr
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .with_span_events(FmtSpan::CLOSE);

    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(filter))
        .init();
}

fn report(e: &CliError) {
    eprintln!("{}", format!("Error: {}", e).red());
}
