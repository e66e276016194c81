//! Tests for signature transformers

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use sigcli::application::{compile, compose, parse, with_alternate, with_parameter, wrap, ParseOutcome};
use sigcli::domain::{handler, ParamSpec, SchemaSource, Signature, Value};

fn base() -> Signature {
    Signature::new("show")
        .param(ParamSpec::positional("item"))
        .handler(|call| Ok(Value::from(call.str("item").unwrap_or_default())))
}

#[test]
fn given_added_parameter_when_compiled_then_grammar_includes_it() {
    let sig = base().apply(|s| with_parameter(ParamSpec::keyword("loud").default(false))(s));

    let schema = compile(&sig).unwrap();
    let call = parse(&schema, &["--loud", "x"]).unwrap().into_call().unwrap();

    assert!(call.flag("loud"));
    assert_eq!(call.str("item"), Some("x"));
}

#[test]
fn given_wrapper_reading_added_param_when_invoked_then_output_decorated() {
    let loud = compose([
        with_parameter(ParamSpec::keyword("loud").default(false)),
        wrap(|call, inner| {
            let value = inner(call)?;
            match (call.flag("loud"), value) {
                (true, Value::Str(s)) => Ok(Value::Str(s.to_uppercase())),
                (_, other) => Ok(other),
            }
        }),
    ]);
    let schema = compile(&loud(base())).unwrap();

    let call = parse(&schema, &["--loud", "hi"]).unwrap().into_call().unwrap();

    assert_eq!(schema.invoke(&call).unwrap(), Value::from("HI"));
}

#[test]
fn given_same_transform_when_applied_to_two_signatures_then_each_wrapped_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let counted = wrap(move |call, inner| {
        counter.fetch_add(1, Ordering::SeqCst);
        inner(call)
    });

    let a = compile(&counted(base())).unwrap();
    let b = compile(&counted(base())).unwrap();
    let call = parse(&a, &["x"]).unwrap().into_call().unwrap();
    a.invoke(&call).unwrap();
    b.invoke(&call).unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn given_alternate_transform_when_flag_given_then_alternate_outcome() {
    let versioned = with_alternate("version", "Show version", handler(|_| Ok(Value::from("2.0"))));
    let sig = versioned(base());

    assert_eq!(sig.alternates().len(), 1);
    let schema = compile(&sig).unwrap();
    assert_eq!(
        parse(&schema, &["--version"]).unwrap(),
        ParseOutcome::Alternate("version".into())
    );
}

#[test]
fn given_composition_when_applied_then_order_is_left_to_right() {
    let both = compose([
        with_parameter(ParamSpec::keyword("first").default(1i64)),
        with_parameter(ParamSpec::keyword("second").default(2i64)),
    ]);

    let sig = both(Signature::new("x"));

    let names: Vec<&str> = sig.parameters().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["first", "second"]);
}
