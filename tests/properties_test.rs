//! Property-based tests: compile determinism and unparse/parse round-trips

use std::collections::BTreeMap;

use proptest::prelude::*;

use sigcli::application::{compile, parse};
use sigcli::domain::{BoundCall, ParamSpec, Schema, Signature, Value};

fn copy_signature() -> Signature {
    Signature::new("copy")
        .param(ParamSpec::positional("src"))
        .param(ParamSpec::positional("dst").default("."))
        .param(ParamSpec::keyword("loud").default(true))
        .param(ParamSpec::keyword("count").default(0i64))
        .param(ParamSpec::keyword("tag").alias("t").repeatable())
        .param(ParamSpec::var_positional("more"))
        .param(ParamSpec::var_keyword("extra"))
}

fn copy_schema() -> Schema {
    compile(&copy_signature()).expect("compile")
}

fn word() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9]{0,6}"
}

fn call_strategy() -> impl Strategy<Value = BoundCall> {
    (
        word(),
        word(),
        any::<bool>(),
        any::<i64>(),
        prop::collection::vec(word(), 0..4),
        prop::collection::vec(word(), 0..4),
        prop::collection::btree_map("k[a-z]{1,5}", word(), 0..3),
    )
        .prop_map(|(src, dst, loud, count, tags, more, extra)| {
            let extra: BTreeMap<String, Value> =
                extra.into_iter().map(|(k, v)| (k, Value::Str(v))).collect();
            BoundCall::new(Vec::new())
                .with("src", src)
                .with("dst", dst)
                .with("loud", loud)
                .with("count", count)
                .with("tag", tags)
                .with("more", more)
                .with("extra", Value::Map(extra))
        })
}

proptest! {
    #[test]
    fn given_any_call_when_unparsed_then_parses_back_to_same_call(call in call_strategy()) {
        let schema = copy_schema();

        let tokens = schema.unparse(&call);
        let parsed = parse(&schema, &tokens)
            .map_err(|e| TestCaseError::fail(format!("{e} for {tokens:?}")))?
            .into_call();

        prop_assert_eq!(parsed, Some(call));
    }

    #[test]
    fn given_same_signature_when_compiled_twice_then_schemas_equal(names in prop::collection::btree_set("[a-z]{2,8}", 1..6)) {
        let sig = names
            .iter()
            .fold(Signature::new("gen"), |sig, name| sig.param(ParamSpec::keyword(name.as_str()).default(false)));

        let first = compile(&sig);
        let second = compile(&sig);

        prop_assert_eq!(first.is_ok(), second.is_ok());
        if let (Ok(a), Ok(b)) = (first, second) {
            prop_assert_eq!(a, b);
        }
    }
}
