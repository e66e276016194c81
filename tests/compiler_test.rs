//! Tests for the signature compiler

use rstest::rstest;

use sigcli::application::{compile, CompileOptions, Compiler};
use sigcli::domain::{
    CompileError, ConversionError, ConverterRegistry, ParamKind, ParamSpec, SchemaError,
    Signature, UnknownTypeError, Value,
};

fn schema_error(sig: &Signature) -> SchemaError {
    match compile(sig) {
        Err(CompileError::Schema(e)) => e,
        other => panic!("expected schema error, got {other:?}"),
    }
}

// ============================================================
// Kind mapping
// ============================================================

#[test]
fn given_mixed_signature_when_compiling_then_each_marker_maps_to_its_kind() {
    let sig = Signature::new("tool")
        .param(ParamSpec::positional("src"))
        .param(ParamSpec::positional("dst").default("."))
        .param(ParamSpec::keyword("verbose").default(false))
        .param(ParamSpec::keyword("level").default(2i64))
        .param(ParamSpec::keyword("token"))
        .param(ParamSpec::keyword("tag").repeatable())
        .param(ParamSpec::var_positional("extra"))
        .param(ParamSpec::var_keyword("options"));

    let schema = compile(&sig).expect("compile");

    let kind = |name: &str| schema.get(name).expect(name).kind;
    assert_eq!(kind("src"), ParamKind::Positional);
    assert_eq!(kind("dst"), ParamKind::Positional);
    assert_eq!(kind("verbose"), ParamKind::NamedFlag);
    assert_eq!(kind("level"), ParamKind::NamedValue);
    assert_eq!(kind("token"), ParamKind::NamedValue);
    assert_eq!(kind("tag"), ParamKind::NamedValueList);
    assert_eq!(kind("extra"), ParamKind::PositionalRest);
    assert_eq!(kind("options"), ParamKind::NamedValueMap);

    assert!(schema.get("src").unwrap().required);
    assert!(!schema.get("dst").unwrap().required);
    assert!(schema.get("token").unwrap().required);
    assert_eq!(schema.get("src").unwrap().position, Some(0));
    assert_eq!(schema.get("extra").unwrap().position, Some(2));
}

#[test]
fn given_true_default_when_compiling_then_negated_spelling_generated() {
    let sig = Signature::new("greet").param(ParamSpec::positional("dry_run").default(true));

    let schema = compile(&sig).unwrap();
    let flag = schema.get("dry_run").unwrap();

    assert_eq!(flag.aliases, vec!["--dry-run".to_string()]);
    assert_eq!(flag.negated.as_deref(), Some("--no-dry-run"));
    assert_eq!(schema.find_alias("--no-dry-run").map(|(p, plain)| (p.name.as_str(), plain)), Some(("dry_run", false)));
}

#[test]
fn given_false_default_when_compiling_then_no_negated_spelling() {
    let sig = Signature::new("x").param(ParamSpec::keyword("v").alias("verbose").default(false));

    let flag = compile(&sig).unwrap().get("v").cloned().unwrap();

    assert_eq!(flag.aliases, vec!["-v".to_string(), "--verbose".to_string()]);
    assert_eq!(flag.negated, None);
}

#[rstest]
#[case(ParamSpec::keyword("n").default(3i64), "int")]
#[case(ParamSpec::keyword("ratio").default(0.5), "float")]
#[case(ParamSpec::keyword("name").default("x"), "str")]
#[case(ParamSpec::keyword("raw"), "str")]
#[case(ParamSpec::keyword("port").annotation("int"), "int")]
#[case(ParamSpec::keyword("nums").default(vec![1i64]), "int")]
fn given_default_or_annotation_when_compiling_then_converter_inferred(
    #[case] spec: ParamSpec,
    #[case] tag: &str,
) {
    let name = spec.name.clone();
    let schema = compile(&Signature::new("x").param(spec)).unwrap();
    assert_eq!(schema.get(&name).unwrap().converter.tag(), tag);
}

#[test]
fn given_list_default_when_compiling_then_list_kind_keeps_default() {
    let sig = Signature::new("x").param(ParamSpec::keyword("tag").default(vec!["a", "b"]));

    let param = compile(&sig).unwrap().get("tag").cloned().unwrap();

    assert_eq!(param.kind, ParamKind::NamedValueList);
    assert_eq!(param.default, Value::from(vec!["a", "b"]));
}

// ============================================================
// Invariant violations
// ============================================================

#[test]
fn given_required_after_optional_positional_when_compiling_then_schema_error() {
    let sig = Signature::new("x")
        .param(ParamSpec::positional("a").default(1i64))
        .param(ParamSpec::positional("b"));

    assert_eq!(
        schema_error(&sig),
        SchemaError::RequiredAfterOptional {
            param: "b".into(),
            after: "a".into()
        }
    );
}

#[test]
fn given_duplicate_names_when_compiling_then_schema_error() {
    let sig = Signature::new("x")
        .param(ParamSpec::positional("a"))
        .param(ParamSpec::keyword("a").default(1i64));

    assert_eq!(schema_error(&sig), SchemaError::DuplicateName("a".into()));
}

#[test]
fn given_colliding_aliases_when_compiling_then_duplicate_alias() {
    let sig = Signature::new("x")
        .param(ParamSpec::keyword("verbose").alias("v").default(false))
        .param(ParamSpec::keyword("version").alias("v").default(false));

    assert!(matches!(
        schema_error(&sig),
        SchemaError::DuplicateAlias { ref alias, .. } if alias == "-v"
    ));
}

#[test]
fn given_negated_spelling_colliding_when_compiling_then_duplicate_alias() {
    let sig = Signature::new("x")
        .param(ParamSpec::keyword("color").default(true))
        .param(ParamSpec::keyword("no_color").default(false));

    assert!(matches!(
        schema_error(&sig),
        SchemaError::DuplicateAlias { ref alias, .. } if alias == "--no-color"
    ));
}

#[test]
fn given_two_catch_all_positionals_when_compiling_then_duplicate_catch_all() {
    let sig = Signature::new("x")
        .param(ParamSpec::var_positional("a"))
        .param(ParamSpec::var_positional("b"));

    assert!(matches!(schema_error(&sig), SchemaError::DuplicateCatchAll { .. }));
}

#[test]
fn given_two_keyword_catch_alls_when_compiling_then_duplicate_catch_all() {
    let sig = Signature::new("x")
        .param(ParamSpec::var_keyword("env"))
        .param(ParamSpec::var_keyword("extra"));

    assert_eq!(
        schema_error(&sig),
        SchemaError::DuplicateCatchAll {
            param: "extra".into(),
            other: "env".into(),
        }
    );
}

#[test]
fn given_one_catch_all_of_each_kind_when_compiling_then_accepted() {
    let sig = Signature::new("x")
        .param(ParamSpec::var_positional("args"))
        .param(ParamSpec::var_keyword("env"));

    let schema = compile(&sig).expect("compile");

    assert_eq!(schema.rest().map(|p| p.name.as_str()), Some("args"));
    assert_eq!(schema.catch_all_named().map(|p| p.name.as_str()), Some("env"));
}

#[test]
fn given_positional_after_catch_all_when_compiling_then_schema_error() {
    let sig = Signature::new("x")
        .param(ParamSpec::var_positional("rest"))
        .param(ParamSpec::positional("late"));

    assert_eq!(
        schema_error(&sig),
        SchemaError::PositionalAfterRest {
            param: "late".into(),
            rest: "rest".into()
        }
    );
}

#[rstest]
#[case("3")]
#[case("two words")]
#[case("")]
fn given_invalid_extra_alias_when_compiling_then_invalid_alias(#[case] alias: &str) {
    let sig = Signature::new("x").param(ParamSpec::keyword("count").alias(alias).default(1i64));

    assert!(matches!(schema_error(&sig), SchemaError::InvalidAlias { ref param, .. } if param == "count"));
}

#[test]
fn given_default_on_catch_all_when_compiling_then_invalid_default() {
    let sig = Signature::new("x").param(ParamSpec::var_positional("rest").default(vec!["a"]));

    assert!(matches!(schema_error(&sig), SchemaError::InvalidDefault { .. }));
}

#[test]
fn given_unregistered_annotation_when_compiling_then_unknown_type_names_param() {
    let sig = Signature::new("x").param(ParamSpec::positional("when").annotation("date"));

    assert_eq!(
        compile(&sig).unwrap_err(),
        CompileError::UnknownType(UnknownTypeError {
            tag: "date".into(),
            param: "when".into()
        })
    );
}

// ============================================================
// Registry, options and determinism
// ============================================================

#[test]
fn given_custom_converter_when_compiling_then_annotation_resolves() {
    let mut registry = ConverterRegistry::with_builtins();
    registry.register("upper", |raw| Ok(Value::Str(raw.to_uppercase())));
    registry.register("even", |raw| {
        let n: i64 = raw.parse().map_err(|_| ConversionError::new("not a number"))?;
        if n % 2 == 0 {
            Ok(Value::Int(n))
        } else {
            Err(ConversionError::new(format!("{n} is odd")))
        }
    });
    let sig = Signature::new("x")
        .param(ParamSpec::positional("word").annotation("upper"))
        .param(ParamSpec::positional("n").annotation("even"));

    let schema = Compiler::new(&registry).compile(&sig).unwrap();

    let word = schema.get("word").unwrap();
    assert_eq!(word.converter.convert("abc").unwrap(), Value::from("ABC"));
    assert!(schema.get("n").unwrap().converter.convert("3").is_err());
}

#[test]
fn given_custom_help_names_when_compiling_then_help_uses_them() {
    let registry = ConverterRegistry::with_builtins();
    let options = CompileOptions {
        help_names: vec!["usage".into(), "?".into()],
    };

    let schema = Compiler::with_options(&registry, options)
        .compile(&Signature::new("x"))
        .unwrap();

    assert_eq!(schema.help_aliases(), vec!["--usage", "-?"]);
}

#[test]
fn given_user_param_named_help_when_compiling_then_no_synthesized_help() {
    let sig = Signature::new("x").param(ParamSpec::keyword("help").default("topic"));

    let schema = compile(&sig).unwrap();

    assert!(schema.help_aliases().is_empty());
    assert_eq!(schema.get("help").unwrap().kind, ParamKind::NamedValue);
}

#[test]
fn given_same_signature_when_compiling_twice_then_schemas_equal() {
    let sig = Signature::new("x")
        .param(ParamSpec::positional("a"))
        .param(ParamSpec::keyword("b").default(false))
        .summary("does x")
        .handler(|_| Ok(Value::None));

    assert_eq!(compile(&sig).unwrap(), compile(&sig).unwrap());
}
