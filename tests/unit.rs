//! Unit tests for core Tenkan types.
mod common;
use common::*;
use serde_json::json;
use ahash::AHashSet;
use tenkan::ast::{ExpressionTree, VariablePath};
use tenkan::prelude::*;
use tenkan::store::PathLookup;

#[test]
fn test_value_display() {
    assert_eq!(format!("{}", Value::Integer(42)), "42");
    assert_eq!(format!("{}", Value::Number(42.0)), "42.0");
    assert_eq!(format!("{}", Value::Number(2.5)), "2.5");
    assert_eq!(format!("{}", Value::Number(-0.5)), "-0.5");
    assert_eq!(format!("{}", Value::Bool(true)), "True");
    assert_eq!(format!("{}", Value::Bool(false)), "False");
    assert_eq!(format!("{}", Value::Absent), "");
    assert_eq!(format!("{}", Value::from("plain")), "plain");
}

#[test]
fn test_value_display_of_extreme_floats() {
    assert_eq!(format!("{}", Value::Number(1e16)), "1e+16");
    assert_eq!(format!("{}", Value::Number(2.5e-5)), "2.5e-05");
    assert_eq!(format!("{}", Value::Number(0.0001)), "0.0001");
    assert_eq!(format!("{}", Value::Number(f64::NAN)), "nan");
    assert_eq!(format!("{}", Value::Number(f64::NEG_INFINITY)), "-inf");
}

#[test]
fn test_value_display_of_containers() {
    assert_eq!(format!("{}", Value::from(json!({ "k": "v" }))), "{'k': 'v'}");
    assert_eq!(
        format!("{}", Value::from(json!({ "b": [1, 2.0], "a": null }))),
        "{'a': None, 'b': [1, 2.0]}"
    );
    assert_eq!(
        format!("{}", Value::from(json!(["x", 2, true]))),
        "['x', 2, True]"
    );
    assert_eq!(
        format!("{}", Value::from(json!(["it's", "a\\b"]))),
        r#"["it's", 'a\\b']"#
    );
    assert_eq!(format!("{}", Value::List(vec![])), "[]");
}

#[test]
fn test_value_literal_quotes_text() {
    assert_eq!(Value::from("x").literal(), "\"x\"");
    assert_eq!(Value::Absent.literal(), "null");
    assert_eq!(Value::Integer(5).literal(), "5");
    assert_eq!(Value::Number(5.0).literal(), "5.0");
    assert_eq!(Value::Bool(false).literal(), "false");
}

#[test]
fn test_value_json_mapping() {
    assert_eq!(Value::from(json!(null)), Value::Absent);
    assert_eq!(Value::from(json!(10)), Value::Integer(10));
    assert_eq!(Value::from(json!(10.0)), Value::Number(10.0));
    assert_eq!(serde_json::to_value(Value::Integer(3)).unwrap(), json!(3));
    assert_eq!(serde_json::to_value(Value::Number(3.0)).unwrap(), json!(3.0));
    assert_eq!(
        serde_json::to_value(Value::Number(f64::NAN)).unwrap(),
        json!(null)
    );
    let parsed: Value = serde_json::from_str(r#"{"tags": ["a", "b"], "ok": true}"#).unwrap();
    assert_eq!(parsed.get("ok"), Some(&Value::Bool(true)));
    assert_eq!(
        parsed.get("tags").and_then(Value::as_list).map(|l| l.len()),
        Some(2)
    );
}

#[test]
fn test_value_truthiness() {
    assert!(!Value::Absent.is_truthy());
    assert!(!Value::from("").is_truthy());
    assert!(Value::from("no").is_truthy());
    assert!(!Value::Number(0.0).is_truthy());
    assert!(!Value::Integer(0).is_truthy());
    assert!(Value::Integer(-1).is_truthy());
    assert!(!Value::List(vec![]).is_truthy());
    assert!(Value::from(json!({ "k": null })).is_truthy());
}

#[test]
fn test_large_integers_stay_exact() {
    let id = 9_007_199_254_740_993_i64; // 2^53 + 1
    let parsed: Value = serde_json::from_str("9007199254740993").unwrap();

    assert_eq!(parsed, Value::Integer(id));
    assert_eq!(parsed.as_i64(), Some(id));
    assert_eq!(parsed.to_string(), "9007199254740993");
    assert_eq!(serde_json::to_string(&parsed).unwrap(), "9007199254740993");

    // Beyond i64 the value can only be kept approximately.
    let huge: Value = serde_json::from_str("18446744073709551615").unwrap();
    assert!(matches!(huge, Value::Number(_)));
}

#[test]
fn test_loose_equality_across_number_kinds() {
    assert!(Value::Integer(10).loosely_equals(&Value::Number(10.0)));
    assert!(Value::Number(10.0).loosely_equals(&Value::Integer(10)));
    assert!(!Value::Integer(10).loosely_equals(&Value::Number(10.5)));
    assert!(!Value::Integer(10).loosely_equals(&Value::from("10")));
    assert_ne!(Value::Integer(10), Value::Number(10.0));
}

#[test]
fn test_variable_path_parsing() {
    let path = VariablePath::parse(" basic_info.achievement_name ").unwrap();
    assert_eq!(path.root(), "basic_info");
    assert_eq!(path.rest(), ["achievement_name".to_string()]);
    assert_eq!(path.to_string(), "{{basic_info.achievement_name}}");

    assert!(VariablePath::parse("").is_none());
    assert!(VariablePath::parse("a..b").is_none());
    assert!(VariablePath::parse("a.").is_none());
}

#[test]
fn test_store_lookup_outcomes() {
    let mut store = store_with(json!({ "basic_info": { "name": "X", "tags": ["a"] } }));
    store.declare("pending");

    let found = store.lookup(&VariablePath::parse("basic_info.name").unwrap());
    assert_eq!(found, PathLookup::Found(&Value::from("X")));
    assert_eq!(
        store.lookup(&VariablePath::parse("pending").unwrap()),
        PathLookup::Unset
    );
    assert_eq!(
        store.lookup(&VariablePath::parse("basic_info.missing").unwrap()),
        PathLookup::Unknown
    );
    // Descending through a non-map fails.
    assert_eq!(
        store.lookup(&VariablePath::parse("basic_info.name.first").unwrap()),
        PathLookup::Unknown
    );
}

#[test]
fn test_store_merge_only_touches_declared_names() {
    let mut store = VariableStore::with_declarations(["score", "notes"]);
    let updated = store.merge_declared(&values(json!({ "score": 7, "intruder": "x" })));

    assert_eq!(updated, 1);
    assert_eq!(store.get("score"), &Value::Integer(7));
    assert_eq!(store.get("intruder"), &Value::Absent);
    assert!(!store.is_declared("intruder"));
    assert_eq!(store.get("notes"), &Value::Absent);
}

#[test]
fn test_redeclaring_keeps_one_entry_in_order() {
    let mut store = VariableStore::with_declarations(["b", "a", "c"]);
    store.set("a", "filled");
    store.declare("a");
    store.declare("d");

    assert_eq!(store.declared(), ["b", "a", "c", "d"]);
    assert!(store.is_declared("a"));
    assert!(!store.is_declared("e"));
    assert_eq!(store.get("a"), &Value::Absent);
}

#[test]
fn test_expression_required_variables() {
    let expr = compile("{{a.b}} == 'x' and not ({{c}} contains 1 or {{a}} != '')").unwrap();
    let mut names = AHashSet::new();
    expr.required_variables(&mut names);
    assert_eq!(names.len(), 2);
    assert!(names.contains("a"));
    assert!(names.contains("c"));
}

#[test]
fn test_trace_formatter_short_circuit() {
    let trace = EvaluationTrace::BinaryOp {
        op_symbol: "or",
        left: Box::new(EvaluationTrace::Leaf {
            source: "true".to_string(),
            value: Value::Bool(true),
        }),
        right: Box::new(EvaluationTrace::NotEvaluated),
        outcome: Value::Bool(true),
    };

    let formatted = TraceFormatter::format_trace(&trace);
    assert_eq!(formatted, "true"); // Should only show the decisive part
}

#[test]
fn test_trace_formatter_shows_resolved_variables() {
    let store = store_with(json!({ "owner": "student", "stage": "concept" }));
    let trace = Evaluator::new(&store)
        .evaluate_source("{{owner}} == 'student' and ({{stage}} == 'pilot' or true)")
        .unwrap();

    assert_eq!(
        TraceFormatter::format_trace(&trace),
        r#"{{owner}} (was "student") == "student" and ({{stage}} (was "concept") == "pilot" or true)"#
    );
}

#[test]
fn test_expression_tree_display() {
    let expr = compile("not {{a}} == 1").unwrap();
    let rendered = format!("{}", ExpressionTree(&expr));
    let expected = "└── not\n    └── ==\n        ├── Variable: {{a}}\n        └── Literal: 1\n";
    assert_eq!(rendered, expected);
}

#[test]
fn test_node_kind_parsing() {
    assert_eq!(NodeKind::parse("condition"), Some(NodeKind::Condition));
    assert_eq!(NodeKind::parse("Condition"), None);
    assert_eq!(NodeKind::Interaction.to_string(), "interaction");
}

#[test]
fn test_error_display() {
    let err = ConfigurationError::DanglingReference {
        node_id: "node_A".to_string(),
        target: "node_B".to_string(),
    };
    assert!(err.to_string().contains("node_B"));
    assert!(err.to_string().contains("node_A"));

    let eval_err = EvaluationError::TypeMismatch {
        operation: ">".to_string(),
        expected: "Text".to_string(),
        found: Value::Integer(5),
    };
    assert!(eval_err.to_string().contains('>'));
    assert!(eval_err.to_string().contains("Text"));
    assert!(eval_err.to_string().contains('5'));

    let exec_err = ExecutionError::from(ProviderError::Closed);
    assert!(exec_err.to_string().contains("closed"));
}
