//! Tests for the workflow engine state machine and its run loop.
mod common;
use common::*;
use serde_json::json;
use tenkan::prelude::*;

fn loaded(definition: GraphDefinition) -> WorkflowEngine {
    WorkflowEngine::builder(definition).build().unwrap()
}

/// `start -> check`, where `check` routes on `{{x}}` to `first`, `second` or `fallback`.
fn routing_graph() -> GraphDefinition {
    graph(
        vec![
            node("start", "start", "check"),
            condition(
                "check",
                "fallback",
                &[("{{x}} != 'none'", "first"), ("{{x}} == 'a'", "second")],
            ),
            node("first", "end", ""),
            node("second", "end", ""),
            node("fallback", "end", ""),
        ],
        &["x"],
    )
}

#[test]
fn test_first_true_condition_wins() {
    let mut engine = loaded(routing_graph());
    engine.set_variable("x", "a");

    let result = engine.execute_node("check", None).unwrap();
    assert_eq!(result.next_node.as_deref(), Some("first"));
    assert_eq!(result.message, "Condition evaluated, next node: first");
    assert!(matches!(
        result.payload,
        ExecutionPayload::Branch { matched: Some(0), .. }
    ));
}

#[test]
fn test_default_when_no_condition_holds() {
    let mut engine = loaded(routing_graph());
    engine.set_variable("x", "none");

    let result = engine.execute_node("check", None).unwrap();
    assert_eq!(result.next_node.as_deref(), Some("fallback"));
    match result.payload {
        ExecutionPayload::Branch { matched, reason } => {
            assert_eq!(matched, None);
            assert_eq!(reason, "No condition matched");
        }
        other => panic!("unexpected payload {:?}", other),
    }
    assert_eq!(engine.state(), EngineState::Running);
    assert_eq!(engine.current_node_id(), Some("check"));
}

#[test]
fn test_execute_node_merges_declared_input_only() {
    let mut engine = loaded(routing_graph());
    let input = values(json!({ "x": "none", "intruder": "ignored" }));

    let result = engine.execute_node("check", Some(&input)).unwrap();
    assert_eq!(result.next_node.as_deref(), Some("fallback"));
    assert_eq!(engine.get_variable("x"), &Value::from("none"));
    assert_eq!(engine.get_variable("intruder"), &Value::Absent);
}

#[test]
fn test_interaction_gating() {
    let mut engine = loaded(scenario_a());
    engine.start().unwrap();

    let result = engine.execute_node("B", None).unwrap();
    assert_eq!(result.next_node, None);
    assert_eq!(engine.state(), EngineState::AwaitingInput);
    assert_eq!(engine.get_variable("score"), &Value::Absent);
    let ExecutionPayload::Form(form) = result.payload else {
        panic!("interaction nodes return a form request");
    };
    assert_eq!(form.title, "B");
    assert_eq!(form.fields.len(), 1);
    assert_eq!(form.outputs, ["score".to_string()]);

    let submission = values(json!({ "score": 10 }));
    let outcome = engine.process_interaction_result("B", &submission).unwrap();
    assert_eq!(
        outcome,
        InteractionOutcome::Advanced {
            next: Some("end".to_string())
        }
    );
    assert_eq!(engine.get_variable("score"), &Value::Map(submission));
    assert_eq!(engine.state(), EngineState::Running);
    assert_eq!(engine.current_node_id(), Some("end"));
}

#[test]
fn test_rejected_submission_changes_nothing() {
    let mut engine = loaded(scenario_a());
    engine.start().unwrap();
    engine.execute_node("B", None).unwrap();

    let outcome = engine
        .process_interaction_result("B", &values(json!({ "score": "ten" })))
        .unwrap();
    let InteractionOutcome::Rejected { errors } = outcome else {
        panic!("text in a number field must be rejected");
    };
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].key, "score");
    assert_eq!(errors[0].message, "Field 'Score' must be a number");

    assert_eq!(engine.get_variable("score"), &Value::Absent);
    assert_eq!(engine.state(), EngineState::AwaitingInput);
    assert_eq!(engine.current_node_id(), Some("B"));
}

#[test]
fn test_required_field_missing() {
    let mut engine = loaded(scenario_a());
    let outcome = engine
        .process_interaction_result("B", &ValueMap::new())
        .unwrap();
    assert_eq!(
        outcome,
        InteractionOutcome::Rejected {
            errors: vec![FieldError {
                key: "score".to_string(),
                label: "Score".to_string(),
                message: "Field 'Score' is required".to_string(),
            }]
        }
    );
}

#[test]
fn test_run_scenario_a() {
    let mut engine = loaded(scenario_a());
    let mut provider = ScriptedProvider::new(vec![values(json!({ "score": 10 }))]);

    engine.run(&mut provider).unwrap();

    // `{{score}}` is unset on the first pass, so A falls through to B.
    assert_eq!(provider.form_titles, ["B"]);
    assert_eq!(
        engine.get_variable("score"),
        &Value::from(json!({ "score": 10 }))
    );
    assert_eq!(provider.messages, ["Workflow completed"]);
    assert!(provider.errors.is_empty());
    assert_eq!(engine.state(), EngineState::Terminated);
    assert_eq!(engine.current_node_id(), None);
}

#[test]
fn test_run_reprompts_after_rejection() {
    let mut engine = loaded(scenario_a());
    let mut provider = ScriptedProvider::new(vec![
        values(json!({ "score": "x" })),
        values(json!({ "score": 3 })),
    ]);

    engine.run(&mut provider).unwrap();

    assert_eq!(provider.form_titles, ["B", "B"]);
    assert_eq!(provider.errors, ["Field 'Score' must be a number"]);
    assert_eq!(engine.state(), EngineState::Terminated);
}

#[test]
fn test_run_with_empty_start_next_terminates_cleanly() {
    let mut engine = loaded(graph(
        vec![node("start", "start", ""), node("end", "end", "")],
        &[],
    ));
    assert_eq!(engine.start().unwrap(), "start");

    let result = engine.execute_node("start", None).unwrap();
    assert_eq!(result.next_node, None);
    assert_eq!(result.message, "Workflow started: start");

    let mut provider = ScriptedProvider::default();
    engine.run(&mut provider).unwrap();
    assert_eq!(engine.state(), EngineState::Terminated);
    assert_eq!(engine.current_node_id(), None);
    assert!(provider.messages.is_empty());
    assert!(provider.errors.is_empty());
}

#[test]
fn test_run_fails_when_provider_closes() {
    let mut engine = loaded(scenario_a());
    engine.set_variable("note", "kept");
    let mut provider = ScriptedProvider::default();

    let result = engine.run(&mut provider);

    assert_eq!(result, Err(ExecutionError::Provider(ProviderError::Closed)));
    assert_eq!(provider.errors.len(), 1);
    assert!(provider.errors[0].starts_with("Execution failed:"));
    assert_eq!(engine.state(), EngineState::Terminated);
    assert_eq!(engine.get_variable("note"), &Value::from("kept"));
}

#[test]
fn test_end_node_terminates() {
    let mut engine = loaded(scenario_a());
    let result = engine.execute_node("end", None).unwrap();
    assert!(result.is_terminal());
    assert_eq!(result.message, "Workflow finished: end");
    assert_eq!(engine.state(), EngineState::Terminated);
    assert_eq!(engine.current_node_id(), None);
}

#[test]
fn test_execution_errors() {
    let mut empty = WorkflowEngine::new();
    assert_eq!(empty.state(), EngineState::Uninitialized);
    assert_eq!(empty.start(), Err(ExecutionError::NotLoaded));

    let mut engine = loaded(scenario_a());
    assert_eq!(
        engine.execute_node("ghost", None).err(),
        Some(ExecutionError::NodeNotFound("ghost".to_string()))
    );
    assert_eq!(
        engine.process_interaction_result("A", &ValueMap::new()).err(),
        Some(ExecutionError::NotInteraction {
            node_id: "A".to_string(),
            kind: NodeKind::Condition,
        })
    );
}

#[test]
fn test_failed_load_keeps_previous_graph() {
    let mut engine = loaded(scenario_a());
    assert_eq!(engine.state(), EngineState::Ready);

    let broken = graph(vec![node("end", "end", "")], &[]);
    assert_eq!(
        engine.load(&broken),
        Err(ConfigurationError::StartNodeCount(0))
    );
    assert_eq!(engine.graph().map(|g| g.len()), Some(4));
    assert_eq!(engine.state(), EngineState::Ready);
}

#[test]
fn test_load_declares_variables_as_unset() {
    let engine = loaded(scenario_a());
    assert!(engine.variables().is_declared("score"));
    assert_eq!(engine.get_variable("score"), &Value::Absent);
}

#[test]
fn test_builder_binds_variables_after_load() {
    let engine = WorkflowEngine::builder(scenario_a())
        .with_variable("score", values(json!({ "score": 8 })))
        .with_variable("host_context", "web")
        .build()
        .unwrap();

    assert_eq!(
        engine.get_variable("score").get("score"),
        Some(&Value::Integer(8))
    );
    assert_eq!(engine.get_variable("host_context"), &Value::from("web"));
}

#[test]
fn test_snapshot_serializes() {
    let mut engine = loaded(scenario_a());
    engine.start().unwrap();
    engine.execute_node("B", None).unwrap();

    let snapshot = engine.current_state();
    assert_eq!(snapshot.workflow.as_deref(), Some("test"));
    assert_eq!(
        serde_json::to_value(&snapshot).unwrap(),
        json!({
            "workflow": "test",
            "state": "awaiting_input",
            "current_node_id": "B",
            "variables": { "score": null }
        })
    );
}
