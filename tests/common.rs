//! Common test utilities for building graph definitions, stores and scripted providers.
use serde_json::json;
use std::collections::VecDeque;
use tenkan::prelude::*;

/// A bare node spec with no config.
#[allow(dead_code)]
pub fn node(id: &str, kind: &str, next: &str) -> NodeSpec {
    NodeSpec {
        id: id.to_string(),
        kind: kind.to_string(),
        name: id.to_string(),
        next: next.to_string(),
        ..Default::default()
    }
}

/// An interaction node storing its submission into `output`.
#[allow(dead_code)]
pub fn interaction(id: &str, next: &str, output: &str, form: serde_json::Value) -> NodeSpec {
    NodeSpec {
        config: json!({ "message": "", "form": form }),
        outputs: vec![output.to_string()],
        ..node(id, "interaction", next)
    }
}

/// A condition node with ordered `(expression, next)` branches.
#[allow(dead_code)]
pub fn condition(id: &str, default_next: &str, branches: &[(&str, &str)]) -> NodeSpec {
    let conditions: Vec<serde_json::Value> = branches
        .iter()
        .map(|(expression, next)| json!({ "expression": expression, "next": next }))
        .collect();
    NodeSpec {
        config: json!({ "conditions": conditions }),
        ..node(id, "condition", default_next)
    }
}

#[allow(dead_code)]
pub fn graph(nodes: Vec<NodeSpec>, variables: &[&str]) -> GraphDefinition {
    GraphDefinition {
        name: "test".to_string(),
        nodes,
        variables: variables
            .iter()
            .map(|name| tenkan::graph::VariableDeclaration {
                name: name.to_string(),
            })
            .collect(),
    }
}

/// Converts a JSON object into a `ValueMap`.
#[allow(dead_code)]
pub fn values(object: serde_json::Value) -> ValueMap {
    match Value::from(object) {
        Value::Map(map) => map,
        other => panic!("expected a JSON object, got {:?}", other),
    }
}

/// A store with every key of `object` declared and bound.
#[allow(dead_code)]
pub fn store_with(object: serde_json::Value) -> VariableStore {
    let bindings = values(object);
    let mut store = VariableStore::with_declarations(bindings.keys().cloned());
    for (name, value) in bindings {
        store.set(name, value);
    }
    store
}

/// Scenario A: `start -> A(condition) -> B(interaction) -> end`.
///
/// A routes to `end` when `{{score}} > 5` and to B otherwise. B stores its form into `score`.
#[allow(dead_code)]
pub fn scenario_a() -> GraphDefinition {
    graph(
        vec![
            node("start", "start", "A"),
            condition("A", "B", &[("{{score}} > 5", "end")]),
            interaction(
                "B",
                "end",
                "score",
                json!([{ "key": "score", "label": "Score", "type": "number", "required": true }]),
            ),
            node("end", "end", ""),
        ],
        &["score"],
    )
}

/// An `InteractionProvider` that replays prepared submissions and records what it was shown.
#[allow(dead_code)]
#[derive(Debug, Default)]
pub struct ScriptedProvider {
    pub submissions: VecDeque<ValueMap>,
    pub messages: Vec<String>,
    pub errors: Vec<String>,
    pub form_titles: Vec<String>,
}

#[allow(dead_code)]
impl ScriptedProvider {
    pub fn new(submissions: Vec<ValueMap>) -> Self {
        Self {
            submissions: submissions.into(),
            ..Default::default()
        }
    }
}

impl InteractionProvider for ScriptedProvider {
    fn display_message(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }

    fn display_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }

    fn display_form(
        &mut self,
        title: &str,
        _fields: &[FieldSpec],
    ) -> std::result::Result<ValueMap, ProviderError> {
        self.form_titles.push(title.to_string());
        self.submissions.pop_front().ok_or(ProviderError::Closed)
    }
}
