use super::{ExecutionPayload, ExecutionResult, FormRequest, NodeContext, NodeKind, resolve_next};
use crate::ast::{Value, ValueMap};
use crate::evaluator::render_template;
use crate::graph::{FieldSpec, FieldType};
use crate::store::VariableStore;
use serde::Serialize;
use std::fmt;

/// A step that pauses the run until the provider returns a completed form.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionNode {
    pub id: String,
    pub name: String,
    pub next: String,
    pub message: String,
    pub form: Vec<FieldSpec>,
    /// At most one name; the whole submission is stored under it.
    pub outputs: Vec<String>,
}

/// A single rejected form field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub key: String,
    pub label: String,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InteractionOutcome {
    /// The submission was stored. `next` is `None` when the node has no successor.
    Advanced { next: Option<String> },
    /// The submission failed validation; nothing was stored.
    Rejected { errors: Vec<FieldError> },
}

impl InteractionNode {
    /// Renders the form request. Never resolves a successor: only `process_input` can.
    pub(super) fn execute(&self, context: &NodeContext<'_>) -> ExecutionResult {
        let message = render_template(&self.message, context.variables);
        ExecutionResult {
            node_id: self.id.clone(),
            kind: NodeKind::Interaction,
            next_node: None,
            message: message.clone(),
            payload: ExecutionPayload::Form(FormRequest {
                title: self.name.clone(),
                message,
                fields: self.form.clone(),
                outputs: self.outputs.clone(),
            }),
        }
    }

    /// Checks a submission against the form's `required` flags and field types.
    pub fn validate(&self, values: &ValueMap) -> Vec<FieldError> {
        let mut errors = Vec::new();
        for field in &self.form {
            let value = values.get(&field.key);
            let label = field.display_label();
            let error = |message: String| FieldError {
                key: field.key.clone(),
                label: label.to_string(),
                message,
            };

            let missing = match value {
                None | Some(Value::Absent) => true,
                Some(Value::Text(s)) => s.is_empty(),
                Some(_) => false,
            };
            if field.required && missing {
                errors.push(error(format!("Field '{}' is required", label)));
            }

            let Some(value) = value.filter(|v| !v.is_absent()) else {
                continue;
            };
            match field.field_type {
                FieldType::Number if !value.is_numeric() => {
                    errors.push(error(format!("Field '{}' must be a number", label)));
                }
                FieldType::Checkbox if !matches!(value, Value::List(_)) => {
                    errors.push(error(format!(
                        "Field '{}' must be a list of selected options",
                        label
                    )));
                }
                _ => {}
            }
        }
        errors
    }

    /// Validates a submission and, when it passes, binds it to the output variable.
    pub fn process_input(
        &self,
        variables: &mut VariableStore,
        values: &ValueMap,
    ) -> InteractionOutcome {
        let errors = self.validate(values);
        if !errors.is_empty() {
            return InteractionOutcome::Rejected { errors };
        }
        if let [output] = self.outputs.as_slice() {
            variables.set(output.clone(), Value::Map(values.clone()));
        }
        InteractionOutcome::Advanced {
            next: resolve_next(&self.next),
        }
    }
}
