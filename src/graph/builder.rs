use super::definition::{ConditionConfig, GraphDefinition, InteractionConfig, NodeSpec};
use crate::ast::Expression;
use crate::compiler::compile;
use crate::error::ConfigurationError;
use crate::node::{
    ConditionBranch, ConditionNode, EndNode, InteractionNode, Node, NodeKind, StartNode,
};
use ahash::AHashSet;
use serde::de::DeserializeOwned;
use tracing::warn;

/// Turns validated node specs into executable `Node`s.
pub(super) struct NodeBuilder<'a> {
    declared: AHashSet<&'a str>,
}

impl<'a> NodeBuilder<'a> {
    pub(super) fn new(definition: &'a GraphDefinition) -> Self {
        Self {
            declared: definition
                .variables
                .iter()
                .map(|v| v.name.as_str())
                .collect(),
        }
    }

    pub(super) fn build(&self, spec: &NodeSpec) -> Result<Node, ConfigurationError> {
        let kind =
            NodeKind::parse(&spec.kind).ok_or_else(|| ConfigurationError::InvalidNodeType {
                node_id: spec.id.clone(),
                type_name: spec.kind.clone(),
            })?;

        let node = match kind {
            NodeKind::Start => Node::Start(StartNode {
                id: spec.id.clone(),
                name: spec.name.clone(),
                next: spec.next.clone(),
            }),
            NodeKind::End => Node::End(EndNode {
                id: spec.id.clone(),
                name: spec.name.clone(),
            }),
            NodeKind::Interaction => self.build_interaction(spec)?,
            NodeKind::Condition => self.build_condition(spec)?,
        };
        Ok(node)
    }

    fn build_interaction(&self, spec: &NodeSpec) -> Result<Node, ConfigurationError> {
        let config: InteractionConfig = decode_config(spec)?;
        if spec.outputs.len() > 1 {
            return Err(ConfigurationError::InvalidConfig {
                node_id: spec.id.clone(),
                message: format!(
                    "interaction nodes bind at most one output, found {}",
                    spec.outputs.len()
                ),
            });
        }
        Ok(Node::Interaction(InteractionNode {
            id: spec.id.clone(),
            name: spec.name.clone(),
            next: spec.next.clone(),
            message: config.message,
            form: config.form,
            outputs: spec.outputs.clone(),
        }))
    }

    fn build_condition(&self, spec: &NodeSpec) -> Result<Node, ConfigurationError> {
        let config: ConditionConfig = decode_config(spec)?;
        let branches = config
            .conditions
            .into_iter()
            .map(|condition| {
                let compiled = compile(&condition.expression);
                match &compiled {
                    Ok(expression) => self.check_variables(spec, expression),
                    Err(e) => warn!(
                        node = %spec.id,
                        expression = %condition.expression,
                        error = %e,
                        "Condition does not compile and will never match"
                    ),
                }
                ConditionBranch {
                    expression: condition.expression,
                    compiled,
                    next: condition.next,
                }
            })
            .collect();

        Ok(Node::Condition(ConditionNode {
            id: spec.id.clone(),
            name: spec.name.clone(),
            next: spec.next.clone(),
            branches,
        }))
    }

    /// Warns about references to undeclared variables. Hosts may still bind them
    /// with `set_variable`, so this is not an error.
    fn check_variables(&self, spec: &NodeSpec, expression: &Expression) {
        let mut names = AHashSet::new();
        expression.required_variables(&mut names);
        for name in names.iter().filter(|n| !self.declared.contains(n.as_str())) {
            warn!(node = %spec.id, variable = %name, "Condition reads an undeclared variable");
        }
    }
}

fn decode_config<T: DeserializeOwned>(spec: &NodeSpec) -> Result<T, ConfigurationError> {
    let payload = if spec.config.is_null() {
        serde_json::Value::Object(Default::default())
    } else {
        spec.config.clone()
    };
    serde_json::from_value(payload).map_err(|e| ConfigurationError::InvalidConfig {
        node_id: spec.id.clone(),
        message: e.to_string(),
    })
}
