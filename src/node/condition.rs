use super::{ExecutionPayload, ExecutionResult, NodeContext, NodeKind, resolve_next};
use crate::ast::Expression;
use crate::error::EvaluationError;
use crate::evaluator::Evaluator;
use crate::trace::TraceFormatter;
use tracing::{debug, warn};

/// One `{expression, next}` pair of a condition node.
///
/// The expression is compiled when the graph loads. A branch whose expression does not
/// compile keeps the error and never matches.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionBranch {
    pub expression: String,
    pub compiled: Result<Expression, EvaluationError>,
    pub next: String,
}

/// A step that picks its successor from ordered conditions. First true branch wins;
/// when none holds, the node's own `next` is the default.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionNode {
    pub id: String,
    pub name: String,
    pub next: String,
    pub branches: Vec<ConditionBranch>,
}

impl ConditionNode {
    pub(super) fn execute(&self, context: &NodeContext<'_>) -> ExecutionResult {
        let evaluator = Evaluator::new(context.variables);

        let (matched, target, reason) = self
            .branches
            .iter()
            .enumerate()
            .find_map(|(index, branch)| {
                let expression = match &branch.compiled {
                    Ok(expression) => expression,
                    Err(e) => {
                        warn!(node = %self.id, expression = %branch.expression, error = %e, "Skipping malformed condition");
                        return None;
                    }
                };
                match evaluator.evaluate(expression) {
                    Ok(trace) if trace.is_true() => Some((
                        Some(index),
                        branch.next.as_str(),
                        TraceFormatter::format_trace(&trace),
                    )),
                    Ok(_) => None,
                    Err(e) => {
                        warn!(node = %self.id, expression = %branch.expression, error = %e, "Condition evaluation failed, treating as false");
                        None
                    }
                }
            })
            .unwrap_or_else(|| (None, self.next.as_str(), "No condition matched".to_string()));

        debug!(node = %self.id, branch = ?matched, next = target, "Condition resolved");

        let next_node = resolve_next(target);
        ExecutionResult {
            node_id: self.id.clone(),
            kind: NodeKind::Condition,
            message: format!(
                "Condition evaluated, next node: {}",
                next_node.as_deref().unwrap_or("<none>")
            ),
            next_node,
            payload: ExecutionPayload::Branch { matched, reason },
        }
    }
}
