use super::{ExecutionPayload, ExecutionResult, NodeKind, resolve_next};

/// The single entry point of a graph.
#[derive(Debug, Clone, PartialEq)]
pub struct StartNode {
    pub id: String,
    pub name: String,
    pub next: String,
}

impl StartNode {
    pub(super) fn execute(&self) -> ExecutionResult {
        ExecutionResult {
            node_id: self.id.clone(),
            kind: NodeKind::Start,
            next_node: resolve_next(&self.next),
            message: format!("Workflow started: {}", self.name),
            payload: ExecutionPayload::None,
        }
    }
}

/// A terminal node. It has no successor.
#[derive(Debug, Clone, PartialEq)]
pub struct EndNode {
    pub id: String,
    pub name: String,
}

impl EndNode {
    pub(super) fn execute(&self) -> ExecutionResult {
        ExecutionResult {
            node_id: self.id.clone(),
            kind: NodeKind::End,
            next_node: None,
            message: format!("Workflow finished: {}", self.name),
            payload: ExecutionPayload::Completed,
        }
    }
}
