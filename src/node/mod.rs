//! The four kinds of workflow steps.
//!
//! A `Node` is built once at load time from a `NodeSpec` and never mutated. Each variant
//! carries only what its kind needs, and `Node::execute` dispatches on the variant.

use crate::graph::FieldSpec;
use crate::store::VariableStore;
use serde::{Deserialize, Serialize};
use std::fmt;

mod condition;
mod endpoint;
mod interaction;

pub use condition::{ConditionBranch, ConditionNode};
pub use endpoint::{EndNode, StartNode};
pub use interaction::{FieldError, InteractionNode, InteractionOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Start,
    End,
    Interaction,
    Condition,
}

impl NodeKind {
    /// Parses the `type` string of a node spec.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "start" => Some(NodeKind::Start),
            "end" => Some(NodeKind::End),
            "interaction" => Some(NodeKind::Interaction),
            "condition" => Some(NodeKind::Condition),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Start => "start",
            NodeKind::End => "end",
            NodeKind::Interaction => "interaction",
            NodeKind::Condition => "condition",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What a node reads while executing.
#[derive(Debug, Clone, Copy)]
pub struct NodeContext<'a> {
    pub variables: &'a VariableStore,
}

/// The outcome of executing one node.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionResult {
    pub node_id: String,
    pub kind: NodeKind,
    /// The resolved successor. `None` for End nodes, for Interaction nodes (which wait
    /// for input) and when the successor id is empty.
    pub next_node: Option<String>,
    pub message: String,
    pub payload: ExecutionPayload,
}

impl ExecutionResult {
    pub fn is_terminal(&self) -> bool {
        matches!(self.payload, ExecutionPayload::Completed)
    }
}

/// Variant-specific data attached to an `ExecutionResult`.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionPayload {
    None,
    /// Set by End nodes.
    Completed,
    /// An interaction node asks the provider to render a form.
    Form(FormRequest),
    /// A condition node picked a branch. `matched` is `None` when the default was taken.
    Branch {
        matched: Option<usize>,
        reason: String,
    },
}

/// Everything an `InteractionProvider` needs to render one interaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormRequest {
    pub title: String,
    /// The prompt with variable references already substituted.
    pub message: String,
    pub fields: Vec<FieldSpec>,
    pub outputs: Vec<String>,
}

#[derive(Debug, Clone)]
pub enum Node {
    Start(StartNode),
    End(EndNode),
    Interaction(InteractionNode),
    Condition(ConditionNode),
}

impl Node {
    pub fn id(&self) -> &str {
        match self {
            Node::Start(n) => &n.id,
            Node::End(n) => &n.id,
            Node::Interaction(n) => &n.id,
            Node::Condition(n) => &n.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Node::Start(n) => &n.name,
            Node::End(n) => &n.name,
            Node::Interaction(n) => &n.name,
            Node::Condition(n) => &n.name,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Start(_) => NodeKind::Start,
            Node::End(_) => NodeKind::End,
            Node::Interaction(_) => NodeKind::Interaction,
            Node::Condition(_) => NodeKind::Condition,
        }
    }

    /// Every node id this node can hand control to, including condition branches.
    pub fn successors(&self) -> Vec<&str> {
        let mut targets = match self {
            Node::Start(n) => vec![n.next.as_str()],
            Node::End(_) => vec![],
            Node::Interaction(n) => vec![n.next.as_str()],
            Node::Condition(n) => {
                let mut targets: Vec<&str> = n.branches.iter().map(|b| b.next.as_str()).collect();
                targets.push(n.next.as_str());
                targets
            }
        };
        targets.retain(|t| !t.is_empty());
        targets
    }

    pub fn as_interaction(&self) -> Option<&InteractionNode> {
        match self {
            Node::Interaction(n) => Some(n),
            _ => None,
        }
    }

    pub fn execute(&self, context: &NodeContext<'_>) -> ExecutionResult {
        match self {
            Node::Start(n) => n.execute(),
            Node::End(n) => n.execute(),
            Node::Interaction(n) => n.execute(context),
            Node::Condition(n) => n.execute(context),
        }
    }
}

/// Maps an empty successor id to `None`.
pub(crate) fn resolve_next(next: &str) -> Option<String> {
    if next.is_empty() {
        None
    } else {
        Some(next.to_string())
    }
}
