//! Graph definitions and the loaded, validated graph the engine walks.

pub mod conversion;
pub mod definition;

mod builder;
mod validation;

pub use conversion::*;
pub use definition::*;

use crate::error::ConfigurationError;
use crate::node::{Node, NodeKind};
use ahash::AHashMap;
use builder::NodeBuilder;
use tracing::debug;

/// A validated graph: the node table plus the declared variable names.
///
/// Built all at once by `Graph::build`; a definition that breaks any invariant
/// produces no `Graph` at all.
#[derive(Debug, Clone)]
pub struct Graph {
    name: String,
    nodes: AHashMap<String, Node>,
    order: Vec<String>,
    variables: Vec<String>,
}

impl Graph {
    pub fn build(definition: &GraphDefinition) -> Result<Self, ConfigurationError> {
        validation::validate_structure(definition)?;

        let builder = NodeBuilder::new(definition);
        let nodes = definition
            .nodes
            .iter()
            .map(|spec| builder.build(spec))
            .collect::<Result<Vec<_>, _>>()?;

        validation::validate_references(&nodes)?;

        let order = nodes.iter().map(|n| n.id().to_string()).collect();
        let nodes: AHashMap<String, Node> = nodes
            .into_iter()
            .map(|n| (n.id().to_string(), n))
            .collect();
        debug!(graph = %definition.name, nodes = nodes.len(), "Graph built");

        Ok(Self {
            name: definition.name.clone(),
            nodes,
            order,
            variables: definition.variables.iter().map(|v| v.name.clone()).collect(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Nodes in definition order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.order.iter().filter_map(|id| self.nodes.get(id))
    }

    pub fn start_id(&self) -> Option<&str> {
        self.nodes()
            .find(|n| n.kind() == NodeKind::Start)
            .map(Node::id)
    }

    /// Declared variable names, in declaration order.
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
