use super::definition::GraphDefinition;
use crate::error::ConfigurationError;
use crate::node::{Node, NodeKind};
use ahash::AHashSet;
use itertools::Itertools;

/// Checks the invariants that can be read straight off the definition:
/// a non-empty node list, exactly one start node, non-empty unique ids and known types.
pub(super) fn validate_structure(definition: &GraphDefinition) -> Result<(), ConfigurationError> {
    if definition.nodes.is_empty() {
        return Err(ConfigurationError::EmptyGraph(definition.name.clone()));
    }

    let start_count = definition
        .nodes
        .iter()
        .filter(|n| NodeKind::parse(&n.kind) == Some(NodeKind::Start))
        .count();
    if start_count != 1 {
        return Err(ConfigurationError::StartNodeCount(start_count));
    }

    if let Some((index, _)) = definition.nodes.iter().find_position(|n| n.id.is_empty()) {
        return Err(ConfigurationError::MissingNodeId { index });
    }

    if let Some(duplicate) = definition.nodes.iter().map(|n| &n.id).duplicates().next() {
        return Err(ConfigurationError::DuplicateNodeId(duplicate.clone()));
    }

    if let Some(invalid) = definition
        .nodes
        .iter()
        .find(|n| NodeKind::parse(&n.kind).is_none())
    {
        return Err(ConfigurationError::InvalidNodeType {
            node_id: invalid.id.clone(),
            type_name: invalid.kind.clone(),
        });
    }

    Ok(())
}

/// Checks that every successor id (direct `next` or condition branch) names a node.
/// End nodes are skipped: they never hand control on.
pub(super) fn validate_references(nodes: &[Node]) -> Result<(), ConfigurationError> {
    let ids: AHashSet<&str> = nodes.iter().map(Node::id).collect();
    for node in nodes {
        if let Some(target) = node.successors().into_iter().find(|t| !ids.contains(t)) {
            return Err(ConfigurationError::DanglingReference {
                node_id: node.id().to_string(),
                target: target.to_string(),
            });
        }
    }
    Ok(())
}
