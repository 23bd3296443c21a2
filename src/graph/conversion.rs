use super::definition::GraphDefinition;
use crate::error::ConfigurationError;

/// A trait for custom data models that can be converted into a Tenkan `GraphDefinition`.
///
/// Hosts that keep workflows in their own format (a database row, YAML, a visual
/// editor's export) implement this trait to hand the engine a canonical definition.
///
/// # Example
///
/// ```rust
/// use tenkan::error::ConfigurationError;
/// use tenkan::graph::{GraphDefinition, IntoGraph, NodeSpec};
///
/// struct Step { id: String, then: Option<String> }
/// struct Checklist { title: String, steps: Vec<Step> }
///
/// impl IntoGraph for Checklist {
///     fn into_graph(self) -> Result<GraphDefinition, ConfigurationError> {
///         if self.steps.is_empty() {
///             return Err(ConfigurationError::Conversion("checklist has no steps".into()));
///         }
///         let nodes = self
///             .steps
///             .into_iter()
///             .enumerate()
///             .map(|(i, step)| NodeSpec {
///                 kind: if i == 0 { "start".into() } else { "end".into() },
///                 next: step.then.unwrap_or_default(),
///                 id: step.id,
///                 ..Default::default()
///             })
///             .collect();
///         Ok(GraphDefinition { name: self.title, nodes, variables: vec![] })
///     }
/// }
///
/// let checklist = Checklist {
///     title: "demo".into(),
///     steps: vec![
///         Step { id: "begin".into(), then: Some("done".into()) },
///         Step { id: "done".into(), then: None },
///     ],
/// };
/// let graph = checklist.into_graph().unwrap();
/// assert_eq!(graph.nodes[0].next, "done");
/// ```
pub trait IntoGraph {
    /// Consumes the object and converts it into a Tenkan-compatible graph definition.
    fn into_graph(self) -> Result<GraphDefinition, ConfigurationError>;
}

impl IntoGraph for GraphDefinition {
    fn into_graph(self) -> Result<GraphDefinition, ConfigurationError> {
        Ok(self)
    }
}

impl IntoGraph for serde_json::Value {
    fn into_graph(self) -> Result<GraphDefinition, ConfigurationError> {
        serde_json::from_value(self).map_err(|e| ConfigurationError::JsonParseError(e.to_string()))
    }
}
