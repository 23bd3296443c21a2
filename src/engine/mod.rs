//! The workflow engine: a single-session state machine over a loaded graph.
//!
//! ```text
//! Uninitialized --load--> Ready --start--> Running <--> AwaitingInput
//!                                             |
//!                                             +--> Terminated
//! ```

use crate::ast::{Value, ValueMap};
use crate::error::{ConfigurationError, ExecutionError};
use crate::graph::{Graph, GraphDefinition, IntoGraph};
use crate::node::{ExecutionPayload, ExecutionResult, FormRequest, InteractionOutcome, NodeContext, NodeKind};
use crate::store::VariableStore;
use serde::Serialize;
use tracing::{Span, debug, error, info, info_span, warn};

mod provider;

pub use provider::InteractionProvider;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineState {
    Uninitialized,
    Ready,
    Running,
    AwaitingInput,
    Terminated,
}

/// A serializable view of where a session stands.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineSnapshot {
    pub workflow: Option<String>,
    pub state: EngineState,
    pub current_node_id: Option<String>,
    pub variables: ValueMap,
}

/// Drives one workflow session.
///
/// The engine owns the node table, the variable store, the cursor and its own
/// `tracing` span. Hosts that want concurrent sessions create one engine per session.
#[derive(Debug)]
pub struct WorkflowEngine {
    graph: Option<Graph>,
    variables: VariableStore,
    cursor: Option<String>,
    state: EngineState,
    span: Span,
}

impl Default for WorkflowEngine {
    fn default() -> Self {
        Self::new()
    }
}

pub struct EngineBuilder<G> {
    source: G,
    span: Option<Span>,
    variables: Vec<(String, Value)>,
}

impl<G: IntoGraph> EngineBuilder<G> {
    pub fn new(source: G) -> Self {
        Self {
            source,
            span: None,
            variables: Vec::new(),
        }
    }

    /// Uses a caller-provided span instead of the default `workflow` span.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Binds a variable after the graph is loaded, overriding its unset default.
    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.variables.push((name.into(), value.into()));
        self
    }

    pub fn build(self) -> Result<WorkflowEngine, ConfigurationError> {
        let definition = self.source.into_graph()?;
        let mut engine = match self.span {
            Some(span) => WorkflowEngine::with_span(span),
            None => WorkflowEngine::new(),
        };
        engine.load(&definition)?;
        for (name, value) in self.variables {
            engine.set_variable(name, value);
        }
        Ok(engine)
    }
}

impl WorkflowEngine {
    pub fn new() -> Self {
        Self::with_span(info_span!("workflow", name = tracing::field::Empty))
    }

    pub fn with_span(span: Span) -> Self {
        Self {
            graph: None,
            variables: VariableStore::new(),
            cursor: None,
            state: EngineState::Uninitialized,
            span,
        }
    }

    pub fn builder<G: IntoGraph>(source: G) -> EngineBuilder<G> {
        EngineBuilder::new(source)
    }

    /// Validates a definition and installs it, declaring every variable as unset.
    ///
    /// On error the engine keeps whatever it had before.
    pub fn load(&mut self, definition: &GraphDefinition) -> Result<(), ConfigurationError> {
        let _span = self.span.clone().entered();
        let graph = Graph::build(definition).inspect_err(|e| {
            error!(error = %e, "Rejected graph definition");
        })?;

        self.span.record("name", graph.name());
        self.variables = VariableStore::with_declarations(graph.variables().iter().cloned());
        self.cursor = None;
        self.state = EngineState::Ready;
        info!(
            graph = graph.name(),
            nodes = graph.len(),
            variables = graph.variables().len(),
            "Graph loaded"
        );
        self.graph = Some(graph);
        Ok(())
    }

    /// Moves the cursor to the start node and returns its id.
    pub fn start(&mut self) -> Result<String, ExecutionError> {
        let _span = self.span.clone().entered();
        let graph = self.graph.as_ref().ok_or(ExecutionError::NotLoaded)?;
        let start_id = graph
            .start_id()
            .ok_or(ExecutionError::NoStartNode)?
            .to_string();

        self.cursor = Some(start_id.clone());
        self.state = EngineState::Running;
        info!(start = %start_id, "Workflow started");
        Ok(start_id)
    }

    /// Executes one node. `input` entries are merged into the store first, but only
    /// for names the graph declares.
    pub fn execute_node(
        &mut self,
        node_id: &str,
        input: Option<&ValueMap>,
    ) -> Result<ExecutionResult, ExecutionError> {
        let _span = self.span.clone().entered();
        let graph = self.graph.as_ref().ok_or(ExecutionError::NotLoaded)?;
        let node = graph
            .node(node_id)
            .ok_or_else(|| ExecutionError::NodeNotFound(node_id.to_string()))?;

        if let Some(input) = input {
            let updated = self.variables.merge_declared(input);
            debug!(node = node_id, updated, "Merged node input");
        }

        debug!(node = node_id, kind = %node.kind(), "Executing node");
        let result = node.execute(&NodeContext {
            variables: &self.variables,
        });

        match result.kind {
            NodeKind::End => {
                self.cursor = None;
                self.state = EngineState::Terminated;
                info!(node = node_id, "Workflow reached an end node");
            }
            NodeKind::Interaction => {
                self.cursor = Some(node_id.to_string());
                self.state = EngineState::AwaitingInput;
            }
            NodeKind::Start | NodeKind::Condition => {
                self.cursor = Some(node_id.to_string());
                self.state = EngineState::Running;
            }
        }
        Ok(result)
    }

    /// Hands a form submission to an interaction node.
    ///
    /// A valid submission is stored under the node's output and moves the cursor to the
    /// node's successor. A rejected one changes nothing.
    pub fn process_interaction_result(
        &mut self,
        node_id: &str,
        values: &ValueMap,
    ) -> Result<InteractionOutcome, ExecutionError> {
        let _span = self.span.clone().entered();
        let graph = self.graph.as_ref().ok_or(ExecutionError::NotLoaded)?;
        let node = graph
            .node(node_id)
            .ok_or_else(|| ExecutionError::NodeNotFound(node_id.to_string()))?;
        let interaction = node
            .as_interaction()
            .ok_or_else(|| ExecutionError::NotInteraction {
                node_id: node_id.to_string(),
                kind: node.kind(),
            })?;

        let outcome = interaction.process_input(&mut self.variables, values);
        match &outcome {
            InteractionOutcome::Advanced { next } => {
                debug!(node = node_id, next = ?next, "Interaction accepted");
                self.cursor = next.clone();
                self.state = if next.is_some() {
                    EngineState::Running
                } else {
                    EngineState::Terminated
                };
            }
            InteractionOutcome::Rejected { errors } => {
                warn!(node = node_id, errors = errors.len(), "Form submission rejected");
            }
        }
        Ok(outcome)
    }

    /// Runs the workflow from the start node until an end node or an empty successor.
    ///
    /// Rejected submissions are re-prompted. Any other failure is shown through
    /// `display_error` and returned; the variable store is left as it was.
    pub fn run(&mut self, provider: &mut dyn InteractionProvider) -> Result<(), ExecutionError> {
        let span = self.span.clone();
        let _guard = span.enter();

        match self.drive(provider) {
            Ok(()) => Ok(()),
            Err(e) => {
                error!(error = %e, node = ?self.cursor, "Workflow run aborted");
                self.state = EngineState::Terminated;
                provider.display_error(&format!("Execution failed: {}", e));
                Err(e)
            }
        }
    }

    fn drive(&mut self, provider: &mut dyn InteractionProvider) -> Result<(), ExecutionError> {
        let mut current = Some(self.start()?);

        while let Some(node_id) = current {
            let result = self.execute_node(&node_id, None)?;
            current = match result.payload {
                ExecutionPayload::Completed => {
                    provider.display_message("Workflow completed");
                    return Ok(());
                }
                ExecutionPayload::Form(form) => self.collect_input(provider, &node_id, &form)?,
                ExecutionPayload::None | ExecutionPayload::Branch { .. } => result.next_node,
            };
        }

        self.cursor = None;
        self.state = EngineState::Terminated;
        info!("Workflow finished without an end node");
        Ok(())
    }

    fn collect_input(
        &mut self,
        provider: &mut dyn InteractionProvider,
        node_id: &str,
        form: &FormRequest,
    ) -> Result<Option<String>, ExecutionError> {
        if !form.message.is_empty() {
            provider.display_message(&form.message);
        }
        loop {
            let values = provider.display_form(&form.title, &form.fields)?;
            match self.process_interaction_result(node_id, &values)? {
                InteractionOutcome::Advanced { next } => return Ok(next),
                InteractionOutcome::Rejected { errors } => {
                    for field_error in &errors {
                        provider.display_error(&field_error.message);
                    }
                }
            }
        }
    }

    /// Returns a variable's value, or `Value::Absent` when it is unset.
    pub fn get_variable(&self, name: &str) -> &Value {
        self.variables.get(name)
    }

    /// Binds a variable directly. The name does not need to be declared.
    pub fn set_variable(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.variables.set(name, value);
    }

    pub fn variables(&self) -> &VariableStore {
        &self.variables
    }

    pub fn current_node_id(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn graph(&self) -> Option<&Graph> {
        self.graph.as_ref()
    }

    pub fn current_state(&self) -> EngineSnapshot {
        EngineSnapshot {
            workflow: self.graph.as_ref().map(|g| g.name().to_string()),
            state: self.state,
            current_node_id: self.cursor.clone(),
            variables: self.variables.to_map(),
        }
    }
}
