use crate::ast::Value;
use crate::node::NodeKind;
use thiserror::Error;

/// Errors that make a graph definition unloadable.
///
/// These are fatal: `WorkflowEngine::load` never installs a partially valid graph.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("Failed to parse graph JSON: {0}")]
    JsonParseError(String),

    #[error("Could not read graph file '{path}': {message}")]
    Io { path: String, message: String },

    #[error("Graph '{0}' has no nodes")]
    EmptyGraph(String),

    #[error("Node at position {index} has an empty id")]
    MissingNodeId { index: usize },

    #[error("Node id '{0}' is declared more than once")]
    DuplicateNodeId(String),

    #[error("A graph needs exactly one start node, found {0}")]
    StartNodeCount(usize),

    #[error("Node '{node_id}' has an unregistered or invalid node type: '{type_name}'")]
    InvalidNodeType { node_id: String, type_name: String },

    #[error("Node '{node_id}' has an invalid config: {message}")]
    InvalidConfig { node_id: String, message: String },

    #[error("Node '{node_id}' points to '{target}', which is not a node in this graph")]
    DanglingReference { node_id: String, target: String },

    #[error("Invalid custom graph data: {0}")]
    Conversion(String),
}

/// Errors raised while the engine executes nodes. They abort the current run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExecutionError {
    #[error("No graph has been loaded into the engine")]
    NotLoaded,

    #[error("Start node not found")]
    NoStartNode,

    #[error("Node '{0}' does not exist")]
    NodeNotFound(String),

    #[error("Node '{node_id}' is a {kind} node, not an interaction node")]
    NotInteraction { node_id: String, kind: NodeKind },

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Errors produced while compiling or evaluating a condition expression.
///
/// Condition nodes recover from all of these by treating the branch as false.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvaluationError {
    #[error("Expression is empty")]
    EmptyExpression,

    #[error("Unexpected character '{found}' at position {position}")]
    UnexpectedCharacter { position: usize, found: char },

    #[error("Unterminated string literal starting at position {0}")]
    UnterminatedString(usize),

    #[error("Unterminated variable reference starting at position {0}")]
    UnterminatedVariable(usize),

    #[error("Invalid variable reference '{path}' at position {position}")]
    InvalidVariable { position: usize, path: String },

    #[error("Invalid number literal '{text}' at position {position}")]
    InvalidNumber { position: usize, text: String },

    #[error(
        "Unknown name '{name}' at position {position}; only literals and variable references are allowed"
    )]
    UnknownName { position: usize, name: String },

    #[error("Unexpected token '{found}' at position {position}")]
    UnexpectedToken { position: usize, found: String },

    #[error("Unexpected end of expression")]
    UnexpectedEnd,

    #[error(
        "Type mismatch during operation '{operation}': expected {expected}, but found value '{found}'"
    )]
    TypeMismatch {
        operation: String,
        expected: String,
        found: Value,
    },
}

/// Errors reported by an `InteractionProvider` while collecting input.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    #[error("Input stream closed before the form was completed")]
    Closed,

    #[error("Interaction provider failed: {0}")]
    Failed(String),
}

/// Errors returned by the analysis service capabilities.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ServiceError {
    #[error("Document '{file_name}' has an unsupported type (supported: {supported})")]
    UnsupportedDocument { file_name: String, supported: String },

    #[error("Invalid request to {service}: {message}")]
    InvalidRequest { service: String, message: String },

    #[error("Service '{0}' is unavailable")]
    Unavailable(String),
}
