//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the tenkan crate.
//! Import this module to get access to the core functionality without having to import
//! each type individually.
//!
//! # Example
//!
//! ```rust,no_run
//! use tenkan::prelude::*;
//!
//! # fn run_example(provider: &mut dyn InteractionProvider) -> Result<()> {
//! let definition = GraphDefinition::from_file("path/to/workflow.json")?;
//! let mut engine = WorkflowEngine::builder(definition).build()?;
//! engine.run(provider)?;
//!
//! println!("{}", serde_json::to_string_pretty(&engine.current_state())?);
//! # Ok(())
//! # }
//! ```

// Engine and graph loading
pub use crate::engine::{EngineSnapshot, EngineState, InteractionProvider, WorkflowEngine};
pub use crate::graph::{FieldSpec, FieldType, Graph, GraphDefinition, IntoGraph, NodeSpec};

// Nodes and execution results
pub use crate::node::{ExecutionPayload, ExecutionResult, FieldError, InteractionOutcome, NodeKind};

// Expressions and values
pub use crate::ast::{EvaluationTrace, Expression, Value, ValueMap};
pub use crate::compiler::compile;
pub use crate::evaluator::{Evaluator, render_template};
pub use crate::store::VariableStore;

// Error types
pub use crate::error::{
    ConfigurationError, EvaluationError, ExecutionError, ProviderError, ServiceError,
};

// Trace formatting
pub use crate::trace::TraceFormatter;

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
