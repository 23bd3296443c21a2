//! # Tenkan - Workflow Graph Engine for Research-Achievement Transfer Analysis
//!
//! **Tenkan** walks a declarative graph of nodes to guide a user through a multi-step
//! data-collection session: it renders forms, stores the answers as workflow variables,
//! evaluates branch conditions against them, and hands the results to analysis services.
//!
//! ## Core Workflow
//!
//! 1.  **Describe the graph**: Write a JSON definition (or implement `IntoGraph` for your own format).
//! 2.  **Load**: `WorkflowEngine::load` validates the graph, compiles every branch condition and declares the variables.
//! 3.  **Run**: `WorkflowEngine::run` drives the session, calling your `InteractionProvider` whenever a form must be filled.
//! 4.  **Analyze**: Read the collected variables and feed them to a `ReportPipeline`.
//!
//! ## Quick Start
//!
//! ```rust
//! use tenkan::prelude::*;
//! use serde_json::json;
//!
//! struct Scripted(Vec<ValueMap>);
//!
//! impl InteractionProvider for Scripted {
//!     fn display_message(&mut self, message: &str) { println!("{}", message); }
//!     fn display_error(&mut self, message: &str) { eprintln!("{}", message); }
//!     fn display_form(&mut self, _title: &str, _fields: &[FieldSpec]) -> std::result::Result<ValueMap, ProviderError> {
//!         self.0.pop().ok_or(ProviderError::Closed)
//!     }
//! }
//!
//! let definition = GraphDefinition::from_json(&json!({
//!     "name": "intake",
//!     "variables": [{ "name": "basic_info" }],
//!     "nodes": [
//!         { "id": "start", "type": "start", "name": "Start", "next": "ask" },
//!         { "id": "ask", "type": "interaction", "name": "Basic info", "next": "route",
//!           "outputs": ["basic_info"],
//!           "config": { "form": [{ "key": "owner", "label": "Owner", "type": "radio", "required": true }] } },
//!         { "id": "route", "type": "condition", "name": "Route", "next": "done",
//!           "config": { "conditions": [{ "expression": "{{basic_info.owner}} == 'student'", "next": "done" }] } },
//!         { "id": "done", "type": "end", "name": "Done" }
//!     ]
//! }).to_string())?;
//!
//! let mut engine = WorkflowEngine::new();
//! engine.load(&definition)?;
//!
//! let mut answers = ValueMap::new();
//! answers.insert("owner".to_string(), Value::from("student"));
//! engine.run(&mut Scripted(vec![answers]))?;
//!
//! assert_eq!(engine.state(), EngineState::Terminated);
//! assert_eq!(
//!     engine.get_variable("basic_info").get("owner"),
//!     Some(&Value::from("student"))
//! );
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod ast;
pub mod compiler;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod graph;
pub mod node;
pub mod prelude;
pub mod services;
pub mod store;
pub mod trace;
