use crate::ast::{EvaluationTrace, Expression};
use crate::compiler::compile;
use crate::error::EvaluationError;
use crate::store::VariableStore;
use tracing::warn;

mod engine;
mod resolve;
mod template;

pub use template::render_template;

use engine::AstEngine;

/// Evaluates compiled condition expressions against a variable store.
///
/// An `Evaluator` borrows the store for its lifetime, so a condition always sees a
/// consistent snapshot of the session's variables.
pub struct Evaluator<'a> {
    variables: &'a VariableStore,
}

impl<'a> Evaluator<'a> {
    pub fn new(variables: &'a VariableStore) -> Self {
        Self { variables }
    }

    /// Evaluates an expression and returns a trace of how the result was reached.
    ///
    /// # Returns
    ///
    /// * `Ok(EvaluationTrace)`: the evaluation finished. Use `EvaluationTrace::is_true` for the outcome.
    /// * `Err(EvaluationError)`: an operator was applied to values it does not support.
    pub fn evaluate(&self, expression: &Expression) -> Result<EvaluationTrace, EvaluationError> {
        AstEngine::new(expression, self.variables).evaluate()
    }

    /// Compiles and evaluates a condition string in one step.
    pub fn evaluate_source(&self, source: &str) -> Result<EvaluationTrace, EvaluationError> {
        let expression = compile(source)?;
        self.evaluate(&expression)
    }

    /// Whether the expression holds. Evaluation errors are logged and count as false.
    pub fn is_true(&self, expression: &Expression) -> bool {
        match self.evaluate(expression) {
            Ok(trace) => trace.is_true(),
            Err(e) => {
                warn!(error = %e, "Condition evaluation failed, treating as false");
                false
            }
        }
    }

    /// Like `is_true`, but for an uncompiled condition string.
    pub fn is_true_source(&self, source: &str) -> bool {
        match self.evaluate_source(source) {
            Ok(trace) => trace.is_true(),
            Err(e) => {
                warn!(expression = source, error = %e, "Condition evaluation failed, treating as false");
                false
            }
        }
    }
}
