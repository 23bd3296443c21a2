use super::resolve::resolve_operand;
use crate::ast::{EvaluationTrace, Expression, Value};
use crate::error::EvaluationError;
use crate::store::VariableStore;
use std::cmp::Ordering;

// This macro generates a match arm for a binary operation.
macro_rules! eval_op {
    ($self:ident, $l:ident, $r:ident, $op_str:expr, $test:expr, order) => {
        $self.eval_ordering($l, $r, $op_str, $test)
    };
    ($self:ident, $l:ident, $r:ident, $op_str:expr, $negate:expr, membership) => {
        $self.eval_membership($l, $r, $op_str, $negate)
    };
}

/// The core recursive engine for evaluating a single expression against a store.
pub(super) struct AstEngine<'a> {
    expression: &'a Expression,
    variables: &'a VariableStore,
}

impl<'a> AstEngine<'a> {
    pub(super) fn new(expression: &'a Expression, variables: &'a VariableStore) -> Self {
        Self {
            expression,
            variables,
        }
    }

    /// Evaluates the AST and returns a trace of the execution.
    pub(super) fn evaluate(&self) -> Result<EvaluationTrace, EvaluationError> {
        self.evaluate_recursive(self.expression)
    }

    fn evaluate_recursive(&self, expr: &Expression) -> Result<EvaluationTrace, EvaluationError> {
        match expr {
            // --- Comparison Operations ---
            Expression::GreaterThan(l, r) => eval_op!(self, l, r, ">", Ordering::is_gt, order),
            Expression::SmallerThan(l, r) => eval_op!(self, l, r, "<", Ordering::is_lt, order),
            Expression::GreaterThanOrEqual(l, r) => {
                eval_op!(self, l, r, ">=", Ordering::is_ge, order)
            }
            Expression::SmallerThanOrEqual(l, r) => {
                eval_op!(self, l, r, "<=", Ordering::is_le, order)
            }

            // --- Equality ---
            Expression::Equal(l, r) => self.eval_equality(l, r, "==", false),
            Expression::NotEqual(l, r) => self.eval_equality(l, r, "!=", true),

            // --- Membership ---
            Expression::Contains(l, r) => eval_op!(self, l, r, "contains", false, membership),
            Expression::NotContains(l, r) => {
                eval_op!(self, l, r, "not contains", true, membership)
            }

            // --- Logical Operations ---
            Expression::And(l, r) => {
                let left_trace = self.evaluate_recursive(l)?;
                if !left_trace.is_true() {
                    return Ok(EvaluationTrace::BinaryOp {
                        op_symbol: "and",
                        left: Box::new(left_trace),
                        right: Box::new(EvaluationTrace::NotEvaluated),
                        outcome: Value::Bool(false),
                    });
                }
                let right_trace = self.evaluate_recursive(r)?;
                let outcome = Value::Bool(right_trace.is_true());
                Ok(EvaluationTrace::BinaryOp {
                    op_symbol: "and",
                    left: Box::new(left_trace),
                    right: Box::new(right_trace),
                    outcome,
                })
            }
            Expression::Or(l, r) => {
                let left_trace = self.evaluate_recursive(l)?;
                if left_trace.is_true() {
                    return Ok(EvaluationTrace::BinaryOp {
                        op_symbol: "or",
                        left: Box::new(left_trace),
                        right: Box::new(EvaluationTrace::NotEvaluated),
                        outcome: Value::Bool(true),
                    });
                }
                let right_trace = self.evaluate_recursive(r)?;
                let outcome = Value::Bool(right_trace.is_true());
                Ok(EvaluationTrace::BinaryOp {
                    op_symbol: "or",
                    left: Box::new(left_trace),
                    right: Box::new(right_trace),
                    outcome,
                })
            }
            Expression::Not(v) => {
                let child_trace = self.evaluate_recursive(v)?;
                let outcome = Value::Bool(!child_trace.is_true());
                Ok(EvaluationTrace::UnaryOp {
                    op_symbol: "not",
                    child: Box::new(child_trace),
                    outcome,
                })
            }

            // --- Leaves ---
            Expression::Literal(val) => Ok(EvaluationTrace::Leaf {
                source: val.literal(),
                value: val.clone(),
            }),
            Expression::Variable(path) => Ok(EvaluationTrace::Leaf {
                source: path.to_string(),
                value: resolve_operand(self.variables, path),
            }),
        }
    }

    fn eval_equality(
        &self,
        l: &Expression,
        r: &Expression,
        op: &'static str,
        negate: bool,
    ) -> Result<EvaluationTrace, EvaluationError> {
        let left_trace = self.evaluate_recursive(l)?;
        let right_trace = self.evaluate_recursive(r)?;
        // A Text never equals a number, even with the same digits.
        let equal = left_trace
            .get_outcome()
            .loosely_equals(&right_trace.get_outcome());
        Ok(EvaluationTrace::BinaryOp {
            op_symbol: op,
            left: Box::new(left_trace),
            right: Box::new(right_trace),
            outcome: Value::Bool(equal != negate),
        })
    }

    fn eval_ordering<F>(
        &self,
        l: &Expression,
        r: &Expression,
        op: &'static str,
        test: F,
    ) -> Result<EvaluationTrace, EvaluationError>
    where
        F: Fn(Ordering) -> bool,
    {
        let left_trace = self.evaluate_recursive(l)?;
        let right_trace = self.evaluate_recursive(r)?;
        let ordering = match (left_trace.get_outcome(), right_trace.get_outcome()) {
            (Value::Text(a), Value::Text(b)) => Some(a.cmp(&b)),
            (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(&b)),
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(&b)),
            (l_val, r_val) if l_val.is_numeric() && r_val.is_numeric() => {
                l_val.as_f64().partial_cmp(&r_val.as_f64())
            }
            (l_val @ (Value::Text(_) | Value::Bool(_)), r_val) => {
                return Err(self.type_mismatch(op, l_val.type_name(), r_val));
            }
            (l_val, r_val) if l_val.is_numeric() => {
                return Err(self.type_mismatch(op, "Integer or Number", r_val));
            }
            (l_val, _) => return Err(self.type_mismatch(op, "Text, Integer, Number or Bool", l_val)),
        };
        // NaN compares false in every direction.
        let outcome = Value::Bool(ordering.is_some_and(test));
        Ok(EvaluationTrace::BinaryOp {
            op_symbol: op,
            left: Box::new(left_trace),
            right: Box::new(right_trace),
            outcome,
        })
    }

    /// `a contains b` asks whether `a` is contained in `b`: an element of the list `b`,
    /// or a substring of the text `b`. In English it reads backwards.
    fn eval_membership(
        &self,
        l: &Expression,
        r: &Expression,
        op: &'static str,
        negate: bool,
    ) -> Result<EvaluationTrace, EvaluationError> {
        let left_trace = self.evaluate_recursive(l)?;
        let right_trace = self.evaluate_recursive(r)?;
        let found = match (left_trace.get_outcome(), right_trace.get_outcome()) {
            (needle, Value::List(items)) => items.iter().any(|item| item.loosely_equals(&needle)),
            (Value::Text(needle), Value::Text(haystack)) => haystack.contains(needle.as_str()),
            (l_val, Value::Text(_)) => return Err(self.type_mismatch(op, "Text", l_val)),
            (_, r_val) => return Err(self.type_mismatch(op, "List or Text", r_val)),
        };
        Ok(EvaluationTrace::BinaryOp {
            op_symbol: op,
            left: Box::new(left_trace),
            right: Box::new(right_trace),
            outcome: Value::Bool(found != negate),
        })
    }

    fn type_mismatch(&self, op: &str, expected: &str, found: Value) -> EvaluationError {
        EvaluationError::TypeMismatch {
            operation: op.to_string(),
            expected: expected.to_string(),
            found,
        }
    }
}
