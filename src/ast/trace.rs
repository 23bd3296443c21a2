use super::Value;

/// How a condition reached its result, operand by operand.
///
/// Short-circuited operands are kept as `NotEvaluated` so a formatter can show only
/// the side that decided the outcome.
#[derive(Debug, Clone)]
pub enum EvaluationTrace {
    BinaryOp {
        op_symbol: &'static str,
        left: Box<EvaluationTrace>,
        right: Box<EvaluationTrace>,
        outcome: Value,
    },
    UnaryOp {
        op_symbol: &'static str,
        child: Box<EvaluationTrace>,
        outcome: Value,
    },
    Leaf {
        source: String,
        value: Value,
    },
    NotEvaluated,
}

/// Binding strength of an operator symbol, loosest first.
fn binding_power(op_symbol: &str) -> u8 {
    match op_symbol {
        "or" => 1,
        "and" => 2,
        "not" => 3,
        "==" | "!=" | ">" | ">=" | "<" | "<=" | "contains" | "not contains" => 4,
        _ => 0,
    }
}

impl EvaluationTrace {
    fn outcome(&self) -> Option<&Value> {
        match self {
            EvaluationTrace::BinaryOp { outcome, .. } | EvaluationTrace::UnaryOp { outcome, .. } => {
                Some(outcome)
            }
            EvaluationTrace::Leaf { value, .. } => Some(value),
            EvaluationTrace::NotEvaluated => None,
        }
    }

    /// The value this step produced. Skipped operands produce `Value::Absent`.
    pub fn get_outcome(&self) -> Value {
        self.outcome().cloned().unwrap_or_default()
    }

    /// Whether the traced expression counts as true for branch selection.
    pub fn is_true(&self) -> bool {
        self.outcome().is_some_and(Value::is_truthy)
    }

    /// Used by the formatter to decide where parentheses are needed.
    /// Leaves bind tightest.
    pub fn precedence(&self) -> u8 {
        match self {
            EvaluationTrace::BinaryOp { op_symbol, .. }
            | EvaluationTrace::UnaryOp { op_symbol, .. } => binding_power(op_symbol),
            EvaluationTrace::Leaf { .. } | EvaluationTrace::NotEvaluated => u8::MAX,
        }
    }
}
