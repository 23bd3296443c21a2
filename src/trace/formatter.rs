use crate::ast::EvaluationTrace;
use std::fmt::Write;

/// Turns an `EvaluationTrace` into the one-line explanation attached to a branch decision.
///
/// Variable operands are annotated with the value they resolved to, e.g.
/// `{{owner}} (was "student") == "student"`.
pub struct TraceFormatter;

impl TraceFormatter {
    pub fn format_trace(trace: &EvaluationTrace) -> String {
        let mut out = String::new();
        Self::write_trace(&mut out, trace, 0);
        out
    }

    /// Parenthesizes a step only when it binds looser than its parent.
    fn write_trace(out: &mut String, trace: &EvaluationTrace, parent_precedence: u8) {
        let precedence = trace.precedence();
        let wrap = precedence < parent_precedence;
        if wrap {
            out.push('(');
        }

        match trace {
            EvaluationTrace::BinaryOp {
                op_symbol,
                left,
                right,
                ..
            } => {
                Self::write_trace(out, left, precedence);
                // A skipped right side means the left one decided the result.
                if !matches!(**right, EvaluationTrace::NotEvaluated) {
                    let _ = write!(out, " {} ", op_symbol);
                    Self::write_trace(out, right, precedence + 1);
                }
            }
            EvaluationTrace::UnaryOp {
                op_symbol, child, ..
            } => {
                let _ = write!(out, "{} ", op_symbol);
                Self::write_trace(out, child, precedence);
            }
            EvaluationTrace::Leaf { source, value } if source.starts_with("{{") => {
                let _ = write!(out, "{} (was {})", source, value.literal());
            }
            EvaluationTrace::Leaf { source, .. } => out.push_str(source),
            EvaluationTrace::NotEvaluated => {}
        }

        if wrap {
            out.push(')');
        }
    }
}
