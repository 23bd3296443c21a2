//! Compiles condition strings into `Expression` trees.
//!
//! The language is deliberately small: literals (`"text"`, `'text'`, numbers,
//! `true`/`false`), `{{variable.path}}` references, the comparisons
//! `== != < > <= >=`, the membership tests `contains` / `not contains`, and the
//! combinators `and`, `or`, `not` with parentheses. Bare names are rejected, so
//! an expression can never reach anything outside the variable store.

use crate::ast::Expression;
use crate::error::EvaluationError;

mod lexer;
mod parser;

pub use lexer::{Token, TokenKind};

use lexer::Lexer;
use parser::Parser;

/// Parses a condition expression.
///
/// # Example
///
/// ```rust
/// use tenkan::compiler::compile;
/// use tenkan::ast::Expression;
///
/// let expr = compile("{{score}} > 5 and not {{skipped}}").unwrap();
/// assert!(matches!(expr, Expression::And(_, _)));
/// assert!(compile("{{score}} > (5").is_err());
/// ```
pub fn compile(source: &str) -> Result<Expression, EvaluationError> {
    let tokens = Lexer::new(source).tokenize()?;
    Parser::new(tokens).parse()
}

/// Tokenizes a condition expression without parsing it.
pub fn tokenize(source: &str) -> Result<Vec<Token>, EvaluationError> {
    Lexer::new(source).tokenize()
}
