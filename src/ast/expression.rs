use super::{Value, VariablePath};
use ahash::AHashSet;
use std::fmt;

/// The Abstract Syntax Tree of a compiled condition expression.
///
/// The grammar has no identifiers, calls or arithmetic: only literals,
/// variable references, comparisons, membership tests and boolean combinators.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    // Logical
    Not(Box<Expression>),
    And(Box<Expression>, Box<Expression>),
    Or(Box<Expression>, Box<Expression>),

    // Comparison
    Equal(Box<Expression>, Box<Expression>),
    NotEqual(Box<Expression>, Box<Expression>),
    GreaterThan(Box<Expression>, Box<Expression>),
    GreaterThanOrEqual(Box<Expression>, Box<Expression>),
    SmallerThan(Box<Expression>, Box<Expression>),
    SmallerThanOrEqual(Box<Expression>, Box<Expression>),

    // Membership
    Contains(Box<Expression>, Box<Expression>),
    NotContains(Box<Expression>, Box<Expression>),

    // Leaf nodes
    Literal(Value),
    Variable(VariablePath),
}

impl Expression {
    /// Collects the root names of every variable the expression reads.
    pub fn required_variables(&self, names: &mut AHashSet<String>) {
        match self {
            Expression::Variable(path) => {
                names.insert(path.root().to_string());
            }
            Expression::And(l, r)
            | Expression::Or(l, r)
            | Expression::Equal(l, r)
            | Expression::NotEqual(l, r)
            | Expression::GreaterThan(l, r)
            | Expression::GreaterThanOrEqual(l, r)
            | Expression::SmallerThan(l, r)
            | Expression::SmallerThanOrEqual(l, r)
            | Expression::Contains(l, r)
            | Expression::NotContains(l, r) => {
                l.required_variables(names);
                r.required_variables(names);
            }
            Expression::Not(v) => v.required_variables(names),
            Expression::Literal(_) => {}
        }
    }

    /// The operator symbol as written in the expression language.
    pub fn op_symbol(&self) -> Option<&'static str> {
        let symbol = match self {
            Expression::Not(_) => "not",
            Expression::And(..) => "and",
            Expression::Or(..) => "or",
            Expression::Equal(..) => "==",
            Expression::NotEqual(..) => "!=",
            Expression::GreaterThan(..) => ">",
            Expression::GreaterThanOrEqual(..) => ">=",
            Expression::SmallerThan(..) => "<",
            Expression::SmallerThanOrEqual(..) => "<=",
            Expression::Contains(..) => "contains",
            Expression::NotContains(..) => "not contains",
            Expression::Literal(_) | Expression::Variable(_) => return None,
        };
        Some(symbol)
    }
}

/// A wrapper to display an expression as an indented tree.
pub struct ExpressionTree<'a>(pub &'a Expression);

impl fmt::Display for ExpressionTree<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_as_tree(self.0, f, "", true)
    }
}

fn fmt_as_tree(
    expr: &Expression,
    f: &mut fmt::Formatter<'_>,
    prefix: &str,
    is_last: bool,
) -> fmt::Result {
    let node_marker = if is_last { "└── " } else { "├── " };
    write!(f, "{}{}", prefix, node_marker)?;

    let child_prefix = format!("{}{}", prefix, if is_last { "    " } else { "│   " });

    match expr {
        Expression::Literal(v) => writeln!(f, "Literal: {}", v.literal()),
        Expression::Variable(path) => writeln!(f, "Variable: {}", path),
        Expression::Not(v) => {
            writeln!(f, "not")?;
            fmt_as_tree(v, f, &child_prefix, true)
        }
        Expression::And(l, r)
        | Expression::Or(l, r)
        | Expression::Equal(l, r)
        | Expression::NotEqual(l, r)
        | Expression::GreaterThan(l, r)
        | Expression::GreaterThanOrEqual(l, r)
        | Expression::SmallerThan(l, r)
        | Expression::SmallerThanOrEqual(l, r)
        | Expression::Contains(l, r)
        | Expression::NotContains(l, r) => {
            writeln!(f, "{}", expr.op_symbol().unwrap_or("?"))?;
            fmt_as_tree(l, f, &child_prefix, false)?;
            fmt_as_tree(r, f, &child_prefix, true)
        }
    }
}
