use super::lexer::{Token, TokenKind};
use crate::ast::{Expression, Value};
use crate::error::EvaluationError;

/// Recursive-descent parser over the token stream.
///
/// Precedence from loosest to tightest: `or`, `and`, `not`, comparison / membership.
/// Comparisons do not chain: `a == b == c` is rejected.
pub(super) struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub(super) fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    pub(super) fn parse(mut self) -> Result<Expression, EvaluationError> {
        if self.tokens.is_empty() {
            return Err(EvaluationError::EmptyExpression);
        }
        let expr = self.parse_or()?;
        match self.tokens.get(self.pos) {
            None => Ok(expr),
            Some(token) => Err(unexpected(token)),
        }
    }

    fn peek(&self) -> Option<&TokenKind> {
        self.tokens.get(self.pos).map(|t| &t.kind)
    }

    fn peek_at(&self, offset: usize) -> Option<&TokenKind> {
        self.tokens.get(self.pos + offset).map(|t| &t.kind)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn parse_or(&mut self) -> Result<Expression, EvaluationError> {
        let mut left = self.parse_and()?;
        while self.peek() == Some(&TokenKind::Or) {
            self.pos += 1;
            let right = self.parse_and()?;
            left = Expression::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expression, EvaluationError> {
        let mut left = self.parse_not()?;
        while self.peek() == Some(&TokenKind::And) {
            self.pos += 1;
            let right = self.parse_not()?;
            left = Expression::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_not(&mut self) -> Result<Expression, EvaluationError> {
        if self.peek() == Some(&TokenKind::Not) {
            self.pos += 1;
            let operand = self.parse_not()?;
            return Ok(Expression::Not(Box::new(operand)));
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> Result<Expression, EvaluationError> {
        let left = self.parse_operand()?;

        type Build = fn(Box<Expression>, Box<Expression>) -> Expression;
        let (build, width): (Build, usize) = match (self.peek(), self.peek_at(1)) {
            (Some(TokenKind::Eq), _) => (Expression::Equal as Build, 1),
            (Some(TokenKind::NotEq), _) => (Expression::NotEqual as Build, 1),
            (Some(TokenKind::Gt), _) => (Expression::GreaterThan as Build, 1),
            (Some(TokenKind::GtEq), _) => (Expression::GreaterThanOrEqual as Build, 1),
            (Some(TokenKind::Lt), _) => (Expression::SmallerThan as Build, 1),
            (Some(TokenKind::LtEq), _) => (Expression::SmallerThanOrEqual as Build, 1),
            (Some(TokenKind::Contains), _) => (Expression::Contains as Build, 1),
            (Some(TokenKind::Not), Some(TokenKind::Contains)) => {
                (Expression::NotContains as Build, 2)
            }
            _ => return Ok(left),
        };
        self.pos += width;
        let right = self.parse_operand()?;
        Ok(build(Box::new(left), Box::new(right)))
    }

    fn parse_operand(&mut self) -> Result<Expression, EvaluationError> {
        let token = self.next().ok_or(EvaluationError::UnexpectedEnd)?;
        match token.kind {
            TokenKind::Str(s) => Ok(Expression::Literal(Value::Text(s))),
            TokenKind::Integer(n) => Ok(Expression::Literal(Value::Integer(n))),
            TokenKind::Float(n) => Ok(Expression::Literal(Value::Number(n))),
            TokenKind::True => Ok(Expression::Literal(Value::Bool(true))),
            TokenKind::False => Ok(Expression::Literal(Value::Bool(false))),
            TokenKind::Variable(path) => Ok(Expression::Variable(path)),
            TokenKind::LParen => {
                let inner = self.parse_or()?;
                match self.next() {
                    Some(Token {
                        kind: TokenKind::RParen,
                        ..
                    }) => Ok(inner),
                    Some(other) => Err(unexpected(&other)),
                    None => Err(EvaluationError::UnexpectedEnd),
                }
            }
            other => Err(EvaluationError::UnexpectedToken {
                position: token.position,
                found: other.to_string(),
            }),
        }
    }
}

fn unexpected(token: &Token) -> EvaluationError {
    EvaluationError::UnexpectedToken {
        position: token.position,
        found: token.kind.to_string(),
    }
}
