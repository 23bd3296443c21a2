use crate::ast::VariablePath;
use crate::error::EvaluationError;
use std::fmt;

/// A token produced by the lexer, with its character position in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub position: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Operands
    Variable(VariablePath),
    Str(String),
    Integer(i64),
    Float(f64),
    True,
    False,

    // Keywords
    And,
    Or,
    Not,
    Contains,

    // Comparison
    Eq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,

    // Structural
    LParen,
    RParen,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Variable(path) => write!(f, "{}", path),
            TokenKind::Str(s) => write!(f, "{:?}", s),
            TokenKind::Integer(n) => write!(f, "{}", n),
            TokenKind::Float(n) => write!(f, "{}", n),
            TokenKind::True => write!(f, "true"),
            TokenKind::False => write!(f, "false"),
            TokenKind::And => write!(f, "and"),
            TokenKind::Or => write!(f, "or"),
            TokenKind::Not => write!(f, "not"),
            TokenKind::Contains => write!(f, "contains"),
            TokenKind::Eq => write!(f, "=="),
            TokenKind::NotEq => write!(f, "!="),
            TokenKind::Lt => write!(f, "<"),
            TokenKind::Gt => write!(f, ">"),
            TokenKind::LtEq => write!(f, "<="),
            TokenKind::GtEq => write!(f, ">="),
            TokenKind::LParen => write!(f, "("),
            TokenKind::RParen => write!(f, ")"),
        }
    }
}

/// Splits a condition string into tokens.
pub(super) struct Lexer {
    input: Vec<char>,
    pos: usize,
}

impl Lexer {
    pub(super) fn new(source: &str) -> Self {
        Self {
            input: source.chars().collect(),
            pos: 0,
        }
    }

    pub(super) fn tokenize(mut self) -> Result<Vec<Token>, EvaluationError> {
        let mut tokens = Vec::new();
        loop {
            self.skip_whitespace();
            let Some(ch) = self.peek() else {
                return Ok(tokens);
            };
            let position = self.pos;
            let kind = match ch {
                '{' if self.peek_at(1) == Some('{') => self.read_variable()?,
                '"' | '\'' => self.read_string(ch)?,
                c if c.is_ascii_digit() => self.read_number()?,
                '-' | '.' if self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) => {
                    self.read_number()?
                }
                '=' if self.peek_at(1) == Some('=') => self.advance_by(2, TokenKind::Eq),
                '!' if self.peek_at(1) == Some('=') => self.advance_by(2, TokenKind::NotEq),
                '<' if self.peek_at(1) == Some('=') => self.advance_by(2, TokenKind::LtEq),
                '>' if self.peek_at(1) == Some('=') => self.advance_by(2, TokenKind::GtEq),
                '<' => self.advance_by(1, TokenKind::Lt),
                '>' => self.advance_by(1, TokenKind::Gt),
                '(' => self.advance_by(1, TokenKind::LParen),
                ')' => self.advance_by(1, TokenKind::RParen),
                c if c.is_alphabetic() || c == '_' => self.read_word()?,
                found => return Err(EvaluationError::UnexpectedCharacter { position, found }),
            };
            tokens.push(Token { kind, position });
        }
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.input.get(self.pos + offset).copied()
    }

    fn advance_by(&mut self, count: usize, kind: TokenKind) -> TokenKind {
        self.pos += count;
        kind
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn read_variable(&mut self) -> Result<TokenKind, EvaluationError> {
        let start = self.pos;
        self.pos += 2;
        let mut path = String::new();
        loop {
            match self.peek() {
                Some('}') if self.peek_at(1) == Some('}') => {
                    self.pos += 2;
                    break;
                }
                Some(c) => {
                    path.push(c);
                    self.pos += 1;
                }
                None => return Err(EvaluationError::UnterminatedVariable(start)),
            }
        }
        VariablePath::parse(&path)
            .map(TokenKind::Variable)
            .ok_or(EvaluationError::InvalidVariable {
                position: start,
                path,
            })
    }

    fn read_string(&mut self, quote: char) -> Result<TokenKind, EvaluationError> {
        let start = self.pos;
        self.pos += 1;
        let mut text = String::new();
        loop {
            match self.peek() {
                Some(c) if c == quote => {
                    self.pos += 1;
                    return Ok(TokenKind::Str(text));
                }
                Some('\\') => {
                    let escaped = self
                        .peek_at(1)
                        .ok_or(EvaluationError::UnterminatedString(start))?;
                    text.push(match escaped {
                        'n' => '\n',
                        't' => '\t',
                        other => other,
                    });
                    self.pos += 2;
                }
                Some(c) => {
                    text.push(c);
                    self.pos += 1;
                }
                None => return Err(EvaluationError::UnterminatedString(start)),
            }
        }
    }

    fn read_number(&mut self) -> Result<TokenKind, EvaluationError> {
        let start = self.pos;
        let mut text = String::new();
        if self.peek() == Some('-') {
            text.push('-');
            self.pos += 1;
        }
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() || c == '.' {
                text.push(c);
                self.pos += 1;
            } else {
                break;
            }
        }
        // Integers too large for i64 fall back to a float.
        if !text.contains('.') {
            if let Ok(n) = text.parse::<i64>() {
                return Ok(TokenKind::Integer(n));
            }
        }
        text.parse::<f64>()
            .map(TokenKind::Float)
            .map_err(|_| EvaluationError::InvalidNumber {
                position: start,
                text,
            })
    }

    fn read_word(&mut self) -> Result<TokenKind, EvaluationError> {
        let start = self.pos;
        let mut word = String::new();
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                word.push(c);
                self.pos += 1;
            } else {
                break;
            }
        }
        match word.as_str() {
            "and" => Ok(TokenKind::And),
            "or" => Ok(TokenKind::Or),
            "not" => Ok(TokenKind::Not),
            "contains" => Ok(TokenKind::Contains),
            "true" | "True" => Ok(TokenKind::True),
            "false" | "False" => Ok(TokenKind::False),
            _ => Err(EvaluationError::UnknownName {
                position: start,
                name: word,
            }),
        }
    }
}
