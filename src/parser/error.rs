use crate::lexer::{Span, TokenKind};
use compact_str::CompactString;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParserErrorKind {
    #[error("expected next token to be {expected}, got={actual} instead")]
    UnexpectedToken {
        actual: TokenKind,
        expected: TokenKind,
    },
    #[error("no prefix parse function for {0} found")]
    NonExpression(TokenKind),
    #[error("could not parse {0:?} as integer")]
    InvalidInteger(CompactString),
}

#[derive(Debug, Error, Clone, PartialEq)]
#[error("{kind}")]
pub struct ParserError {
    #[source]
    pub kind: ParserErrorKind,
    pub span: Span,
}

impl ParserError {
    pub fn code(&self) -> &'static str {
        match self.kind {
            ParserErrorKind::UnexpectedToken { .. } => "SY001",
            ParserErrorKind::NonExpression(_) => "SY002",
            ParserErrorKind::InvalidInteger(_) => "SY003",
        }
    }
}
