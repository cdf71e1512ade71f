use super::ValueKind;
use crate::parser::expression::{InfixOperator, PrefixOperator};
use compact_str::CompactString;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RuntimeError {
    #[error("type mismatch: {lhs} {operator} {rhs}")]
    TypeMismatch {
        lhs: ValueKind,
        operator: InfixOperator,
        rhs: ValueKind,
    },
    #[error("unknown op: {operator}{operand}")]
    UnknownPrefixOperator {
        operator: PrefixOperator,
        operand: ValueKind,
    },
    #[error("unknown op: {lhs} {operator} {rhs}")]
    UnknownInfixOperator {
        lhs: ValueKind,
        operator: InfixOperator,
        rhs: ValueKind,
    },
    #[error("identifier not found: {0}")]
    IdentifierNotFound(CompactString),
    #[error("not a function: {0}")]
    NotAFunction(ValueKind),
    #[error("wrong number of arguments. got={actual}, want={expected}")]
    InvalidArgumentCount { actual: usize, expected: usize },
    #[error("argument to `{function}` is not supported, got {kind}")]
    UnsupportedArgument {
        function: &'static str,
        kind: ValueKind,
    },
    #[error("division by zero")]
    DivisionByZero,
    #[error("maximum recursion depth exceeded (limit: {depth})")]
    StackOverflow { depth: usize },
}

impl RuntimeError {
    pub fn code(&self) -> &'static str {
        match self {
            RuntimeError::TypeMismatch { .. } => "RT001",
            RuntimeError::UnknownPrefixOperator { .. } => "RT002",
            RuntimeError::UnknownInfixOperator { .. } => "RT003",
            RuntimeError::IdentifierNotFound(_) => "RT004",
            RuntimeError::NotAFunction(_) => "RT005",
            RuntimeError::InvalidArgumentCount { .. } => "RT006",
            RuntimeError::UnsupportedArgument { .. } => "RT007",
            RuntimeError::DivisionByZero => "RT008",
            RuntimeError::StackOverflow { .. } => "RT009",
        }
    }
}
