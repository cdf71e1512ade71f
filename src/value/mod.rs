pub mod error;
pub mod formatter;

use crate::environment::Environment;
use crate::parser::expression::{write_separated, Identifier};
use crate::parser::statement::BlockStatement;
use compact_str::CompactString;
use error::RuntimeError;
use std::fmt::Display;
use std::rc::Rc;

pub trait NativeFunction: std::fmt::Debug {
    fn get_name(&self) -> &'static str;
    /// Builtins validate their own arguments and report violations as [`Value::Error`].
    fn call(&self, arguments: &[Value]) -> Value;
}

#[derive(Clone)]
pub struct Function {
    pub parameters: Rc<[Identifier]>,
    pub body: Rc<BlockStatement>,
    pub closure: Environment,
}

// The closure is left out as it usually contains the function itself.
impl std::fmt::Debug for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Function")
            .field("parameters", &self.parameters)
            .field("body", &self.body)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Integer,
    Boolean,
    String,
    Null,
    Function,
    Builtin,
    Error,
}

impl Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer => write!(f, "INTEGER"),
            Self::Boolean => write!(f, "BOOLEAN"),
            Self::String => write!(f, "STRING"),
            Self::Null => write!(f, "NULL"),
            Self::Function => write!(f, "FUNCTION"),
            Self::Builtin => write!(f, "BUILTIN"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Value {
    Integer(i64),
    Boolean(bool),
    String(CompactString),
    Null,
    Function(Rc<Function>),
    Builtin(Rc<dyn NativeFunction>),
    Error(RuntimeError),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Integer(_) => ValueKind::Integer,
            Self::Boolean(_) => ValueKind::Boolean,
            Self::String(_) => ValueKind::String,
            Self::Null => ValueKind::Null,
            Self::Function(_) => ValueKind::Function,
            Self::Builtin(_) => ValueKind::Builtin,
            Self::Error(_) => ValueKind::Error,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    pub fn is_truthy(&self) -> bool {
        !matches!(self, Self::Boolean(false) | Self::Null)
    }

    pub fn logical_not(&self) -> bool {
        !self.is_truthy()
    }

    /// Value equality for data, identity for callables. Values of different
    /// kinds are never equal.
    pub fn is_equal(&self, other: &Value) -> bool {
        match (self, other) {
            (Self::Integer(lhs), Self::Integer(rhs)) => lhs == rhs,
            (Self::Boolean(lhs), Self::Boolean(rhs)) => lhs == rhs,
            (Self::String(lhs), Self::String(rhs)) => lhs == rhs,
            (Self::Null, Self::Null) => true,
            (Self::Function(lhs), Self::Function(rhs)) => Rc::ptr_eq(lhs, rhs),
            (Self::Builtin(lhs), Self::Builtin(rhs)) => lhs.get_name() == rhs.get_name(),
            _ => false,
        }
    }

    /// Splits a builtin's result back into the success and error channels.
    pub fn into_result(self) -> Result<Value, RuntimeError> {
        match self {
            Self::Error(error) => Err(error),
            value => Ok(value),
        }
    }
}

impl From<RuntimeError> for Value {
    fn from(value: RuntimeError) -> Self {
        Self::Error(value)
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{v}"),
            Self::Boolean(v) => write!(f, "{v}"),
            Self::String(v) => write!(f, "{v}"),
            Self::Null => write!(f, "null"),
            Self::Function(function) => {
                write!(f, "fn(")?;
                write_separated(f, function.parameters.iter())?;
                write!(f, ") {{\n{}\n}}", function.body)
            }
            Self::Builtin(_) => write!(f, "builtin function"),
            Self::Error(error) => write!(f, "ERROR: {error}"),
        }
    }
}
