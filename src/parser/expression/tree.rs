use compact_str::CompactString;
use std::{fmt::Display, rc::Rc};

use super::{InfixOperator, PrefixOperator};
use crate::parser::statement::BlockStatement;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    pub name: CompactString,
}

impl Identifier {
    pub fn new(name: impl Into<CompactString>) -> Self {
        Self { name: name.into() }
    }
}

impl Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Identifier(Identifier),
    IntegerLiteral(i64),
    StringLiteral(CompactString),
    BooleanLiteral(bool),
    Prefix {
        operator: PrefixOperator,
        operand: Box<Expression>,
    },
    Infix {
        operator: InfixOperator,
        lhs: Box<Expression>,
        rhs: Box<Expression>,
    },
    If {
        condition: Box<Expression>,
        consequence: BlockStatement,
        alternative: Option<BlockStatement>,
    },
    // Parameters and body are shared with every function value created from this literal.
    Function {
        parameters: Rc<[Identifier]>,
        body: Rc<BlockStatement>,
    },
    Call {
        callee: Box<Expression>,
        arguments: Vec<Expression>,
    },
}

impl Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Identifier(ident) => write!(f, "{ident}"),
            Self::IntegerLiteral(value) => write!(f, "{value}"),
            Self::StringLiteral(value) => write!(f, "{value}"),
            Self::BooleanLiteral(value) => write!(f, "{value}"),
            Self::Prefix { operator, operand } => write!(f, "({operator}{operand})"),
            Self::Infix { operator, lhs, rhs } => write!(f, "({lhs} {operator} {rhs})"),
            Self::If {
                condition,
                consequence,
                alternative,
            } => {
                write!(f, "if{condition} {consequence}")?;
                if let Some(alternative) = alternative {
                    write!(f, "else {alternative}")?;
                }
                Ok(())
            }
            Self::Function { parameters, body } => {
                write!(f, "fn(")?;
                write_separated(f, parameters.iter())?;
                write!(f, "){body}")
            }
            Self::Call { callee, arguments } => {
                write!(f, "{callee}(")?;
                write_separated(f, arguments.iter())?;
                write!(f, ")")
            }
        }
    }
}

pub(crate) fn write_separated<T: Display>(
    f: &mut std::fmt::Formatter<'_>,
    items: impl Iterator<Item = T>,
) -> std::fmt::Result {
    for (index, item) in items.enumerate() {
        if index > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}
