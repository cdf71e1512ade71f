mod error;
pub mod expression;
pub mod formatter;
mod program;
pub mod statement;

pub use error::{ParserError, ParserErrorKind};
use expression::{Expression, Identifier, InfixOperator, Precedence, PrefixOperator};
pub use program::Program;
use statement::{BlockStatement, Statement};
use std::rc::Rc;

use crate::lexer::{Lexer, Token, TokenKind, TokenSource};

/// Parses an expression from the current token, i.e. a "nud".
type PrefixParseFn<S> = fn(&mut Parser<S>) -> Option<Expression>;
/// Extends an already parsed left hand side, i.e. a "led".
type InfixParseFn<S> = fn(&mut Parser<S>, Expression) -> Option<Expression>;

/// Pratt parser over any [`TokenSource`].
///
/// Syntax errors are recorded rather than returned so that a single pass can
/// report as many of them as possible. A program parsed with errors must not be
/// evaluated.
pub struct Parser<S: TokenSource> {
    source: S,
    current: Token,
    peek: Token,
    errors: Vec<ParserError>,
}

impl<'src> Parser<Lexer<'src>> {
    pub fn from_source(source: &'src str) -> Self {
        Self::new(Lexer::new(source))
    }
}

impl<S: TokenSource> Parser<S> {
    pub fn new(mut source: S) -> Self {
        let current = source.next_token();
        let peek = source.next_token();
        Self {
            source,
            current,
            peek,
            errors: Vec::new(),
        }
    }

    pub fn errors(&self) -> &[ParserError] {
        &self.errors
    }

    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.to_string()).collect()
    }

    /// Parses the whole token stream and hands back the program together with
    /// every syntax error found along the way.
    pub fn parse(mut self) -> (Program, Vec<ParserError>) {
        let program = self.parse_program();
        (program, self.errors)
    }

    fn advance(&mut self) {
        let next = self.source.next_token();
        self.current = std::mem::replace(&mut self.peek, next);
    }

    fn record_error(&mut self, error: ParserError) {
        tracing::debug!(code = error.code(), %error, "syntax error");
        self.errors.push(error);
    }

    fn expect_peek(&mut self, expected: TokenKind) -> bool {
        if self.peek.is(expected) {
            self.advance();
            true
        } else {
            self.record_error(ParserError {
                kind: ParserErrorKind::UnexpectedToken {
                    actual: self.peek.kind,
                    expected,
                },
                span: self.peek.span,
            });
            false
        }
    }

    fn expect_current(&mut self, expected: TokenKind) -> bool {
        if self.current.is(expected) {
            true
        } else {
            self.record_error(ParserError {
                kind: ParserErrorKind::UnexpectedToken {
                    actual: self.current.kind,
                    expected,
                },
                span: self.current.span,
            });
            false
        }
    }
}

// Parse program/statements
impl<S: TokenSource> Parser<S> {
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn parse_program(&mut self) -> Program {
        let mut statements = Vec::new();
        while !self.current.is(TokenKind::Eof) {
            if let Some(stmt) = self.parse_statement() {
                statements.push(stmt);
            }
            self.advance();
        }
        Program::new(statements)
    }

    fn parse_statement(&mut self) -> Option<Statement> {
        match self.current.kind {
            TokenKind::KeywordLet => self.parse_let_statement(),
            TokenKind::KeywordReturn => self.parse_return_statement(),
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_let_statement(&mut self) -> Option<Statement> {
        if !self.expect_peek(TokenKind::Ident) {
            return None;
        }
        let name = Identifier::new(self.current.literal.clone());

        if !self.expect_peek(TokenKind::Assign) {
            return None;
        }
        self.advance();

        let value = self.parse_expression(Precedence::Lowest);
        self.skip_to_terminator();
        Some(Statement::Let { name, value: value? })
    }

    fn parse_return_statement(&mut self) -> Option<Statement> {
        self.advance();
        let value = self.parse_expression(Precedence::Lowest);
        self.skip_to_terminator();
        Some(Statement::Return(value?))
    }

    fn parse_expression_statement(&mut self) -> Option<Statement> {
        let expr = self.parse_expression(Precedence::Lowest)?;
        if self.peek.is(TokenKind::Semicolon) {
            self.advance();
        }
        Some(Statement::Expression(expr))
    }

    fn skip_to_terminator(&mut self) {
        while !self.current.is(TokenKind::Semicolon) && !self.current.is(TokenKind::Eof) {
            self.advance();
        }
    }

    fn parse_block_statement(&mut self) -> BlockStatement {
        let mut statements = Vec::new();
        self.advance();
        while !self.current.is(TokenKind::RightBrace) && !self.current.is(TokenKind::Eof) {
            if let Some(stmt) = self.parse_statement() {
                statements.push(stmt);
            }
            self.advance();
        }
        BlockStatement::new(statements)
    }
}

// Pratt parser for expressions
impl<S: TokenSource> Parser<S> {
    fn prefix_parse_fn(kind: TokenKind) -> Option<PrefixParseFn<S>> {
        let parse_fn: PrefixParseFn<S> = match kind {
            TokenKind::Ident => Self::parse_identifier,
            TokenKind::IntegerLiteral => Self::parse_integer_literal,
            TokenKind::StringLiteral => Self::parse_string_literal,
            TokenKind::KeywordTrue | TokenKind::KeywordFalse => Self::parse_boolean,
            TokenKind::Bang | TokenKind::Minus => Self::parse_prefix_expression,
            TokenKind::LeftParenthesis => Self::parse_grouped_expression,
            TokenKind::KeywordIf => Self::parse_if_expression,
            TokenKind::KeywordFn => Self::parse_function_literal,
            _ => return None,
        };
        Some(parse_fn)
    }

    fn infix_parse_fn(kind: TokenKind) -> Option<InfixParseFn<S>> {
        let parse_fn: InfixParseFn<S> = match kind {
            TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Star
            | TokenKind::Slash
            | TokenKind::LessThan
            | TokenKind::GreaterThan
            | TokenKind::EqualEqual
            | TokenKind::BangEqual => Self::parse_infix_expression,
            TokenKind::LeftParenthesis => Self::parse_call_expression,
            _ => return None,
        };
        Some(parse_fn)
    }

    pub fn parse_expression(&mut self, precedence: Precedence) -> Option<Expression> {
        let Some(prefix) = Self::prefix_parse_fn(self.current.kind) else {
            self.record_error(ParserError {
                kind: ParserErrorKind::NonExpression(self.current.kind),
                span: self.current.span,
            });
            return None;
        };
        let mut lhs = prefix(self)?;

        while !self.peek.is(TokenKind::Semicolon) && precedence < Precedence::of(self.peek.kind) {
            let Some(infix) = Self::infix_parse_fn(self.peek.kind) else {
                return Some(lhs);
            };
            self.advance();
            lhs = infix(self, lhs)?;
        }
        Some(lhs)
    }

    fn parse_identifier(&mut self) -> Option<Expression> {
        Some(Expression::Identifier(Identifier::new(
            self.current.literal.clone(),
        )))
    }

    fn parse_integer_literal(&mut self) -> Option<Expression> {
        match self.current.literal.parse::<i64>() {
            Ok(value) => Some(Expression::IntegerLiteral(value)),
            Err(_) => {
                self.record_error(ParserError {
                    kind: ParserErrorKind::InvalidInteger(self.current.literal.clone()),
                    span: self.current.span,
                });
                None
            }
        }
    }

    fn parse_string_literal(&mut self) -> Option<Expression> {
        Some(Expression::StringLiteral(self.current.literal.clone()))
    }

    fn parse_boolean(&mut self) -> Option<Expression> {
        Some(Expression::BooleanLiteral(
            self.current.is(TokenKind::KeywordTrue),
        ))
    }

    fn parse_prefix_expression(&mut self) -> Option<Expression> {
        let operator = PrefixOperator::from_token(self.current.kind)?;
        self.advance();
        let operand = self.parse_expression(operator.get_precedence())?;
        Some(Expression::Prefix {
            operator,
            operand: Box::new(operand),
        })
    }

    fn parse_grouped_expression(&mut self) -> Option<Expression> {
        self.advance();
        let inner = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenKind::RightParenthesis) {
            return None;
        }
        Some(inner)
    }

    fn parse_if_expression(&mut self) -> Option<Expression> {
        if !self.expect_peek(TokenKind::LeftParenthesis) {
            return None;
        }
        self.advance();
        let condition = self.parse_expression(Precedence::Lowest)?;

        if !self.expect_peek(TokenKind::RightParenthesis) {
            return None;
        }
        if !self.expect_peek(TokenKind::LeftBrace) {
            return None;
        }
        let consequence = self.parse_block_statement();

        let mut alternative = None;
        if self.peek.is(TokenKind::KeywordElse) {
            self.advance();
            if !self.expect_peek(TokenKind::LeftBrace) {
                return None;
            }
            alternative = Some(self.parse_block_statement());
        }

        Some(Expression::If {
            condition: Box::new(condition),
            consequence,
            alternative,
        })
    }

    fn parse_function_literal(&mut self) -> Option<Expression> {
        if !self.expect_peek(TokenKind::LeftParenthesis) {
            return None;
        }
        let parameters = self.parse_function_parameters()?;

        if !self.expect_peek(TokenKind::LeftBrace) {
            return None;
        }
        let body = self.parse_block_statement();

        Some(Expression::Function {
            parameters: parameters.into(),
            body: Rc::new(body),
        })
    }

    fn parse_function_parameters(&mut self) -> Option<Vec<Identifier>> {
        let mut parameters = Vec::new();
        if self.peek.is(TokenKind::RightParenthesis) {
            self.advance();
            return Some(parameters);
        }

        self.advance();
        if !self.expect_current(TokenKind::Ident) {
            return None;
        }
        parameters.push(Identifier::new(self.current.literal.clone()));

        while self.peek.is(TokenKind::Comma) {
            self.advance();
            self.advance();
            if !self.expect_current(TokenKind::Ident) {
                return None;
            }
            parameters.push(Identifier::new(self.current.literal.clone()));
        }

        if !self.expect_peek(TokenKind::RightParenthesis) {
            return None;
        }
        Some(parameters)
    }

    fn parse_infix_expression(&mut self, lhs: Expression) -> Option<Expression> {
        let operator = InfixOperator::from_token(self.current.kind)?;
        // Recursing with the operator's own precedence keeps equal-precedence
        // chains left associative.
        let precedence = operator.get_precedence();
        self.advance();
        let rhs = self.parse_expression(precedence)?;
        Some(Expression::Infix {
            operator,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        })
    }

    fn parse_call_expression(&mut self, callee: Expression) -> Option<Expression> {
        let arguments = self.parse_call_arguments()?;
        Some(Expression::Call {
            callee: Box::new(callee),
            arguments,
        })
    }

    fn parse_call_arguments(&mut self) -> Option<Vec<Expression>> {
        let mut arguments = Vec::new();
        if self.peek.is(TokenKind::RightParenthesis) {
            self.advance();
            return Some(arguments);
        }

        self.advance();
        arguments.push(self.parse_expression(Precedence::Lowest)?);

        while self.peek.is(TokenKind::Comma) {
            self.advance();
            self.advance();
            arguments.push(self.parse_expression(Precedence::Lowest)?);
        }

        if !self.expect_peek(TokenKind::RightParenthesis) {
            return None;
        }
        Some(arguments)
    }
}
