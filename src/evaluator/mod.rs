use crate::environment::{lookup_builtin, Environment};
use crate::parser::expression::{Expression, Identifier, InfixOperator, PrefixOperator};
use crate::parser::statement::{BlockStatement, Statement};
use crate::parser::Program;
use crate::value::error::RuntimeError;
use crate::value::{Function, Value};
use std::cell::Cell;
use std::rc::Rc;

/// If less than this much stack remains, a new segment is allocated.
const RED_ZONE: usize = 100 * 1024;
/// Size of each newly allocated stack segment.
const STACK_PER_RECURSION: usize = 1024 * 1024;
/// Default limit on nested user function calls.
pub const MAX_CALL_DEPTH: usize = 100_000;

/// Evaluates a program in the given environment.
///
/// Runtime errors come back as [`Value::Error`]. A program whose final statement
/// produces nothing evaluates to [`Value::Null`].
pub fn evaluate(program: &Program, environment: &Environment) -> Value {
    evaluate_program(program, environment).unwrap_or(Value::Null)
}

/// Like [`evaluate`] but distinguishes a program without a final value, such as
/// one ending in a `let`.
pub fn evaluate_program(program: &Program, environment: &Environment) -> Option<Value> {
    TreeWalkEvaluator::create().evaluate_to_value(program, environment)
}

/// Anything that cuts evaluation short before a value is produced.
#[derive(Debug)]
enum Unwind {
    /// A `return` on its way to the enclosing call or the program root.
    Return(Value),
    Error(RuntimeError),
}

impl From<RuntimeError> for Unwind {
    fn from(value: RuntimeError) -> Self {
        Self::Error(value)
    }
}

type Flow<T> = Result<T, Unwind>;

/// Tree walker. Both errors and `return` travel on the `Err` side of every step so
/// that `?` stops at the first one. Function calls and the program root catch
/// `return`; only the root turns an error into a value.
pub struct TreeWalkEvaluator {
    depth: Cell<usize>,
    max_depth: usize,
}

impl TreeWalkEvaluator {
    pub fn create() -> Self {
        Self::with_max_depth(MAX_CALL_DEPTH)
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            depth: Cell::new(0),
            max_depth,
        }
    }

    pub fn evaluate_program(
        &self,
        program: &Program,
        environment: &Environment,
    ) -> Result<Option<Value>, RuntimeError> {
        let mut result = None;
        for stmt in program.iter() {
            match self.interpret_statement(stmt, environment) {
                Ok(value) => result = value,
                Err(Unwind::Return(value)) => return Ok(Some(value)),
                Err(Unwind::Error(error)) => return Err(error),
            }
        }
        Ok(result)
    }

    /// Runs a program, reporting a runtime error as [`Value::Error`].
    pub fn evaluate_to_value(&self, program: &Program, environment: &Environment) -> Option<Value> {
        match self.evaluate_program(program, environment) {
            Ok(value) => value,
            Err(error) => {
                tracing::debug!(code = error.code(), %error, "runtime error");
                Some(Value::Error(error))
            }
        }
    }
}

impl Default for TreeWalkEvaluator {
    fn default() -> Self {
        Self::create()
    }
}

// Statement interpreter
impl TreeWalkEvaluator {
    fn interpret_statement(
        &self,
        statement: &Statement,
        environment: &Environment,
    ) -> Flow<Option<Value>> {
        tracing::trace!(%statement, "interpret");
        match statement {
            Statement::Let { name, value } => {
                let value = self.evaluate_expression(value, environment)?;
                environment.set(&name.name, value);
                Ok(None)
            }
            Statement::Return(value) => {
                let value = self.evaluate_expression(value, environment)?;
                Err(Unwind::Return(value))
            }
            Statement::Expression(expr) => Ok(Some(self.evaluate_expression(expr, environment)?)),
            Statement::Block(block) => self.interpret_block_statement(block, environment),
        }
    }

    fn interpret_block_statement(
        &self,
        block: &BlockStatement,
        environment: &Environment,
    ) -> Flow<Option<Value>> {
        let mut result = None;
        for stmt in block.iter() {
            result = self.interpret_statement(stmt, environment)?;
        }
        Ok(result)
    }
}

// Expression evaluator
impl TreeWalkEvaluator {
    fn evaluate_expression(&self, expr: &Expression, environment: &Environment) -> Flow<Value> {
        stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, || {
            self.evaluate_expression_inner(expr, environment)
        })
    }

    fn evaluate_expression_inner(
        &self,
        expr: &Expression,
        environment: &Environment,
    ) -> Flow<Value> {
        let result = match expr {
            Expression::Identifier(ident) => self.read_variable(ident, environment)?,
            Expression::IntegerLiteral(v) => Value::Integer(*v),
            Expression::StringLiteral(v) => Value::String(v.clone()),
            Expression::BooleanLiteral(v) => Value::Boolean(*v),
            Expression::Prefix { operator, operand } => {
                let operand = self.evaluate_expression(operand, environment)?;
                self.evaluate_prefix(*operator, &operand)?
            }
            Expression::Infix { operator, lhs, rhs } => {
                let lhs = self.evaluate_expression(lhs, environment)?;
                let rhs = self.evaluate_expression(rhs, environment)?;
                self.evaluate_infix(*operator, &lhs, &rhs)?
            }
            Expression::If {
                condition,
                consequence,
                alternative,
            } => {
                let condition = self.evaluate_expression(condition, environment)?;
                let branch = if condition.is_truthy() {
                    Some(consequence)
                } else {
                    alternative.as_ref()
                };
                match branch {
                    Some(block) => self
                        .interpret_block_statement(block, environment)?
                        .unwrap_or(Value::Null),
                    None => Value::Null,
                }
            }
            Expression::Function { parameters, body } => Value::Function(Rc::new(Function {
                parameters: parameters.clone(),
                body: body.clone(),
                closure: environment.clone(),
            })),
            Expression::Call { callee, arguments } => {
                let callee = self.evaluate_expression(callee, environment)?;
                let arguments = arguments
                    .iter()
                    .map(|argument| self.evaluate_expression(argument, environment))
                    .collect::<Flow<Vec<_>>>()?;
                self.apply_function(&callee, arguments)?
            }
        };
        Ok(result)
    }

    fn read_variable(
        &self,
        ident: &Identifier,
        environment: &Environment,
    ) -> Result<Value, RuntimeError> {
        environment
            .get(&ident.name)
            .or_else(|| lookup_builtin(&ident.name))
            .ok_or_else(|| RuntimeError::IdentifierNotFound(ident.name.clone()))
    }

    fn evaluate_prefix(
        &self,
        operator: PrefixOperator,
        operand: &Value,
    ) -> Result<Value, RuntimeError> {
        type Operator = PrefixOperator;
        match (operator, operand) {
            (Operator::Bang, v) => Ok(Value::Boolean(v.logical_not())),
            (Operator::Minus, Value::Integer(v)) => Ok(Value::Integer(v.wrapping_neg())),
            (Operator::Minus, v) => Err(RuntimeError::UnknownPrefixOperator {
                operator,
                operand: v.kind(),
            }),
        }
    }

    fn evaluate_infix(
        &self,
        operator: InfixOperator,
        lhs: &Value,
        rhs: &Value,
    ) -> Result<Value, RuntimeError> {
        type Operator = InfixOperator;
        match (operator, lhs, rhs) {
            (_, Value::Integer(lhs), Value::Integer(rhs)) => {
                self.evaluate_integer_infix(operator, *lhs, *rhs)
            }
            (Operator::EqualEqual, _, _) => Ok(Value::Boolean(lhs.is_equal(rhs))),
            (Operator::BangEqual, _, _) => Ok(Value::Boolean(!lhs.is_equal(rhs))),
            _ if lhs.kind() != rhs.kind() => Err(RuntimeError::TypeMismatch {
                lhs: lhs.kind(),
                operator,
                rhs: rhs.kind(),
            }),
            (Operator::Add, Value::String(lhs), Value::String(rhs)) => {
                let mut result = lhs.clone();
                result.push_str(rhs);
                Ok(Value::String(result))
            }
            _ => Err(RuntimeError::UnknownInfixOperator {
                lhs: lhs.kind(),
                operator,
                rhs: rhs.kind(),
            }),
        }
    }

    fn evaluate_integer_infix(
        &self,
        operator: InfixOperator,
        lhs: i64,
        rhs: i64,
    ) -> Result<Value, RuntimeError> {
        type Operator = InfixOperator;
        let result = match operator {
            Operator::Add => Value::Integer(lhs.wrapping_add(rhs)),
            Operator::Subtract => Value::Integer(lhs.wrapping_sub(rhs)),
            Operator::Multiply => Value::Integer(lhs.wrapping_mul(rhs)),
            Operator::Divide => {
                if rhs == 0 {
                    return Err(RuntimeError::DivisionByZero);
                }
                Value::Integer(lhs.wrapping_div(rhs))
            }
            Operator::LessThan => Value::Boolean(lhs < rhs),
            Operator::GreaterThan => Value::Boolean(lhs > rhs),
            Operator::EqualEqual => Value::Boolean(lhs == rhs),
            Operator::BangEqual => Value::Boolean(lhs != rhs),
        };
        Ok(result)
    }

    #[tracing::instrument(level = "debug", skip_all, fields(callee = %callee.kind(), arguments = arguments.len()))]
    fn apply_function(&self, callee: &Value, arguments: Vec<Value>) -> Result<Value, RuntimeError> {
        match callee {
            Value::Function(function) => {
                let depth = self.depth.get();
                if depth >= self.max_depth {
                    return Err(RuntimeError::StackOverflow {
                        depth: self.max_depth,
                    });
                }
                self.depth.set(depth + 1);
                let result = self.evaluate_function(function, arguments);
                self.depth.set(depth);
                result
            }
            Value::Builtin(fun) => fun.call(&arguments).into_result(),
            v => Err(RuntimeError::NotAFunction(v.kind())),
        }
    }

    fn evaluate_function(
        &self,
        function: &Function,
        arguments: Vec<Value>,
    ) -> Result<Value, RuntimeError> {
        // Check that the argument list is the same length as the parameter list.
        if arguments.len() != function.parameters.len() {
            return Err(RuntimeError::InvalidArgumentCount {
                actual: arguments.len(),
                expected: function.parameters.len(),
            });
        }

        let inner_scope = Environment::new_enclosed(&function.closure);
        for (ident, argument) in function.parameters.iter().zip(arguments) {
            inner_scope.set(&ident.name, argument);
        }

        match self.interpret_block_statement(&function.body, &inner_scope) {
            Ok(value) => Ok(value.unwrap_or(Value::Null)),
            Err(Unwind::Return(value)) => Ok(value),
            Err(Unwind::Error(error)) => Err(error),
        }
    }
}
