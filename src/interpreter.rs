use std::io::{self, Stdout, Write};

use crate::ast::{BinaryOp, Expr, LogicalOp, Program, Stmt, UnaryOp};
use crate::environment::{Environments, ScopeId};
use crate::error::PloxError;
use crate::stack::ensure_sufficient_stack;
use crate::token::Token;
use crate::value::Value;

/// Tree-walking evaluator. The global scope survives across calls to
/// [`Interpreter::interpret`], so a REPL keeps its bindings after an error.
pub struct Interpreter<W: Write = Stdout> {
    environments: Environments,
    current: ScopeId,
    output: W,
}

impl Interpreter<Stdout> {
    pub fn new() -> Self {
        Self::with_output(io::stdout())
    }
}

impl Default for Interpreter<Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> Interpreter<W> {
    /// Builds an interpreter whose `print` statements write to `output`.
    pub fn with_output(output: W) -> Self {
        let environments = Environments::new();
        let current = environments.global();
        Self {
            environments,
            current,
            output,
        }
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Executes statements in order, stopping at the first runtime error.
    pub fn interpret(&mut self, program: &Program) -> Result<(), PloxError> {
        let result = program
            .statements
            .iter()
            .try_for_each(|statement| self.execute(statement));

        if let Err(error) = &result {
            tracing::debug!(line = error.line(), "runtime error aborted batch");
        }
        result
    }

    fn execute(&mut self, stmt: &Stmt) -> Result<(), PloxError> {
        ensure_sufficient_stack(|| self.execute_stmt(stmt))
    }

    fn execute_stmt(&mut self, stmt: &Stmt) -> Result<(), PloxError> {
        match stmt {
            Stmt::Expression { expr } => {
                self.evaluate(expr)?;
                Ok(())
            }
            Stmt::Print { keyword, expr } => {
                let value = self.evaluate(expr)?;
                writeln!(self.output, "{}", value).map_err(|e| {
                    PloxError::runtime_error(keyword, format!("Failed to write output: {}", e))
                })
            }
            Stmt::Var { name, initializer } => {
                let value = match initializer {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };
                self.environments.define(self.current, &name.lexeme, value);
                Ok(())
            }
            Stmt::Block { statements } => self.execute_block(statements),
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.evaluate(condition)?.is_truthy() {
                    self.execute(then_branch)
                } else if let Some(else_stmt) = else_branch {
                    self.execute(else_stmt)
                } else {
                    Ok(())
                }
            }
            Stmt::While { condition, body } => {
                while self.evaluate(condition)?.is_truthy() {
                    self.execute(body)?;
                }
                Ok(())
            }
        }
    }

    /// Runs `statements` in a fresh scope. The enclosing scope is restored
    /// and the new one released whether or not a statement fails.
    fn execute_block(&mut self, statements: &[Stmt]) -> Result<(), PloxError> {
        let previous = self.current;
        let scope = self.environments.push(previous);
        self.current = scope;
        tracing::trace!(depth = self.environments.depth(), "entered block");

        let result = statements
            .iter()
            .try_for_each(|statement| self.execute(statement));

        self.current = previous;
        self.environments.pop(scope);
        tracing::trace!(depth = self.environments.depth(), "left block");
        result
    }

    pub fn evaluate(&mut self, expr: &Expr) -> Result<Value, PloxError> {
        ensure_sufficient_stack(|| self.evaluate_expr(expr))
    }

    fn evaluate_expr(&mut self, expr: &Expr) -> Result<Value, PloxError> {
        match expr {
            Expr::Literal { value } => Ok(value.clone()),
            Expr::Grouping { expr } => self.evaluate(expr),
            Expr::Variable { name } => self
                .environments
                .get(self.current, &name.lexeme)
                .cloned()
                .map_err(|e| PloxError::runtime_error(name, e.to_string())),
            Expr::Assign { name, value } => {
                let value = self.evaluate(value)?;
                self.environments
                    .assign(self.current, &name.lexeme, value.clone())
                    .map_err(|e| {
                        PloxError::runtime_error_with_help(
                            name,
                            e.to_string(),
                            format!("Declare it first: var {} = ...;", name.lexeme),
                        )
                    })?;
                Ok(value)
            }
            Expr::Unary {
                operator,
                token,
                operand,
            } => {
                let operand = self.evaluate(operand)?;
                match operator {
                    UnaryOp::Not => Ok(Value::Bool(!operand.is_truthy())),
                    UnaryOp::Negate => match operand {
                        Value::Number(n) => Ok(Value::Number(-n)),
                        other => Err(PloxError::runtime_error_with_help(
                            token,
                            "Operand must be a number.",
                            format!("Cannot negate {}.", other.type_name()),
                        )),
                    },
                }
            }
            Expr::Binary {
                left,
                operator,
                token,
                right,
            } => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                evaluate_binary_op(*operator, token, left, right)
            }
            Expr::Logical {
                left,
                operator,
                right,
                ..
            } => {
                let left = self.evaluate(left)?;

                match operator {
                    LogicalOp::Or if left.is_truthy() => Ok(left),
                    LogicalOp::And if !left.is_truthy() => Ok(left),
                    _ => self.evaluate(right),
                }
            }
            Expr::Call { paren, .. } => Err(PloxError::runtime_error_with_help(
                paren,
                "Can only call functions and classes.",
                "User-defined functions are not supported.",
            )),
            Expr::Get { name, .. } | Expr::Set { name, .. } => {
                Err(PloxError::runtime_error_with_help(
                    name,
                    "Only instances have properties.",
                    "Classes and instances are not supported.",
                ))
            }
            Expr::Super { keyword, .. } => Err(PloxError::runtime_error(
                keyword,
                "Can't use 'super' outside of a class.",
            )),
            Expr::This { keyword } => Err(PloxError::runtime_error(
                keyword,
                "Can't use 'this' outside of a class.",
            )),
        }
    }
}

fn evaluate_binary_op(
    operator: BinaryOp,
    token: &Token,
    left: Value,
    right: Value,
) -> Result<Value, PloxError> {
    match operator {
        BinaryOp::Add => match (left, right) {
            (Value::Number(l), Value::Number(r)) => Ok(Value::Number(l + r)),
            (Value::String(l), Value::String(r)) => Ok(Value::String(l + &r)),
            (l, r) => Err(PloxError::runtime_error_with_help(
                token,
                "Operands must be two numbers or strings.",
                format!("Cannot add {} and {}.", l.type_name(), r.type_name()),
            )),
        },
        BinaryOp::Subtract => {
            let (l, r) = number_operands(token, &left, &right)?;
            Ok(Value::Number(l - r))
        }
        BinaryOp::Multiply => {
            let (l, r) = number_operands(token, &left, &right)?;
            Ok(Value::Number(l * r))
        }
        BinaryOp::Divide => {
            let (l, r) = number_operands(token, &left, &right)?;
            if r == 0.0 {
                Err(PloxError::runtime_error(token, "Division by zero."))
            } else {
                Ok(Value::Number(l / r))
            }
        }
        BinaryOp::Greater => {
            let (l, r) = number_operands(token, &left, &right)?;
            Ok(Value::Bool(l > r))
        }
        BinaryOp::GreaterEqual => {
            let (l, r) = number_operands(token, &left, &right)?;
            Ok(Value::Bool(l >= r))
        }
        BinaryOp::Less => {
            let (l, r) = number_operands(token, &left, &right)?;
            Ok(Value::Bool(l < r))
        }
        BinaryOp::LessEqual => {
            let (l, r) = number_operands(token, &left, &right)?;
            Ok(Value::Bool(l <= r))
        }
        BinaryOp::Equal => Ok(Value::Bool(left == right)),
        BinaryOp::NotEqual => Ok(Value::Bool(left != right)),
    }
}

fn number_operands(token: &Token, left: &Value, right: &Value) -> Result<(f64, f64), PloxError> {
    match (left.as_number(), right.as_number()) {
        (Some(l), Some(r)) => Ok((l, r)),
        _ => Err(PloxError::runtime_error_with_help(
            token,
            "Operands must be numbers.",
            format!(
                "'{}' got {} and {}.",
                token.lexeme,
                left.type_name(),
                right.type_name()
            ),
        )),
    }
}
