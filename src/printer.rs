use crate::ast::{Expr, Program, Stmt};
use crate::value::Value;

/// Renders trees in a fully parenthesized prefix form, e.g.
/// `-123 * (45.67)` becomes `(* (- 123) (group 45.67))`.
pub struct AstPrinter;

impl AstPrinter {
    pub fn print_program(program: &Program) -> Vec<String> {
        program.statements.iter().map(Self::print_stmt).collect()
    }

    pub fn print_stmt(stmt: &Stmt) -> String {
        match stmt {
            Stmt::Expression { expr } => format!("(; {})", Self::print_expr(expr)),
            Stmt::Print { expr, .. } => format!("(print {})", Self::print_expr(expr)),
            Stmt::Var { name, initializer } => match initializer {
                Some(init) => format!("(var {} {})", name.lexeme, Self::print_expr(init)),
                None => format!("(var {})", name.lexeme),
            },
            Stmt::Block { statements } => {
                let mut out = String::from("(block");
                for statement in statements {
                    out.push(' ');
                    out.push_str(&Self::print_stmt(statement));
                }
                out.push(')');
                out
            }
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => match else_branch {
                Some(else_stmt) => format!(
                    "(if {} {} {})",
                    Self::print_expr(condition),
                    Self::print_stmt(then_branch),
                    Self::print_stmt(else_stmt)
                ),
                None => format!(
                    "(if {} {})",
                    Self::print_expr(condition),
                    Self::print_stmt(then_branch)
                ),
            },
            Stmt::While { condition, body } => format!(
                "(while {} {})",
                Self::print_expr(condition),
                Self::print_stmt(body)
            ),
        }
    }

    pub fn print_expr(expr: &Expr) -> String {
        match expr {
            Expr::Literal { value } => match value {
                // Full precision here; rounding is only for `print`.
                Value::Number(n) => n.to_string(),
                other => other.to_string(),
            },
            Expr::Grouping { expr } => Self::parenthesize("group", &[expr.as_ref()]),
            Expr::Unary {
                operator, operand, ..
            } => Self::parenthesize(&operator.to_string(), &[operand.as_ref()]),
            Expr::Binary {
                left,
                operator,
                right,
                ..
            } => Self::parenthesize(&operator.to_string(), &[left.as_ref(), right.as_ref()]),
            Expr::Logical {
                left,
                operator,
                right,
                ..
            } => Self::parenthesize(&operator.to_string(), &[left.as_ref(), right.as_ref()]),
            Expr::Variable { name } => name.lexeme.clone(),
            Expr::Assign { name, value } => format!("(= {} {})", name.lexeme, Self::print_expr(value)),
            Expr::Call {
                callee, arguments, ..
            } => {
                let mut parts: Vec<&Expr> = vec![callee.as_ref()];
                parts.extend(arguments.iter());
                Self::parenthesize("call", &parts)
            }
            Expr::Get { object, name } => {
                format!("(. {} {})", Self::print_expr(object), name.lexeme)
            }
            Expr::Set {
                object,
                name,
                value,
            } => format!(
                "(= {} {} {})",
                Self::print_expr(object),
                name.lexeme,
                Self::print_expr(value)
            ),
            Expr::Super { method, .. } => format!("(super {})", method.lexeme),
            Expr::This { .. } => "this".to_string(),
        }
    }

    fn parenthesize(name: &str, exprs: &[&Expr]) -> String {
        let mut out = format!("({}", name);
        for expr in exprs {
            out.push(' ');
            out.push_str(&Self::print_expr(expr));
        }
        out.push(')');
        out
    }
}
