//! Parenthesised prefix rendering of the AST, for the `parse` subcommand and
//! for eyeballing what the parser produced.

use crate::expr::{Expr, LiteralValue};
use crate::stmt::{FunctionDecl, Stmt};

pub struct AstPrinter;

impl AstPrinter {
    pub fn print_expr(&self, expr: &Expr) -> String {
        match expr {
            Expr::Literal(literal) => match literal {
                LiteralValue::Number(n) => {
                    if n.fract() == 0.0 {
                        format!("{:.1}", n)
                    } else {
                        n.to_string()
                    }
                }
                LiteralValue::Str(s) => s.clone(),
                LiteralValue::True => "true".to_string(),
                LiteralValue::False => "false".to_string(),
                LiteralValue::Nil => "nil".to_string(),
            },

            Expr::Unary { operator, right } => self.parenthesize(&operator.lexeme, &[&**right]),

            Expr::Binary {
                left,
                operator,
                right,
            }
            | Expr::Logical {
                left,
                operator,
                right,
            } => self.parenthesize(&operator.lexeme, &[&**left, &**right]),

            Expr::Grouping(inner) => self.parenthesize("group", &[&**inner]),

            Expr::Variable { name, .. } => name.lexeme.clone(),

            Expr::Assign { name, value, .. } => {
                self.parenthesize(&format!("= {}", name.lexeme), &[&**value])
            }

            Expr::Call {
                callee, arguments, ..
            } => {
                let mut parts = vec![self.print_expr(callee)];
                parts.extend(arguments.iter().map(|arg| self.print_expr(arg)));
                format!("(call {})", parts.join(" "))
            }

            Expr::Get { object, name } => {
                format!("(. {} {})", self.print_expr(object), name.lexeme)
            }

            Expr::Set {
                object,
                name,
                value,
            } => format!(
                "(= (. {} {}) {})",
                self.print_expr(object),
                name.lexeme,
                self.print_expr(value)
            ),

            Expr::This { .. } => "this".to_string(),

            Expr::Super { method, .. } => format!("(super {})", method.lexeme),
        }
    }

    pub fn print_stmt(&self, stmt: &Stmt) -> String {
        match stmt {
            Stmt::Expression(expr) => format!("(; {})", self.print_expr(expr)),

            Stmt::Print { value, .. } => self.parenthesize("print", &[value]),

            Stmt::Var { name, initializer } => match initializer {
                Some(init) => format!("(var {} {})", name.lexeme, self.print_expr(init)),
                None => format!("(var {})", name.lexeme),
            },

            Stmt::Block(statements) => self.block("block", statements),

            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => match else_branch {
                Some(else_branch) => format!(
                    "(if-else {} {} {})",
                    self.print_expr(condition),
                    self.print_stmt(then_branch),
                    self.print_stmt(else_branch)
                ),
                None => format!(
                    "(if {} {})",
                    self.print_expr(condition),
                    self.print_stmt(then_branch)
                ),
            },

            Stmt::While { condition, body } => format!(
                "(while {} {})",
                self.print_expr(condition),
                self.print_stmt(body)
            ),

            Stmt::Function(declaration) => self.function(declaration),

            Stmt::Return { value, .. } => match value {
                Some(value) => self.parenthesize("return", &[value]),
                None => "(return)".to_string(),
            },

            Stmt::Class {
                name,
                superclass,
                methods,
            } => {
                let mut out = format!("(class {}", name.lexeme);
                if let Some(superclass) = superclass {
                    out.push_str(&format!(" < {}", self.print_expr(superclass)));
                }
                for method in methods {
                    out.push(' ');
                    out.push_str(&self.function(method));
                }
                out.push(')');
                out
            }
        }
    }

    fn function(&self, declaration: &FunctionDecl) -> String {
        let params: Vec<&str> = declaration
            .params
            .iter()
            .map(|p| p.lexeme.as_str())
            .collect();

        let mut out = format!(
            "(fun {} ({})",
            declaration.name.lexeme,
            params.join(" ")
        );
        for stmt in &declaration.body {
            out.push(' ');
            out.push_str(&self.print_stmt(stmt));
        }
        out.push(')');
        out
    }

    fn block(&self, name: &str, statements: &[Stmt]) -> String {
        let mut out = format!("({}", name);
        for stmt in statements {
            out.push(' ');
            out.push_str(&self.print_stmt(stmt));
        }
        out.push(')');
        out
    }

    fn parenthesize(&self, name: &str, exprs: &[&Expr]) -> String {
        let mut out = format!("({}", name);
        for expr in exprs {
            out.push(' ');
            out.push_str(&self.print_expr(expr));
        }
        out.push(')');
        out
    }
}
