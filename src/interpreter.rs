use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{self, Write};
use std::mem;
use std::rc::Rc;

use log::{debug, info};

use crate::callable::Callable;
use crate::class::{LoxClass, LoxInstance, INITIALIZER};
use crate::environment::{EnvRef, Environment};
use crate::error::{RuntimeError, RuntimeErrorKind};
use crate::expr::{Expr, ExprId, LiteralValue};
use crate::function::{self, LoxFunction, NativeFunction};
use crate::stack;
use crate::stmt::{FunctionDecl, Stmt};
use crate::token::{Token, TokenType};
use crate::value::Value;

/// How a statement finished. `Return` unwinds to the nearest call boundary;
/// it is not an error.
#[derive(Debug)]
pub enum Flow {
    Normal,
    Return(Value),
}

/// Convenient alias for interpreter results.
pub type IResult<T> = Result<T, RuntimeError>;

/// Deepest call nesting allowed before a call fails with `Stack overflow.`
pub const MAX_CALL_DEPTH: usize = 8192;

pub struct Interpreter {
    globals: EnvRef,
    environment: EnvRef,
    /// Resolver output: scope distance for each local variable reference.
    /// Entries live as long as the session, since closures created by an
    /// earlier REPL line can still run.
    locals: HashMap<ExprId, usize>,
    call_depth: usize,
    output: Box<dyn Write>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    /// An interpreter printing to stdout.
    pub fn new() -> Self {
        Self::with_output(Box::new(io::stdout()))
    }

    /// An interpreter printing to `output`, with native functions such as
    /// `clock` defined.
    pub fn with_output(output: Box<dyn Write>) -> Self {
        info!("Initializing Interpreter");

        let globals = Rc::new(RefCell::new(Environment::new()));

        debug!("Defining native function 'clock'");
        globals.borrow_mut().define(
            "clock",
            Value::Callable(Callable::Native(Rc::new(NativeFunction {
                name: "clock",
                arity: 0,
                func: function::clock,
            }))),
        );

        Self {
            environment: Rc::clone(&globals),
            globals,
            locals: HashMap::new(),
            call_depth: 0,
            output,
        }
    }

    /// Record that the reference `id` lives `depth` scopes up. Called by the
    /// resolver.
    pub fn resolve(&mut self, id: ExprId, depth: usize) {
        self.locals.insert(id, depth);
    }

    /// Run a program. The first runtime error stops it.
    pub fn interpret(&mut self, statements: &[Stmt]) -> IResult<()> {
        debug!("Interpreting {} statements", statements.len());

        for stmt in statements {
            // The resolver rejects top-level `return`, so this is always Normal.
            if let Flow::Return(_) = self.execute(stmt)? {
                break;
            }
        }

        info!("Interpretation completed successfully");
        Ok(())
    }

    /// Executes a single statement.
    pub fn execute(&mut self, stmt: &Stmt) -> IResult<Flow> {
        match stmt {
            Stmt::Expression(expr) => {
                self.evaluate(expr)?;
            }

            Stmt::Print { keyword, value } => {
                let value = self.evaluate(value)?;
                writeln!(self.output, "{}", value).map_err(|e| {
                    RuntimeError::new(RuntimeErrorKind::Output(e.to_string()), keyword.line)
                })?;
                debug!("Printed value: {}", value);
            }

            Stmt::Var { name, initializer } => {
                let value = match initializer {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };
                debug!("Defining variable '{}' = {}", name.lexeme, value);
                self.environment.borrow_mut().define(&name.lexeme, value);
            }

            Stmt::Block(statements) => {
                let scope = Environment::child(&self.environment);
                return self.execute_block(statements, scope);
            }

            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.evaluate(condition)?.is_truthy() {
                    return self.execute(then_branch);
                } else if let Some(else_branch) = else_branch {
                    return self.execute(else_branch);
                }
            }

            Stmt::While { condition, body } => {
                while self.evaluate(condition)?.is_truthy() {
                    if let flow @ Flow::Return(_) = self.execute(body)? {
                        return Ok(flow);
                    }
                }
            }

            Stmt::Function(declaration) => {
                debug!("Defining function '{}'", declaration.name.lexeme);
                let function = LoxFunction::new(
                    Rc::clone(declaration),
                    Rc::clone(&self.environment),
                    false,
                );
                self.environment.borrow_mut().define(
                    &declaration.name.lexeme,
                    Value::Callable(Callable::Function(Rc::new(function))),
                );
            }

            Stmt::Return { value, .. } => {
                let value = match value {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };
                debug!("Returning value: {}", value);
                return Ok(Flow::Return(value));
            }

            Stmt::Class {
                name,
                superclass,
                methods,
            } => self.declare_class(name, superclass.as_ref(), methods)?,
        }

        Ok(Flow::Normal)
    }

    /// Run `statements` with `environment` as the active scope. The previous
    /// scope is restored on every exit path, errors included.
    pub fn execute_block(&mut self, statements: &[Stmt], environment: EnvRef) -> IResult<Flow> {
        let previous = mem::replace(&mut self.environment, environment);

        let result = self.execute_all(statements);

        self.environment = previous;
        result
    }

    fn execute_all(&mut self, statements: &[Stmt]) -> IResult<Flow> {
        for stmt in statements {
            if let flow @ Flow::Return(_) = self.execute(stmt)? {
                return Ok(flow);
            }
        }

        Ok(Flow::Normal)
    }

    fn declare_class(
        &mut self,
        name: &Token,
        superclass: Option<&Expr>,
        methods: &[Rc<FunctionDecl>],
    ) -> IResult<()> {
        debug!("Declaring class '{}'", name.lexeme);

        let superclass = match superclass {
            Some(expr) => match self.evaluate(expr)? {
                Value::Callable(Callable::Class(class)) => Some(class),
                _ => {
                    let line = match expr {
                        Expr::Variable { name, .. } => name.line,
                        _ => name.line,
                    };
                    return Err(RuntimeError::new(
                        RuntimeErrorKind::TypeError("Superclass must be a class."),
                        line,
                    ));
                }
            },
            None => None,
        };

        self.environment
            .borrow_mut()
            .define(&name.lexeme, Value::Nil);

        let enclosing = superclass.as_ref().map(|parent| {
            let scope = Environment::child(&self.environment);
            scope.borrow_mut().define(
                "super",
                Value::Callable(Callable::Class(Rc::clone(parent))),
            );
            mem::replace(&mut self.environment, scope)
        });

        let table: HashMap<String, Rc<LoxFunction>> = methods
            .iter()
            .map(|method| {
                let function = LoxFunction::new(
                    Rc::clone(method),
                    Rc::clone(&self.environment),
                    method.name.lexeme == INITIALIZER,
                );
                (method.name.lexeme.clone(), Rc::new(function))
            })
            .collect();

        if let Some(enclosing) = enclosing {
            self.environment = enclosing;
        }

        let class = LoxClass::new(name.lexeme.clone(), superclass, table);
        self.environment
            .borrow_mut()
            .assign(name, Value::Callable(Callable::Class(Rc::new(class))))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Expressions
    // ─────────────────────────────────────────────────────────────────────────

    /// Evaluates an expression and returns a Value.
    pub fn evaluate(&mut self, expr: &Expr) -> IResult<Value> {
        match expr {
            Expr::Literal(literal) => Ok(match literal {
                LiteralValue::Number(n) => Value::Number(*n),
                LiteralValue::Str(s) => Value::String(s.clone()),
                LiteralValue::True => Value::Bool(true),
                LiteralValue::False => Value::Bool(false),
                LiteralValue::Nil => Value::Nil,
            }),

            Expr::Grouping(inner) => self.evaluate(inner),

            Expr::Unary { operator, right } => self.evaluate_unary(operator, right),

            Expr::Binary {
                left,
                operator,
                right,
            } => self.evaluate_binary(left, operator, right),

            Expr::Logical {
                left,
                operator,
                right,
            } => {
                let left = self.evaluate(left)?;

                let short_circuits = match operator.token_type {
                    TokenType::OR => left.is_truthy(),
                    _ => !left.is_truthy(),
                };

                if short_circuits {
                    Ok(left)
                } else {
                    self.evaluate(right)
                }
            }

            Expr::Variable { id, name } => self.look_up_variable(*id, name),

            Expr::Assign { id, name, value } => {
                let value = self.evaluate(value)?;

                match self.locals.get(id) {
                    Some(&distance) => {
                        Environment::assign_at(&self.environment, distance, name, value.clone())?
                    }
                    None => self.globals.borrow_mut().assign(name, value.clone())?,
                }

                Ok(value)
            }

            Expr::Call {
                callee,
                paren,
                arguments,
            } => {
                let callee = self.evaluate(callee)?;

                let mut values = Vec::with_capacity(arguments.len());
                for argument in arguments {
                    values.push(self.evaluate(argument)?);
                }

                let Value::Callable(callable) = callee else {
                    return Err(RuntimeError::new(RuntimeErrorKind::NotCallable, paren.line));
                };

                if values.len() != callable.arity() {
                    return Err(RuntimeError::new(
                        RuntimeErrorKind::ArityError {
                            expected: callable.arity(),
                            actual: values.len(),
                        },
                        paren.line,
                    ));
                }

                if self.call_depth >= MAX_CALL_DEPTH {
                    return Err(RuntimeError::new(
                        RuntimeErrorKind::StackOverflow,
                        paren.line,
                    ));
                }

                self.call_depth += 1;
                let result = stack::ensure_sufficient_stack(|| callable.call(self, values));
                self.call_depth -= 1;

                result
            }

            Expr::Get { object, name } => match self.evaluate(object)? {
                Value::Instance(instance) => LoxInstance::get(&instance, name),
                _ => Err(RuntimeError::type_error(
                    name,
                    "Only instances have properties.",
                )),
            },

            Expr::Set {
                object,
                name,
                value,
            } => {
                let Value::Instance(instance) = self.evaluate(object)? else {
                    return Err(RuntimeError::type_error(name, "Only instances have fields."));
                };

                let value = self.evaluate(value)?;
                instance.set(name, value.clone());

                Ok(value)
            }

            Expr::This { id, keyword } => self.look_up_variable(*id, keyword),

            Expr::Super { id, keyword, method } => self.evaluate_super(*id, keyword, method),
        }
    }

    fn evaluate_unary(&mut self, operator: &Token, right: &Expr) -> IResult<Value> {
        let right = self.evaluate(right)?;

        match operator.token_type {
            TokenType::MINUS => match right {
                Value::Number(n) => Ok(Value::Number(-n)),
                _ => Err(RuntimeError::type_error(
                    operator,
                    "Operand must be a number.",
                )),
            },
            _ => Ok(Value::Bool(!right.is_truthy())),
        }
    }

    fn evaluate_binary(&mut self, left: &Expr, operator: &Token, right: &Expr) -> IResult<Value> {
        let left = self.evaluate(left)?;
        let right = self.evaluate(right)?;

        match operator.token_type {
            TokenType::EQUAL_EQUAL => return Ok(Value::Bool(left == right)),
            TokenType::BANG_EQUAL => return Ok(Value::Bool(left != right)),
            TokenType::PLUS => {
                return match (left, right) {
                    (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
                    (Value::String(a), Value::String(b)) => Ok(Value::String(a + &b)),
                    _ => Err(RuntimeError::type_error(
                        operator,
                        "Operands must be two numbers or two strings.",
                    )),
                };
            }
            _ => {}
        }

        let (Value::Number(a), Value::Number(b)) = (left, right) else {
            return Err(RuntimeError::type_error(
                operator,
                "Operands must be numbers.",
            ));
        };

        Ok(match operator.token_type {
            TokenType::MINUS => Value::from(a - b),
            TokenType::STAR => Value::from(a * b),
            TokenType::SLASH => Value::from(a / b),
            TokenType::GREATER => Value::from(a > b),
            TokenType::GREATER_EQUAL => Value::from(a >= b),
            TokenType::LESS => Value::from(a < b),
            _ => Value::from(a <= b),
        })
    }

    /// `super.method`: the superclass sits at the resolved distance and `this`
    /// exactly one scope closer.
    fn evaluate_super(&mut self, id: ExprId, keyword: &Token, method: &Token) -> IResult<Value> {
        let distance = self
            .locals
            .get(&id)
            .copied()
            .ok_or_else(|| RuntimeError::undefined_variable(keyword))?;

        let Value::Callable(Callable::Class(superclass)) =
            Environment::get_at(&self.environment, distance, "super", keyword.line)?
        else {
            return Err(RuntimeError::type_error(
                keyword,
                "Superclass must be a class.",
            ));
        };

        let this_distance = distance
            .checked_sub(1)
            .ok_or_else(|| RuntimeError::undefined_variable(keyword))?;

        let Value::Instance(object) =
            Environment::get_at(&self.environment, this_distance, "this", keyword.line)?
        else {
            return Err(RuntimeError::type_error(
                keyword,
                "Only instances have properties.",
            ));
        };

        let method = superclass.find_method(&method.lexeme).ok_or_else(|| {
            RuntimeError::new(
                RuntimeErrorKind::UndefinedProperty(method.lexeme.clone()),
                method.line,
            )
        })?;

        Ok(Value::Callable(Callable::Function(Rc::new(
            method.bind(&object),
        ))))
    }

    fn look_up_variable(&self, id: ExprId, name: &Token) -> IResult<Value> {
        match self.locals.get(&id) {
            Some(&distance) => {
                Environment::get_at(&self.environment, distance, &name.lexeme, name.line)
            }
            None => self.globals.borrow().get(name),
        }
    }
}
