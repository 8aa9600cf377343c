use crate::error::{RuntimeError, RuntimeErrorKind};
use crate::token::Token;
use crate::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Shared handle to a scope. Closures, bound methods and the interpreter all
/// hold these, so scopes form a DAG rather than a tree.
pub type EnvRef = Rc<RefCell<Environment>>;

#[derive(Debug, Default)]
pub struct Environment {
    values: HashMap<String, Value>,
    enclosing: Option<EnvRef>,
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: None,
        }
    }

    pub fn with_enclosing(enclosing: EnvRef) -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: Some(enclosing),
        }
    }

    /// A fresh child scope of `enclosing`, already wrapped for sharing.
    pub fn child(enclosing: &EnvRef) -> EnvRef {
        Rc::new(RefCell::new(Environment::with_enclosing(Rc::clone(enclosing))))
    }

    pub fn enclosing(&self) -> Option<EnvRef> {
        self.enclosing.clone()
    }

    /// Bind `name` in this scope, replacing any previous binding here.
    pub fn define(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &Token) -> Result<Value, RuntimeError> {
        if let Some(value) = self.values.get(&name.lexeme) {
            Ok(value.clone())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow().get(name)
        } else {
            Err(RuntimeError::undefined_variable(name))
        }
    }

    /// Overwrite an existing binding, searching outward. Never declares.
    pub fn assign(&mut self, name: &Token, value: Value) -> Result<(), RuntimeError> {
        if let Some(slot) = self.values.get_mut(&name.lexeme) {
            *slot = value;
            Ok(())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow_mut().assign(name, value)
        } else {
            Err(RuntimeError::undefined_variable(name))
        }
    }

    /// Walk exactly `distance` enclosing links from `env`.
    pub fn ancestor(env: &EnvRef, distance: usize) -> Option<EnvRef> {
        let mut current = Rc::clone(env);

        for _ in 0..distance {
            let next = current.borrow().enclosing()?;
            current = next;
        }

        Some(current)
    }

    /// Read `name` from the scope exactly `distance` links up. There is no
    /// fallback search: a miss means the resolver and runtime disagree.
    pub fn get_at(
        env: &EnvRef,
        distance: usize,
        name: &str,
        line: usize,
    ) -> Result<Value, RuntimeError> {
        Self::ancestor(env, distance)
            .and_then(|scope| {
                let value = scope.borrow().values.get(name).cloned();
                value
            })
            .ok_or_else(|| {
                RuntimeError::new(
                    RuntimeErrorKind::UndefinedVariable(name.to_string()),
                    line,
                )
            })
    }

    pub fn assign_at(
        env: &EnvRef,
        distance: usize,
        name: &Token,
        value: Value,
    ) -> Result<(), RuntimeError> {
        let scope = Self::ancestor(env, distance)
            .ok_or_else(|| RuntimeError::undefined_variable(name))?;

        let mut scope = scope.borrow_mut();
        match scope.values.get_mut(&name.lexeme) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(RuntimeError::undefined_variable(name)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenType;

    fn ident(name: &str) -> Token {
        Token::new(TokenType::IDENTIFIER, name, 1)
    }

    #[test]
    fn get_searches_outward() {
        let global = Rc::new(RefCell::new(Environment::new()));
        global.borrow_mut().define("a", Value::Number(1.0));
        let inner = Environment::child(&Environment::child(&global));

        assert_eq!(inner.borrow().get(&ident("a")).unwrap(), Value::Number(1.0));
    }

    #[test]
    fn assign_never_declares() {
        let global = Rc::new(RefCell::new(Environment::new()));
        let err = global
            .borrow_mut()
            .assign(&ident("missing"), Value::Nil)
            .unwrap_err();

        assert_eq!(
            err.kind,
            RuntimeErrorKind::UndefinedVariable("missing".to_string())
        );
        assert!(global.borrow().get(&ident("missing")).is_err());
    }

    #[test]
    fn assign_updates_the_defining_scope() {
        let global = Rc::new(RefCell::new(Environment::new()));
        global.borrow_mut().define("a", Value::Number(1.0));
        let inner = Environment::child(&global);

        inner
            .borrow_mut()
            .assign(&ident("a"), Value::Number(2.0))
            .unwrap();

        assert_eq!(global.borrow().get(&ident("a")).unwrap(), Value::Number(2.0));
    }

    #[test]
    fn get_at_does_not_fall_back() {
        let global = Rc::new(RefCell::new(Environment::new()));
        global.borrow_mut().define("a", Value::Bool(true));
        let middle = Environment::child(&global);
        let inner = Environment::child(&middle);

        assert_eq!(
            Environment::get_at(&inner, 2, "a", 1).unwrap(),
            Value::Bool(true)
        );
        assert!(Environment::get_at(&inner, 1, "a", 1).is_err());
        assert!(Environment::get_at(&inner, 5, "a", 1).is_err());
    }

    #[test]
    fn assign_at_targets_exact_scope() {
        let global = Rc::new(RefCell::new(Environment::new()));
        global.borrow_mut().define("a", Value::Number(1.0));
        let inner = Environment::child(&global);
        inner.borrow_mut().define("a", Value::Number(10.0));

        Environment::assign_at(&inner, 1, &ident("a"), Value::Number(2.0)).unwrap();

        assert_eq!(Environment::get_at(&inner, 0, "a", 1).unwrap(), Value::Number(10.0));
        assert_eq!(Environment::get_at(&inner, 1, "a", 1).unwrap(), Value::Number(2.0));
    }

    #[test]
    fn top_level_redefinition_overwrites() {
        let mut global = Environment::new();
        global.define("a", Value::Number(1.0));
        global.define("a", Value::Number(2.0));

        assert_eq!(global.get(&ident("a")).unwrap(), Value::Number(2.0));
    }
}
