//! Centralised error hierarchy for the interpreter.
//!
//! Every stage converts its failure modes into one of the types defined here:
//!
//! * the scanner and parser produce [`LoxError::Lex`] / [`LoxError::Parse`];
//! * the resolver produces [`ResolveError`]s, collected rather than thrown;
//! * the interpreter produces a single [`RuntimeError`] that aborts the run.
//!
//! [`LoxError`] wraps all of them so the session and the CLI can deal with one
//! type and one `Result<T>` alias.
//!
//! The module **does not** print diagnostics itself; see [`crate::reporter`].

use std::io;
use thiserror::Error;

use log::info;

use crate::token::Token;

/// Canonical error type used throughout the interpreter.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoxError {
    /// Lexical (scanner) error with source line information.
    #[error("[line {line}] Error: {message}")]
    Lex {
        /// Human‑readable description.
        message: String,

        /// 1‑based line where the error occurred.
        line: usize,
    },

    /// Syntactic (parser) error, located at the offending token.
    #[error("[line {line}] Error{location}: {message}")]
    Parse {
        message: String,
        line: usize,
        /// ` at 'lexeme'` or ` at end`.
        location: String,
    },

    /// Static‑analysis failure reported by the resolver.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// Runtime evaluation error.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    /// Wrapper around `std::io::Error` (transparent).  Enables `?` on I/O ops.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// UTF‑8 decoding failure when ingesting external text.
    #[error(transparent)]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl LoxError {
    /// Helper constructor for the **scanner**.
    pub fn lex<S: Into<String>>(line: usize, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Lex error: line={}, msg={}", line, message);

        LoxError::Lex { message, line }
    }

    /// Helper constructor for the **parser**.
    pub fn parse<S: Into<String>>(token: &Token, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Parse error: line={}, msg={}", token.line, message);

        LoxError::Parse {
            message,
            line: token.line,
            location: location_of(token),
        }
    }

    /// `true` for errors that happen before any code runs.
    pub fn is_static(&self) -> bool {
        matches!(
            self,
            LoxError::Lex { .. } | LoxError::Parse { .. } | LoxError::Resolve(_)
        )
    }
}

/// Crate‑wide `Result` alias.
pub type Result<T> = std::result::Result<T, LoxError>;

fn location_of(token: &Token) -> String {
    if token.is_eof() {
        " at end".to_string()
    } else {
        format!(" at '{}'", token.lexeme)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Resolution errors
// ─────────────────────────────────────────────────────────────────────────────

/// What the resolver objected to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ResolveErrorKind {
    #[error("Already a variable with this name in this scope.")]
    DuplicateDeclaration,

    #[error("Can't read local variable in its own initializer.")]
    SelfReferencingInitializer,

    #[error("Can't return from top-level code.")]
    ReturnOutsideFunction,

    #[error("Can't use 'this' outside of a class.")]
    ThisOutsideClass,

    #[error("Can't use 'super' outside of a class.")]
    SuperOutsideClass,

    #[error("Can't use 'super' in a class with no superclass.")]
    SuperWithoutSuperclass,

    #[error("A class can't inherit from itself.")]
    SelfInheritance,
}

/// A single resolver diagnostic. Resolution keeps going after one is found.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("[line {line}] Error{location}: {kind}")]
pub struct ResolveError {
    pub kind: ResolveErrorKind,
    pub line: usize,
    location: String,
}

impl ResolveError {
    pub fn new(kind: ResolveErrorKind, token: &Token) -> Self {
        info!("Creating Resolve error: line={}, kind={:?}", token.line, kind);

        ResolveError {
            kind,
            line: token.line,
            location: location_of(token),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Runtime errors
// ─────────────────────────────────────────────────────────────────────────────

/// What went wrong while evaluating.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeErrorKind {
    #[error("Undefined variable '{0}'.")]
    UndefinedVariable(String),

    #[error("Undefined property '{0}'.")]
    UndefinedProperty(String),

    /// Operand or target of the wrong type; the message names the requirement.
    #[error("{0}")]
    TypeError(&'static str),

    #[error("Expected {expected} arguments but got {actual}.")]
    ArityError { expected: usize, actual: usize },

    #[error("Can only call functions and classes.")]
    NotCallable,

    /// Call nesting went past the interpreter's depth limit.
    #[error("Stack overflow.")]
    StackOverflow,

    #[error("Failed to write output: {0}")]
    Output(String),
}

/// A runtime failure. It unwinds the whole program and is reported once.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind}\n[line {line}]")]
pub struct RuntimeError {
    pub kind: RuntimeErrorKind,
    pub line: usize,
}

impl RuntimeError {
    pub fn new(kind: RuntimeErrorKind, line: usize) -> Self {
        RuntimeError { kind, line }
    }

    pub fn undefined_variable(name: &Token) -> Self {
        Self::new(
            RuntimeErrorKind::UndefinedVariable(name.lexeme.clone()),
            name.line,
        )
    }

    pub fn type_error(token: &Token, message: &'static str) -> Self {
        Self::new(RuntimeErrorKind::TypeError(message), token.line)
    }
}
