//! Diagnostics sink shared by every stage.
//!
//! The scanner, parser, resolver and interpreter all report here; the driver
//! reads the accumulated state to print messages and pick an exit status.

use log::debug;

use crate::error::LoxError;
use crate::token::Token;

/// Exit status for syntax and resolution errors.
pub const EXIT_STATIC_ERROR: i32 = 65;
/// Exit status for runtime errors.
pub const EXIT_RUNTIME_ERROR: i32 = 70;

#[derive(Debug, Default)]
pub struct Reporter {
    diagnostics: Vec<LoxError>,
}

impl Reporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report a problem known only by line.
    pub fn error(&mut self, line: usize, message: impl Into<String>) {
        self.report(LoxError::lex(line, message));
    }

    /// Report a problem located at `token`.
    pub fn error_at(&mut self, token: &Token, message: impl Into<String>) {
        self.report(LoxError::parse(token, message));
    }

    pub fn report(&mut self, error: impl Into<LoxError>) {
        let error = error.into();
        debug!("Reported: {}", error);
        self.diagnostics.push(error);
    }

    /// Any syntax or resolution error so far.
    pub fn had_error(&self) -> bool {
        self.diagnostics.iter().any(LoxError::is_static)
    }

    pub fn had_runtime_error(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|e| matches!(e, LoxError::Runtime(_)))
    }

    /// `None` when nothing went wrong.
    pub fn exit_code(&self) -> Option<i32> {
        if self.had_runtime_error() {
            Some(EXIT_RUNTIME_ERROR)
        } else if self.had_error() {
            Some(EXIT_STATIC_ERROR)
        } else {
            None
        }
    }

    pub fn diagnostics(&self) -> &[LoxError] {
        &self.diagnostics
    }

    /// Forget everything reported so far (between REPL lines).
    pub fn reset(&mut self) {
        self.diagnostics.clear();
    }
}
