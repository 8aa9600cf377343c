//! A running session: one interpreter plus the diagnostics it has produced.
//!
//! `run` drives source text through scanner → parser → resolver →
//! interpreter. Globals, closures and resolver annotations persist between
//! calls, which is what the REPL relies on.

use std::io::Write;

use log::{debug, info};

use crate::interpreter::Interpreter;
use crate::parser::Parser;
use crate::reporter::Reporter;
use crate::resolver::Resolver;
use crate::scanner::Scanner;

#[derive(Default)]
pub struct Lox {
    interpreter: Interpreter,
    reporter: Reporter,
}

impl Lox {
    pub fn new() -> Self {
        Self::default()
    }

    /// A session whose `print` output goes to `output`.
    pub fn with_output(output: Box<dyn Write>) -> Self {
        Self {
            interpreter: Interpreter::with_output(output),
            reporter: Reporter::new(),
        }
    }

    pub fn reporter(&self) -> &Reporter {
        &self.reporter
    }

    pub fn reporter_mut(&mut self) -> &mut Reporter {
        &mut self.reporter
    }

    /// Run one chunk of source. Problems end up in [`Self::reporter`]; nothing
    /// executes unless scanning, parsing and resolution were all clean.
    pub fn run(&mut self, source: &[u8]) {
        let (tokens, lex_errors) = Scanner::new(source).scan_all();
        debug!("Scanned {} tokens, {} lex error(s)", tokens.len(), lex_errors.len());

        for error in lex_errors {
            self.reporter.report(error);
        }

        let statements = match Parser::new(tokens).parse() {
            Ok(statements) => statements,
            Err(errors) => {
                for error in errors {
                    self.reporter.report(error);
                }
                return;
            }
        };

        if self.reporter.had_error() {
            return;
        }

        info!("Parsed {} statements", statements.len());

        if let Err(errors) = Resolver::new(&mut self.interpreter).resolve(&statements) {
            for error in errors {
                self.reporter.report(error);
            }
            return;
        }

        if let Err(error) = self.interpreter.interpret(&statements) {
            debug!("Runtime error: {}", error);
            self.reporter.report(error);
        }
    }
}
