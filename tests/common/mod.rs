#![allow(dead_code)]

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use rox::lox::Lox;

/// A `Write` sink the test keeps a handle to after giving it away.
#[derive(Clone, Default)]
pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    pub fn lines(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.0.borrow())
            .lines()
            .map(str::to_owned)
            .collect()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A session printing into a buffer the caller can inspect.
pub fn session() -> (Lox, SharedBuffer) {
    let buffer = SharedBuffer::default();
    let lox = Lox::with_output(Box::new(buffer.clone()));
    (lox, buffer)
}

/// Everything a single run produced.
pub struct Outcome {
    pub output: Vec<String>,
    pub diagnostics: Vec<String>,
    pub exit_code: Option<i32>,
}

pub fn run(source: &str) -> Outcome {
    let (mut lox, buffer) = session();
    lox.run(source.as_bytes());

    Outcome {
        output: buffer.lines(),
        diagnostics: lox
            .reporter()
            .diagnostics()
            .iter()
            .map(|d| d.to_string())
            .collect(),
        exit_code: lox.reporter().exit_code(),
    }
}

/// Run a program expected to succeed and return its printed lines.
pub fn output_of(source: &str) -> Vec<String> {
    let outcome = run(source);
    assert!(
        outcome.diagnostics.is_empty(),
        "unexpected diagnostics: {:?}",
        outcome.diagnostics
    );
    outcome.output
}
