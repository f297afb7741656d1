use std::io::{Stdout, Write};

use crate::ast::Program;
use crate::error::PloxError;
use crate::interpreter::Interpreter;
use crate::parser::Parser;
use crate::scanner::Scanner;

/// Runs batches of source through scan, parse and execute against one
/// persistent interpreter, tracking the error flags a driver polls.
pub struct Session<W: Write = Stdout> {
    interpreter: Interpreter<W>,
    had_error: bool,
    had_runtime_error: bool,
}

impl Session<Stdout> {
    pub fn new() -> Self {
        Self::with_interpreter(Interpreter::new())
    }
}

impl Default for Session<Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> Session<W> {
    pub fn with_output(output: W) -> Self {
        Self::with_interpreter(Interpreter::with_output(output))
    }

    fn with_interpreter(interpreter: Interpreter<W>) -> Self {
        Self {
            interpreter,
            had_error: false,
            had_runtime_error: false,
        }
    }

    /// True once a batch has hit a scan or parse error, until reset.
    pub fn had_error(&self) -> bool {
        self.had_error
    }

    /// True once a batch has hit a runtime error, until reset.
    pub fn had_runtime_error(&self) -> bool {
        self.had_runtime_error
    }

    pub fn reset_errors(&mut self) {
        self.had_error = false;
        self.had_runtime_error = false;
    }

    /// Scans and parses one batch. Scan errors do not stop parsing, so the
    /// result carries every compile-time error in the batch.
    pub fn parse(&mut self, source: &str) -> Result<Program, Vec<PloxError>> {
        let scanned = Scanner::new(source).scan_tokens();
        let mut errors = scanned.errors;

        let parsed = Parser::new(scanned.tokens).parse();
        let program = match parsed {
            Ok(program) => Some(program),
            Err(parse_errors) => {
                errors.extend(parse_errors);
                None
            }
        };

        match program {
            Some(program) if errors.is_empty() => Ok(program),
            _ => {
                self.had_error = true;
                Err(errors)
            }
        }
    }

    pub fn execute(&mut self, program: &Program) -> Result<(), PloxError> {
        self.interpreter.interpret(program).map_err(|error| {
            self.had_runtime_error = true;
            error
        })
    }

    /// Runs one batch end to end and returns its diagnostics, in the order
    /// they were found. Nothing executes if any compile-time error occurred.
    #[tracing::instrument(level = "debug", skip_all, fields(bytes = source.len()))]
    pub fn run(&mut self, source: &str) -> Vec<PloxError> {
        match self.parse(source) {
            Ok(program) => match self.execute(&program) {
                Ok(()) => Vec::new(),
                Err(error) => vec![error],
            },
            Err(errors) => errors,
        }
    }
}

impl Session<Vec<u8>> {
    /// Everything `print` has written so far.
    pub fn printed(&self) -> String {
        String::from_utf8_lossy(self.interpreter.output()).into_owned()
    }
}
