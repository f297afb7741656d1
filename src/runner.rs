use std::io::Write;

use crate::error::PloxError;
use crate::printer::AstPrinter;
use crate::session::Session;

pub const EXIT_OK: i32 = 0;
pub const EXIT_COMPILE_ERROR: i32 = 65;
pub const EXIT_RUNTIME_ERROR: i32 = 70;

/// Driver settings taken from the command line.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Render diagnostics as annotated source reports instead of plain lines.
    pub pretty: bool,
    /// Treat every physical line of a file as its own batch.
    pub per_line: bool,
    /// Print each parsed statement in parenthesized form before running it.
    pub dump_ast: bool,
}

/// Errors seen across all batches of one run, for the process exit code.
#[derive(Debug, Clone, Copy, Default)]
struct Outcome {
    compile_error: bool,
    runtime_error: bool,
}

impl Outcome {
    fn exit_code(self) -> i32 {
        if self.compile_error {
            EXIT_COMPILE_ERROR
        } else if self.runtime_error {
            EXIT_RUNTIME_ERROR
        } else {
            EXIT_OK
        }
    }
}

/// Runs a whole script and returns the process exit code.
pub fn run(source: &str, filename: Option<&str>, options: &RunOptions) -> i32 {
    let mut session = Session::new();
    let mut outcome = Outcome::default();

    if options.per_line {
        for line in source.lines() {
            run_batch(&mut session, line, filename, options);
            record(&mut session, &mut outcome);
        }
    } else {
        run_batch(&mut session, source, filename, options);
        record(&mut session, &mut outcome);
    }

    outcome.exit_code()
}

fn record<W: Write>(session: &mut Session<W>, outcome: &mut Outcome) {
    outcome.compile_error |= session.had_error();
    outcome.runtime_error |= session.had_runtime_error();
    session.reset_errors();
}

/// Runs one batch on `session`, reporting its diagnostics. The session's
/// error flags are left set for the caller to observe.
pub fn run_batch<W: Write>(
    session: &mut Session<W>,
    source: &str,
    filename: Option<&str>,
    options: &RunOptions,
) {
    if !options.dump_ast {
        let errors = session.run(source);
        report(&errors, source, filename, options);
        return;
    }

    match session.parse(source) {
        Ok(program) => {
            for line in AstPrinter::print_program(&program) {
                println!("{}", line);
            }
            if let Err(error) = session.execute(&program) {
                report(&[error], source, filename, options);
            }
        }
        Err(errors) => report(&errors, source, filename, options),
    }
}

pub fn report(errors: &[PloxError], source: &str, filename: Option<&str>, options: &RunOptions) {
    for error in errors {
        if options.pretty {
            if let Err(io_error) = error.report(source, filename) {
                tracing::warn!(%io_error, "could not render report");
                eprintln!("{}", error);
            }
        } else {
            eprintln!("{}", error);
        }
    }
}
