use std::io::{self, Write};

use crate::runner::{run_batch, RunOptions};
use crate::session::Session;

/// Interactive prompt. One persistent session, so bindings survive lines
/// that fail; error flags are cleared after every line.
pub fn start(options: &RunOptions) {
    println!("plox {}", env!("CARGO_PKG_VERSION"));
    println!("Type 'exit' or press Ctrl+D to quit");
    println!();

    let mut session = Session::new();

    loop {
        print!("> ");
        if let Err(error) = io::stdout().flush() {
            eprintln!("Error writing prompt: {}", error);
            break;
        }

        let mut line = String::new();
        match io::stdin().read_line(&mut line) {
            Ok(0) => {
                // EOF reached (Ctrl+D or piped input ended)
                println!();
                break;
            }
            Ok(_) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if line == "exit" || line == "quit" {
                    println!("Goodbye!");
                    break;
                }

                run_batch(&mut session, line, None, options);
                session.reset_errors();
            }
            Err(error) => {
                eprintln!("Error reading input: {}", error);
                break;
            }
        }
    }
}
