use clap::{Arg, ArgAction, ArgMatches, Command};
use std::fs;
use std::path::Path;

use plox::runner::{self, RunOptions};

fn main() {
    init_tracing();

    let matches = Command::new("plox")
        .about("A tree-walking interpreter for a small dynamically-typed scripting language")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("file")
                .help("The script file to execute")
                .value_name("FILE")
                .index(1),
        )
        .arg(
            Arg::new("interactive")
                .short('i')
                .long("interactive")
                .help("Start in interactive REPL mode")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("pretty")
                .long("pretty")
                .help("Render diagnostics as annotated source reports")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("per-line")
                .long("per-line")
                .help("Run each line of FILE as a separate batch")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("dump-ast")
                .long("dump-ast")
                .help("Print the parsed syntax tree before executing")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let options = run_options(&matches);

    if let Some(file_path) = matches.get_one::<String>("file") {
        run_file(file_path, &options);
    } else {
        plox::start_repl(&options);
    }
}

fn run_options(matches: &ArgMatches) -> RunOptions {
    RunOptions {
        pretty: matches.get_flag("pretty"),
        per_line: matches.get_flag("per-line"),
        dump_ast: matches.get_flag("dump-ast"),
    }
}

fn run_file(path: &str, options: &RunOptions) {
    let path = Path::new(path);

    if !path.exists() {
        eprintln!("Error: File '{}' not found", path.display());
        std::process::exit(1);
    }

    match fs::read_to_string(path) {
        Ok(source) => {
            let filename = path.display().to_string();
            let code = runner::run(&source, Some(&filename), options);
            std::process::exit(code);
        }
        Err(e) => {
            eprintln!("Error reading file '{}': {}", path.display(), e);
            std::process::exit(1);
        }
    }
}

/// Logging stays off unless `RUST_LOG` is set, e.g. `RUST_LOG=plox=debug`.
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .with(EnvFilter::from_default_env())
            .init();
    }
}
