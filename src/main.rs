// Entrypoint for the CLI application.
// - Keeps `main` small: parse flags, set up logging, hand over to `cli::run`.
// - Any error is printed to stderr and turns into exit code 1.

use clap::Parser;
use gyazo_cli::cli::{self, Args};
use log::LevelFilter;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = Args::parse();

    // Logs go to stderr; `RUST_LOG` overrides the level picked here.
    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    match cli::run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{:#}", e);
            ExitCode::from(1)
        }
    }
}
