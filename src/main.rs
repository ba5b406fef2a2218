// Strongbox — Application Entry Point
//
// Parses CLI arguments, initializes structured logging (with a filter that
// never emits secret values), and dispatches to the command handler.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use strongbox::cli::{execute, Cli};
use strongbox::Config;

fn main() -> ExitCode {
    // RUST_LOG=strongbox=debug for verbose output. Logs go to stderr so
    // `get` and `export` output stays clean on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("strongbox=info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    match execute(cli.command, &config) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
