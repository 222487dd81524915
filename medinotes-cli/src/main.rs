//! # Medinotes CLI
//!
//! A thin front end over `medinotes-core`: argument parsing lives in
//! `args.rs`, dispatch and report text in `commands.rs`, user settings in
//! `settings.rs` and user template files in `templates.rs`. Note contents are
//! read as a JSON object mapping field names to a string or an array of strings.
//!
//! Logging goes to stderr through `env_logger`. The default level is `warn`,
//! `--verbose` raises it to `debug`, and `RUST_LOG` overrides both.

mod args;
mod commands;
mod settings;
mod templates;

use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = args::Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();

    match commands::run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
