//! Superbeads: project scaffolding, sprint tracking and verification for
//! agent-driven coding workflows.
//!
//! This is the main entry point for the `superbeads` CLI. It parses
//! arguments, sets up logging, dispatches to the appropriate command handler,
//! and handles errors with proper exit codes.

mod cli;
mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod events;
pub mod exit_codes;
pub mod fs;
pub mod install;
pub mod packs;
pub mod sprint;
pub mod templates;
pub mod tools;
pub mod verify;

#[cfg(test)]
mod test_support;

use cli::Cli;
use std::process::ExitCode;

/// Diagnostics go to stderr. RUST_LOG takes precedence over `-v`.
fn init_logging(verbosity: u8) {
    let mut builder = env_logger::Builder::new();

    if std::env::var("RUST_LOG").is_ok() {
        builder.parse_default_env();
    } else {
        builder.filter_level(match verbosity {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        });
    }

    builder
        .format_timestamp(None)
        .target(env_logger::Target::Stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    init_logging(cli.verbose);
    log::debug!("superbeads {} starting", env!("CARGO_PKG_VERSION"));

    match commands::dispatch(cli.command) {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(err) => {
            // Print user-actionable error message to stderr
            eprintln!("Error: {}", err);

            ExitCode::from(err.exit_code() as u8)
        }
    }
}
