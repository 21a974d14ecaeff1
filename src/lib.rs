//! Core library entry for the `ripple` CLI.
//!
//! `ripple` builds a static import graph of a JavaScript/TypeScript
//! monorepo, walks it backwards from a set of changed files, and reports
//! which services need rebuilding.

pub mod adapters;
pub mod cassette;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod graph;
pub mod impact;
pub mod ports;
pub mod snapshot;

use clap::error::ErrorKind;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::error::{Result, RippleError};

/// Environment variable holding a `tracing` filter that overrides `-v`.
pub const LOG_ENV: &str = "RIPPLE_LOG";

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error when argument parsing fails or command execution fails.
pub fn run<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match cli::Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.print()?;
            return Ok(());
        }
        Err(err) => return Err(RippleError::Usage(err.to_string())),
    };
    init_logging(cli.verbose);
    commands::dispatch(&cli)
}

/// Installs the stderr subscriber. Later calls (tests) are no-ops.
fn init_logging(verbose: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        })
    });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::run;
    use crate::error::RippleError;

    #[test]
    fn run_prints_version() {
        assert!(run(["ripple", "--version"]).is_ok());
    }

    #[test]
    fn run_errors_on_unknown_subcommand() {
        let err = run(["ripple", "unknown"]).unwrap_err();
        assert!(matches!(err, RippleError::Usage(ref msg) if msg.contains("unrecognized subcommand")));
    }
}
