//! Binary entrypoint for the `ripple` CLI.

use std::process::ExitCode;

use ripple::error::RippleError;

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    // Recording is handled in commands::dispatch via RIPPLE_RECORD=<dir>.
    match ripple::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(RippleError::Usage(message)) => {
            eprint!("{message}");
            ExitCode::from(2)
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
