//! # Heartcalc Terminal Entry Point
//!
//! The actual setup is in lib.rs for better testability.

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match heartcalc_terminal_lib::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("heartcalc: {err}");
            ExitCode::FAILURE
        }
    }
}
