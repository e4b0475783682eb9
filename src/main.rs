//! Tally - local-first task list manager

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = tally_cli::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
