//! Binary entrypoint for the `sheetcheck` CLI.

use std::process::ExitCode;

fn main() -> ExitCode {
    match sheetcheck::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
