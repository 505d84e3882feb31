//! Core library entry for the `sheetcheck` CLI.
//!
//! `sheetcheck` validates the sheets of a workbook against business rules
//! and reconciles the resulting findings with a persisted task list, keeping
//! task identity, creation dates and operator-pinned tasks stable across runs.

pub mod adapters;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod logging;
pub mod ports;
pub mod sheet;
pub mod store;
pub mod tasks;
pub mod validate;

#[cfg(test)]
mod testing;

use clap::error::ErrorKind;
use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
/// `--help` and `--version` print to stdout and succeed.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match cli::Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) if is_informational(err.kind()) => {
            return err.print().map_err(|e| format!("Failed to print help: {e}"));
        }
        Err(err) => return Err(err.to_string()),
    };
    commands::dispatch(&cli)
}

fn is_informational(kind: ErrorKind) -> bool {
    matches!(kind, ErrorKind::DisplayHelp | ErrorKind::DisplayVersion)
}
