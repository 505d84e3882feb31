//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI parser for `sheetcheck`.
#[derive(Debug, Parser)]
#[command(
    name = "sheetcheck",
    version,
    about = "Validate spreadsheet records and keep a reconciled task list"
)]
pub struct Cli {
    /// Workbook directory (overrides configuration).
    #[arg(long, global = true, value_name = "DIR")]
    pub workbook: Option<PathBuf>,

    /// YAML configuration file.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Validate every source sheet and reconcile the task list.
    Check {
        /// Print the planned changes without writing the task store.
        #[arg(long)]
        dry_run: bool,
    },
    /// Show the current task list.
    Tasks,
    /// Print the identifier a finding would get.
    Id {
        /// Source sheet name.
        sheet: String,
        /// Row key, e.g. `2025-01-15#2`.
        row_key: String,
        /// Column name.
        field: String,
        /// Rule name, e.g. `price_math`.
        rule: String,
    },
}
