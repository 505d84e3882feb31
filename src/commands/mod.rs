//! Command dispatch and handlers.

pub mod check;
pub mod id;
pub mod tasks;

use crate::cli::{Cli, Command};
use crate::config::{env_lookup, AppConfig};
use crate::context::ServiceContext;
use crate::logging;

/// Dispatch a parsed command against the live adapters.
///
/// A `.env` file in the working directory is loaded into the process
/// environment before configuration is resolved.
///
/// # Errors
///
/// Returns an error string if configuration is invalid or the command fails.
pub fn dispatch(cli: &Cli) -> Result<(), String> {
    dotenvy::dotenv().ok();
    let ctx = ServiceContext::live();
    dispatch_with_context(cli, &ctx, env_lookup)
}

/// Dispatch a command with the given service context and environment.
///
/// # Errors
///
/// Returns an error string if configuration is invalid or the command fails.
pub fn dispatch_with_context(
    cli: &Cli,
    ctx: &ServiceContext,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<(), String> {
    let config = AppConfig::load(ctx.fs.as_ref(), cli.config.as_deref(), lookup)
        .map_err(|e| format!("Configuration error: {e}"))?
        .with_workbook(cli.workbook.as_deref());
    logging::init(cli.verbose, &config.log_level);

    match &cli.command {
        Command::Check { dry_run } => check::run(ctx, &config, *dry_run),
        Command::Tasks => tasks::run(ctx, &config),
        Command::Id { sheet, row_key, field, rule } => {
            id::run(sheet, row_key, field, rule);
            Ok(())
        }
    }
}
