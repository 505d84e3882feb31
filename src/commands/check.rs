//! `sheetcheck check` command.

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::context::ServiceContext;
use crate::sheet::Workbook;
use crate::store::TaskStore;
use crate::tasks::{format_changes, reconcile_with_changes, Finding, Reconciliation};
use crate::validate::validate_sheet;

/// Execute the `check` command.
///
/// Validates every source sheet, reconciles the findings with the task
/// store and, unless `dry_run` is set, writes the new task list.
///
/// # Errors
///
/// Returns an error string if any sheet cannot be read, the stored tasks
/// are inconsistent, or the store cannot be written. Nothing is written
/// on error.
pub fn run(ctx: &ServiceContext, config: &AppConfig, dry_run: bool) -> Result<(), String> {
    let store = TaskStore::new(ctx, &config.workbook_dir, &config.report_sheet);
    let outcome = plan(ctx, config, &store)?;

    if dry_run {
        println!("Dry run, would perform:");
        println!("{}", format_changes(&outcome.changes));
        return Ok(());
    }

    store.save(&outcome.tasks).map_err(|e| format!("Failed to write task store: {e}"))?;
    let manual = outcome.tasks.iter().filter(|t| t.manual).count();
    println!("{}", format_changes(&outcome.changes));
    println!("{} task(s), {manual} manual", outcome.tasks.len());
    Ok(())
}

/// Validates the workbook and reconciles without writing anything.
///
/// # Errors
///
/// Same as [`run`], minus the write.
pub fn plan(
    ctx: &ServiceContext,
    config: &AppConfig,
    store: &TaskStore<'_>,
) -> Result<Reconciliation, String> {
    let today = ctx.clock.today();
    let findings = collect_findings(ctx, config, today)?;
    let existing = store.load().map_err(|e| format!("Failed to load task store: {e}"))?;

    let outcome = reconcile_with_changes(&existing, &findings, today)
        .map_err(|e| format!("Reconciliation failed: {e}"))?;
    let counts = outcome.counts();
    info!(
        findings = findings.len(),
        created = counts.created,
        refreshed = counts.refreshed,
        unchanged = counts.unchanged,
        preserved = counts.preserved,
        removed = counts.removed,
        "reconciled task list"
    );
    Ok(outcome)
}

/// Runs every configured validator. A sheet that cannot be read aborts the
/// run.
///
/// # Errors
///
/// Returns an error string naming the sheet that failed to load.
pub fn collect_findings(
    ctx: &ServiceContext,
    config: &AppConfig,
    today: NaiveDate,
) -> Result<Vec<Finding>, String> {
    let workbook = Workbook::new(ctx, &config.workbook_dir);
    let mut findings = Vec::new();
    for source in config.source_sheets() {
        let snapshot = workbook
            .read_sheet(&source.name)
            .map_err(|e| format!("Failed to read source sheet: {e}"))?;
        debug!(sheet = %source.name, rows = snapshot.values.len(), "sheet loaded");
        let found = validate_sheet(&source, &snapshot, &config.spreadsheet_id, today);
        info!(sheet = %source.name, findings = found.len(), "sheet checked");
        findings.extend(found);
    }
    Ok(findings)
}
