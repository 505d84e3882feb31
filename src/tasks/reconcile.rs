//! Merges the current run's findings into the persisted task list.
//!
//! Rules, per existing task:
//! - a finding with the same identifier still exists: refresh the
//!   descriptive fields, keep identifier, manual flag and creation date;
//! - no finding, but the task is manual: keep it untouched;
//! - no finding and not manual: the problem was fixed, drop it.
//!
//! Findings no task claimed become new tasks dated `today`. The output is
//! sorted by sheet, creation date and identifier, so re-running with the
//! same findings reproduces the same list in the same order.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;

use super::error::ReconcileError;
use super::finding::Finding;
use super::task::Task;

/// What reconciliation did with one identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskChange {
    /// A new task was created for a first-seen finding.
    Created {
        /// Task identifier.
        identifier: String,
        /// Description of the new task.
        description: String,
    },
    /// An existing task matched a finding and some field changed.
    Refreshed {
        /// Task identifier.
        identifier: String,
        /// Description after the refresh.
        description: String,
    },
    /// An existing task matched a finding and nothing changed.
    Unchanged {
        /// Task identifier.
        identifier: String,
    },
    /// A manual task with no matching finding was kept as is.
    Preserved {
        /// Task identifier.
        identifier: String,
    },
    /// An automatic task with no matching finding was removed.
    Removed {
        /// Task identifier.
        identifier: String,
        /// Description the task had before removal.
        description: String,
    },
}

/// Outcome of one reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    /// The new authoritative task list, in persistence order.
    pub tasks: Vec<Task>,
    /// One entry per existing task and per created task.
    pub changes: Vec<TaskChange>,
}

/// Per-kind totals of a [`Reconciliation`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeCounts {
    /// Newly created tasks.
    pub created: usize,
    /// Tasks whose fields were refreshed.
    pub refreshed: usize,
    /// Matched tasks that did not change.
    pub unchanged: usize,
    /// Manual tasks kept without a finding.
    pub preserved: usize,
    /// Automatic tasks removed as fixed.
    pub removed: usize,
}

impl Reconciliation {
    /// Tallies the changes by kind.
    #[must_use]
    pub fn counts(&self) -> ChangeCounts {
        let mut counts = ChangeCounts::default();
        for change in &self.changes {
            match change {
                TaskChange::Created { .. } => counts.created += 1,
                TaskChange::Refreshed { .. } => counts.refreshed += 1,
                TaskChange::Unchanged { .. } => counts.unchanged += 1,
                TaskChange::Preserved { .. } => counts.preserved += 1,
                TaskChange::Removed { .. } => counts.removed += 1,
            }
        }
        counts
    }
}

/// Produces the new task list from the previous one and this run's findings.
///
/// Inputs are only borrowed; the result is freshly built.
///
/// # Errors
///
/// Returns [`ReconcileError::DuplicateTask`] when `existing` holds an
/// identifier twice, and a malformed-input error when a task or finding
/// lacks an identity field.
pub fn reconcile(
    existing: &[Task],
    findings: &[Finding],
    today: NaiveDate,
) -> Result<Vec<Task>, ReconcileError> {
    reconcile_with_changes(existing, findings, today).map(|r| r.tasks)
}

/// Like [`reconcile`], but also reports what happened to each identifier.
///
/// # Errors
///
/// Same as [`reconcile`].
pub fn reconcile_with_changes(
    existing: &[Task],
    findings: &[Finding],
    today: NaiveDate,
) -> Result<Reconciliation, ReconcileError> {
    check_tasks(existing)?;
    let mut pending = index_findings(findings)?;

    let mut tasks = Vec::with_capacity(existing.len() + pending.len());
    let mut changes = Vec::with_capacity(existing.len() + pending.len());

    for task in existing {
        if let Some(finding) = pending.remove(task.identifier.as_str()) {
            let refreshed = task.refreshed(finding);
            changes.push(if refreshed == *task {
                TaskChange::Unchanged { identifier: task.identifier.clone() }
            } else {
                TaskChange::Refreshed {
                    identifier: task.identifier.clone(),
                    description: refreshed.description.clone(),
                }
            });
            tasks.push(refreshed);
        } else if task.manual {
            changes.push(TaskChange::Preserved { identifier: task.identifier.clone() });
            tasks.push(task.clone());
        } else {
            changes.push(TaskChange::Removed {
                identifier: task.identifier.clone(),
                description: task.description.clone(),
            });
        }
    }

    // Walk the slice rather than the map so creation order is deterministic.
    for finding in findings {
        if let Some(first) = pending.remove(finding.identifier.as_str()) {
            changes.push(TaskChange::Created {
                identifier: first.identifier.clone(),
                description: first.description.clone(),
            });
            tasks.push(Task::from_finding(first, today));
        }
    }

    tasks.sort_by(persistence_order);
    Ok(Reconciliation { tasks, changes })
}

/// Sheet, then creation date, then identifier.
fn persistence_order(a: &Task, b: &Task) -> Ordering {
    a.sheet
        .cmp(&b.sheet)
        .then_with(|| a.created_at.cmp(&b.created_at))
        .then_with(|| a.identifier.cmp(&b.identifier))
}

fn check_tasks(existing: &[Task]) -> Result<(), ReconcileError> {
    let mut seen = HashSet::with_capacity(existing.len());
    for (index, task) in existing.iter().enumerate() {
        if task.identifier.trim().is_empty() {
            return Err(ReconcileError::MalformedTask { index, field: "identifier" });
        }
        if !seen.insert(task.identifier.as_str()) {
            return Err(ReconcileError::DuplicateTask { identifier: task.identifier.clone() });
        }
    }
    Ok(())
}

/// Maps identifier to finding. Equal identifiers describe the same problem,
/// so repeats collapse onto the first occurrence.
fn index_findings(findings: &[Finding]) -> Result<HashMap<&str, &Finding>, ReconcileError> {
    let mut index = HashMap::with_capacity(findings.len());
    for (i, finding) in findings.iter().enumerate() {
        for (field, value) in [
            ("identifier", &finding.identifier),
            ("sheet", &finding.sheet),
            ("row_key", &finding.row_key),
            ("field", &finding.field),
            ("rule", &finding.rule),
        ] {
            if value.trim().is_empty() {
                return Err(ReconcileError::MalformedFinding { index: i, field });
            }
        }
        index.entry(finding.identifier.as_str()).or_insert(finding);
    }
    Ok(index)
}

/// Formats reconciliation changes as a human-readable plan.
///
/// Unchanged tasks are summarized in a single trailing line.
#[must_use]
pub fn format_changes(changes: &[TaskChange]) -> String {
    if changes.is_empty() {
        return "No tasks.".to_string();
    }

    let mut lines = Vec::new();
    let mut unchanged = 0usize;
    for change in changes {
        match change {
            TaskChange::Created { identifier, description } => {
                lines.push(format!("  CREATE   {}: {description}", short_id(identifier)));
            }
            TaskChange::Refreshed { identifier, description } => {
                lines.push(format!("  REFRESH  {}: {description}", short_id(identifier)));
            }
            TaskChange::Preserved { identifier } => {
                lines.push(format!("  KEEP     {} (manual)", short_id(identifier)));
            }
            TaskChange::Removed { identifier, description } => {
                lines.push(format!("  REMOVE   {}: {description}", short_id(identifier)));
            }
            TaskChange::Unchanged { .. } => unchanged += 1,
        }
    }
    if unchanged > 0 {
        lines.push(format!("  {unchanged} task(s) unchanged"));
    }
    lines.join("\n")
}

/// First 12 characters of an identifier, enough to tell tasks apart on screen.
#[must_use]
pub fn short_id(identifier: &str) -> &str {
    identifier.char_indices().nth(12).map_or(identifier, |(i, _)| &identifier[..i])
}
