//! Findings, tasks and the reconciliation between them.

mod error;
mod finding;
mod identity;
mod reconcile;
mod task;

pub use error::ReconcileError;
pub use finding::{Finding, UNSPECIFIED_ADMIN};
pub use identity::{canonical_part, identify};
pub use reconcile::{
    format_changes, reconcile, reconcile_with_changes, short_id, ChangeCounts, Reconciliation,
    TaskChange,
};
pub use task::Task;
