//! Errors raised while reconciling tasks.

use thiserror::Error;

/// Fatal problems with reconciliation input.
///
/// All variants mean the input cannot be merged safely; callers must abort
/// the run instead of persisting anything.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReconcileError {
    /// The persisted task list holds the same identifier twice.
    #[error("task store is corrupt: identifier {identifier:?} appears more than once")]
    DuplicateTask {
        /// The repeated identifier.
        identifier: String,
    },

    /// A persisted task lacks a required field.
    #[error("malformed task #{index}: {field} is empty")]
    MalformedTask {
        /// Position of the task in the input.
        index: usize,
        /// Name of the empty field.
        field: &'static str,
    },

    /// A finding lacks a required field.
    #[error("malformed finding #{index}: {field} is empty")]
    MalformedFinding {
        /// Position of the finding in the input.
        index: usize,
        /// Name of the empty field.
        field: &'static str,
    },
}
