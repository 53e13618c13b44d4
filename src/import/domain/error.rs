//! Error types for import domain validation and parsing.

use super::{ImportTaskId, ImportTaskState};
use thiserror::Error;

/// Errors returned while mutating import domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ImportDomainError {
    /// The requested state change violates the monotonic lifecycle.
    #[error("invalid state transition for task {task_id}: {from:?} -> {to:?}")]
    InvalidStateTransition {
        /// Task whose transition was rejected.
        task_id: ImportTaskId,
        /// State the task is currently in.
        from: ImportTaskState,
        /// State that was requested.
        to: ImportTaskState,
    },
}

/// Error returned while parsing import task states from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown import task state: {0}")]
pub struct ParseImportTaskStateError(pub String);

/// Error returned while parsing diagnostic severities from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown diagnostic severity: {0}")]
pub struct ParseSeverityError(pub String);
