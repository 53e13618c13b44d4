//! Repository port for import task persistence and diagnostics.

use crate::import::domain::{DiagnosticMessage, ImportTask, ImportTaskId, Severity};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for import task repository operations.
pub type ImportTaskRepositoryResult<T> = Result<T, ImportTaskRepositoryError>;

/// Import task persistence contract.
///
/// Diagnostic appends commit independently of the surrounding task
/// mutation, so a failed run still carries its full audit trail and
/// observers polling a task see entries before the run ends.
#[async_trait]
pub trait ImportTaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`ImportTaskRepositoryError::DuplicateTask`] when the task ID
    /// already exists.
    async fn store(&self, task: &ImportTask) -> ImportTaskRepositoryResult<()>;

    /// Persists changes to an existing task (state, timestamps, cached
    /// upstream metadata).
    ///
    /// # Errors
    ///
    /// Returns [`ImportTaskRepositoryError::TaskNotFound`] when the task
    /// does not exist.
    async fn update(&self, task: &ImportTask) -> ImportTaskRepositoryResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: ImportTaskId)
    -> ImportTaskRepositoryResult<Option<ImportTask>>;

    /// Appends one diagnostic entry, committing it immediately.
    ///
    /// The text is clipped to the diagnostic maximum and the entry receives
    /// the next sequence number for the task.
    async fn append_message(
        &self,
        task_id: ImportTaskId,
        severity: Severity,
        text: &str,
        recorded_at: DateTime<Utc>,
    ) -> ImportTaskRepositoryResult<DiagnosticMessage>;

    /// Returns every diagnostic entry for a task in append order.
    async fn messages(
        &self,
        task_id: ImportTaskId,
    ) -> ImportTaskRepositoryResult<Vec<DiagnosticMessage>>;

    /// Returns tasks still `Pending` that were created at or before
    /// `cutoff`, for the stuck-import sweep.
    async fn stuck_pending(
        &self,
        cutoff: DateTime<Utc>,
    ) -> ImportTaskRepositoryResult<Vec<ImportTask>>;
}

/// Errors returned by import task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ImportTaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate import task identifier: {0}")]
    DuplicateTask(ImportTaskId),

    /// The task was not found.
    #[error("import task not found: {0}")]
    TaskNotFound(ImportTaskId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ImportTaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
