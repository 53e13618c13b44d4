//! Diagnostic recorder shared by the pipeline stages.

use crate::import::domain::{DiagnosticCounts, ImportTaskId, Severity};
use crate::import::manifest::Note;
use crate::import::ports::ImportTaskRepository;
use mockable::Clock;
use std::sync::{Arc, Mutex, PoisonError};

/// Appends severity-tagged entries to one task's diagnostic log.
///
/// Every append commits immediately through the repository's independent
/// channel and bumps the running error/warning counters consulted at
/// finalize. An append failure is logged and swallowed so the audit trail
/// never takes the pipeline down with it.
pub struct DiagnosticRecorder<C>
where
    C: Clock + Send + Sync,
{
    tasks: Arc<dyn ImportTaskRepository>,
    task_id: ImportTaskId,
    clock: Arc<C>,
    counts: Mutex<DiagnosticCounts>,
}

impl<C> DiagnosticRecorder<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a recorder for one task run.
    #[must_use]
    pub fn new(tasks: Arc<dyn ImportTaskRepository>, task_id: ImportTaskId, clock: Arc<C>) -> Self {
        Self {
            tasks,
            task_id,
            clock,
            counts: Mutex::new(DiagnosticCounts::default()),
        }
    }

    /// Appends one entry with the given severity.
    pub async fn record(&self, severity: Severity, text: &str) {
        self.counts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .record(severity);
        tracing::info!(
            task_id = %self.task_id,
            severity = severity.as_str(),
            "{text}"
        );
        if let Err(err) = self
            .tasks
            .append_message(self.task_id, severity, text, self.clock.utc())
            .await
        {
            tracing::error!(
                task_id = %self.task_id,
                error = %err,
                "failed to append diagnostic message"
            );
        }
    }

    /// Appends an INFO entry.
    pub async fn info(&self, text: &str) {
        self.record(Severity::Info, text).await;
    }

    /// Appends a WARNING entry.
    pub async fn warning(&self, text: &str) {
        self.record(Severity::Warning, text).await;
    }

    /// Appends an ERROR entry.
    pub async fn error(&self, text: &str) {
        self.record(Severity::Error, text).await;
    }

    /// Appends every note produced by a pure normalization stage.
    pub async fn notes(&self, notes: &[Note]) {
        for note in notes {
            self.record(note.severity, &note.text).await;
        }
    }

    /// Returns the running error/warning counters.
    pub fn counts(&self) -> DiagnosticCounts {
        *self.counts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
