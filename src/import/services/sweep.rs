//! Periodic sweep force-failing imports stuck in `Pending`.
//!
//! This is the only cancellation mechanism: there is no mid-run
//! cancellation, so a task that never gets picked up would otherwise stay
//! `Pending` forever.

use crate::import::domain::{ImportTaskId, Severity};
use crate::import::ports::{ImportTaskRepository, ImportTaskRepositoryResult};
use chrono::Duration;
use mockable::Clock;
use std::sync::Arc;

/// Age in seconds past which a `Pending` task counts as stuck.
pub const STUCK_IMPORT_MAX_AGE_SECS: i64 = 7200;

/// Message recorded when a stuck import is force-failed.
pub const STUCK_IMPORT_MESSAGE: &str = "Import timed out, please try again. If you continue \
     seeing this message you may have a syntax error in your metadata file.";

/// Scans for stuck pending imports and force-fails them.
pub struct StuckImportSweeper<C>
where
    C: Clock + Send + Sync,
{
    tasks: Arc<dyn ImportTaskRepository>,
    clock: Arc<C>,
}

impl<C> StuckImportSweeper<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a new sweeper.
    #[must_use]
    pub fn new(tasks: Arc<dyn ImportTaskRepository>, clock: Arc<C>) -> Self {
        Self { tasks, clock }
    }

    /// Force-fails every task pending past the age threshold.
    ///
    /// Returns the identifiers of the tasks that were failed.
    ///
    /// # Errors
    ///
    /// Returns the repository error when the stuck-task query or a task
    /// update fails; tasks already swept keep their terminal state.
    pub async fn sweep(&self) -> ImportTaskRepositoryResult<Vec<ImportTaskId>> {
        let cutoff = self.clock.utc() - Duration::seconds(STUCK_IMPORT_MAX_AGE_SECS);
        tracing::info!(%cutoff, "clearing stuck imports");

        let mut swept = Vec::new();
        for mut task in self.tasks.stuck_pending(cutoff).await? {
            if task.fail(&*self.clock).is_err() {
                // Raced with a worker that just picked the task up.
                continue;
            }
            self.tasks
                .append_message(
                    task.id(),
                    Severity::Error,
                    STUCK_IMPORT_MESSAGE,
                    self.clock.utc(),
                )
                .await?;
            self.tasks.update(&task).await?;
            tracing::info!(task_id = %task.id(), "cleared stuck import");
            swept.push(task.id());
        }
        Ok(swept)
    }
}
