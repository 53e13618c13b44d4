//! Thread-safe in-memory import task repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::import::{
    domain::{DiagnosticMessage, ImportTask, ImportTaskId, ImportTaskState, Severity},
    ports::{ImportTaskRepository, ImportTaskRepositoryError, ImportTaskRepositoryResult},
};

/// In-memory [`ImportTaskRepository`] backed by hash maps.
///
/// Diagnostic messages live in their own map, mirroring the independent
/// commit channel the port demands: appends land even when the owning
/// task's mutation later fails.
#[derive(Debug, Clone, Default)]
pub struct InMemoryImportTasks {
    state: Arc<RwLock<InMemoryImportTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryImportTaskState {
    tasks: HashMap<ImportTaskId, ImportTask>,
    messages: HashMap<ImportTaskId, Vec<DiagnosticMessage>>,
}

impl InMemoryImportTasks {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_poisoned(err: impl std::fmt::Display) -> ImportTaskRepositoryError {
    ImportTaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl ImportTaskRepository for InMemoryImportTasks {
    async fn store(&self, task: &ImportTask) -> ImportTaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        if state.tasks.contains_key(&task.id()) {
            return Err(ImportTaskRepositoryError::DuplicateTask(task.id()));
        }
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn update(&self, task: &ImportTask) -> ImportTaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        if !state.tasks.contains_key(&task.id()) {
            return Err(ImportTaskRepositoryError::TaskNotFound(task.id()));
        }
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: ImportTaskId,
    ) -> ImportTaskRepositoryResult<Option<ImportTask>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn append_message(
        &self,
        task_id: ImportTaskId,
        severity: Severity,
        text: &str,
        recorded_at: DateTime<Utc>,
    ) -> ImportTaskRepositoryResult<DiagnosticMessage> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        let log = state.messages.entry(task_id).or_default();
        let sequence = u64::try_from(log.len()).unwrap_or(u64::MAX).saturating_add(1);
        let message = DiagnosticMessage::new(sequence, severity, text, recorded_at);
        log.push(message.clone());
        Ok(message)
    }

    async fn messages(
        &self,
        task_id: ImportTaskId,
    ) -> ImportTaskRepositoryResult<Vec<DiagnosticMessage>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state.messages.get(&task_id).cloned().unwrap_or_default())
    }

    async fn stuck_pending(
        &self,
        cutoff: DateTime<Utc>,
    ) -> ImportTaskRepositoryResult<Vec<ImportTask>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        let mut stuck: Vec<ImportTask> = state
            .tasks
            .values()
            .filter(|task| {
                task.state() == ImportTaskState::Pending && task.created_at() <= cutoff
            })
            .cloned()
            .collect();
        stuck.sort_by_key(ImportTask::created_at);
        Ok(stuck)
    }
}
