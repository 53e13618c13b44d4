//! `PostgreSQL` repository implementation for import task storage.

use super::{
    models::{ImportTaskRow, MessageRow, NewImportTaskRow, NewMessageRow},
    schema::{import_task_messages, import_tasks},
};
use crate::catalog::domain::{CommitInfo, RepositoryStats, RoleId, RoleName};
use crate::import::{
    domain::{
        DiagnosticMessage, ImportTask, ImportTaskId, ImportTaskState, MAX_DIAGNOSTIC_CHARS,
        PersistedImportTaskData, Severity, UserId,
    },
    ports::{ImportTaskRepository, ImportTaskRepositoryError, ImportTaskRepositoryResult},
};
use crate::text::clip_chars;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by import adapters.
pub type ImportPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed import task repository.
///
/// Diagnostic appends run on their own pooled connection and commit on
/// their own, independent of any task row mutation in flight, which is
/// what keeps the audit trail intact for failed runs.
#[derive(Debug, Clone)]
pub struct PostgresImportTasks {
    pool: ImportPgPool,
}

impl From<DieselError> for ImportTaskRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

impl PostgresImportTasks {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: ImportPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> ImportTaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> ImportTaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(ImportTaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(ImportTaskRepositoryError::persistence)?
    }
}

#[async_trait]
impl ImportTaskRepository for PostgresImportTasks {
    async fn store(&self, task: &ImportTask) -> ImportTaskRepositoryResult<()> {
        let task_id = task.id();
        let row = to_task_row(task)?;
        self.run_blocking(move |connection| {
            diesel::insert_into(import_tasks::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        ImportTaskRepositoryError::DuplicateTask(task_id)
                    }
                    _ => ImportTaskRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, task: &ImportTask) -> ImportTaskRepositoryResult<()> {
        let task_id = task.id();
        let row = to_task_row(task)?;
        self.run_blocking(move |connection| {
            let updated = diesel::update(import_tasks::table.filter(import_tasks::id.eq(row.id)))
                .set(&row)
                .execute(connection)?;
            if updated == 0 {
                return Err(ImportTaskRepositoryError::TaskNotFound(task_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(
        &self,
        id: ImportTaskId,
    ) -> ImportTaskRepositoryResult<Option<ImportTask>> {
        self.run_blocking(move |connection| {
            let row = import_tasks::table
                .filter(import_tasks::id.eq(id.into_inner()))
                .select(ImportTaskRow::as_select())
                .first::<ImportTaskRow>(connection)
                .optional()?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn append_message(
        &self,
        task_id: ImportTaskId,
        severity: Severity,
        text: &str,
        recorded_at: DateTime<Utc>,
    ) -> ImportTaskRepositoryResult<DiagnosticMessage> {
        let row = NewMessageRow {
            task_id: task_id.into_inner(),
            severity: severity.as_str().to_owned(),
            message_text: clip_chars(text, MAX_DIAGNOSTIC_CHARS),
            recorded_at,
        };
        self.run_blocking(move |connection| {
            let stored: MessageRow = diesel::insert_into(import_task_messages::table)
                .values(&row)
                .returning(MessageRow::as_returning())
                .get_result(connection)?;
            row_to_message(stored)
        })
        .await
    }

    async fn messages(
        &self,
        task_id: ImportTaskId,
    ) -> ImportTaskRepositoryResult<Vec<DiagnosticMessage>> {
        self.run_blocking(move |connection| {
            let rows = import_task_messages::table
                .filter(import_task_messages::task_id.eq(task_id.into_inner()))
                .order(import_task_messages::id.asc())
                .select(MessageRow::as_select())
                .load::<MessageRow>(connection)?;
            rows.into_iter().map(row_to_message).collect()
        })
        .await
    }

    async fn stuck_pending(
        &self,
        cutoff: DateTime<Utc>,
    ) -> ImportTaskRepositoryResult<Vec<ImportTask>> {
        self.run_blocking(move |connection| {
            let rows = import_tasks::table
                .filter(import_tasks::state.eq(ImportTaskState::Pending.as_str()))
                .filter(import_tasks::created_at.le(cutoff))
                .order(import_tasks::created_at.asc())
                .select(ImportTaskRow::as_select())
                .load::<ImportTaskRow>(connection)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }
}

fn to_task_row(task: &ImportTask) -> ImportTaskRepositoryResult<NewImportTaskRow> {
    let stats =
        serde_json::to_value(task.stats()).map_err(ImportTaskRepositoryError::persistence)?;
    let commit = task
        .commit()
        .map(serde_json::to_value)
        .transpose()
        .map_err(ImportTaskRepositoryError::persistence)?;

    Ok(NewImportTaskRow {
        id: task.id().into_inner(),
        owner: task.owner().into_inner(),
        role_id: task.role_id().into_inner(),
        pinned_ref: task.pinned_ref().map(ToOwned::to_owned),
        alternate_role_name: task
            .alternate_role_name()
            .map(|name| name.as_str().to_owned()),
        branch: task.branch().map(ToOwned::to_owned),
        state: task.state().as_str().to_owned(),
        stats,
        commit,
        created_at: task.created_at(),
        started_at: task.started_at(),
        finished_at: task.finished_at(),
    })
}

fn row_to_task(row: ImportTaskRow) -> ImportTaskRepositoryResult<ImportTask> {
    let state = ImportTaskState::try_from(row.state.as_str())
        .map_err(ImportTaskRepositoryError::persistence)?;
    let alternate_role_name = row
        .alternate_role_name
        .map(RoleName::new)
        .transpose()
        .map_err(ImportTaskRepositoryError::persistence)?;
    let stats = serde_json::from_value::<RepositoryStats>(row.stats)
        .map_err(ImportTaskRepositoryError::persistence)?;
    let commit = row
        .commit
        .map(serde_json::from_value::<CommitInfo>)
        .transpose()
        .map_err(ImportTaskRepositoryError::persistence)?;

    Ok(ImportTask::from_persisted(PersistedImportTaskData {
        id: ImportTaskId::from_uuid(row.id),
        owner: UserId::from_uuid(row.owner),
        role_id: RoleId::from_uuid(row.role_id),
        pinned_ref: row.pinned_ref,
        alternate_role_name,
        branch: row.branch,
        state,
        stats,
        commit,
        created_at: row.created_at,
        started_at: row.started_at,
        finished_at: row.finished_at,
    }))
}

fn row_to_message(row: MessageRow) -> ImportTaskRepositoryResult<DiagnosticMessage> {
    let severity = Severity::try_from(row.severity.as_str())
        .map_err(ImportTaskRepositoryError::persistence)?;
    let sequence = u64::try_from(row.id).map_err(ImportTaskRepositoryError::persistence)?;
    Ok(DiagnosticMessage::new(
        sequence,
        severity,
        &row.message_text,
        row.recorded_at,
    ))
}
