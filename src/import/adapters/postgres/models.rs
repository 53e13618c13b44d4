//! Diesel row models for import task persistence.

use super::schema::{import_task_messages, import_tasks};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for import task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = import_tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ImportTaskRow {
    /// Internal task identifier.
    pub id: uuid::Uuid,
    /// Requesting user.
    pub owner: uuid::Uuid,
    /// Target role.
    pub role_id: uuid::Uuid,
    /// Pinned branch/tag/commit reference, if any.
    pub pinned_ref: Option<String>,
    /// Requested alternate role name, if any.
    pub alternate_role_name: Option<String>,
    /// Branch the run actually used, once selected.
    pub branch: Option<String>,
    /// Task lifecycle state.
    pub state: String,
    /// Repository statistics snapshot payload.
    pub stats: Value,
    /// Latest-commit metadata payload, when present.
    pub commit: Option<Value>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Start timestamp.
    pub started_at: Option<DateTime<Utc>>,
    /// Finish timestamp.
    pub finished_at: Option<DateTime<Utc>>,
}

/// Insert and update model for import task records.
///
/// `treat_none_as_null` keeps optional columns writable back to NULL on
/// update.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = import_tasks)]
#[diesel(treat_none_as_null = true)]
pub struct NewImportTaskRow {
    /// Internal task identifier.
    pub id: uuid::Uuid,
    /// Requesting user.
    pub owner: uuid::Uuid,
    /// Target role.
    pub role_id: uuid::Uuid,
    /// Pinned branch/tag/commit reference, if any.
    pub pinned_ref: Option<String>,
    /// Requested alternate role name, if any.
    pub alternate_role_name: Option<String>,
    /// Branch the run actually used, once selected.
    pub branch: Option<String>,
    /// Task lifecycle state.
    pub state: String,
    /// Repository statistics snapshot payload.
    pub stats: Value,
    /// Latest-commit metadata payload, when present.
    pub commit: Option<Value>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Start timestamp.
    pub started_at: Option<DateTime<Utc>>,
    /// Finish timestamp.
    pub finished_at: Option<DateTime<Utc>>,
}

/// Query result row for diagnostic log entries.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = import_task_messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MessageRow {
    /// Append-order sequence, assigned by the database.
    pub id: i64,
    /// Owning task.
    pub task_id: uuid::Uuid,
    /// Entry severity.
    pub severity: String,
    /// Clipped entry text.
    pub message_text: String,
    /// Append timestamp.
    pub recorded_at: DateTime<Utc>,
}

/// Insert model for diagnostic log entries.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = import_task_messages)]
pub struct NewMessageRow {
    /// Owning task.
    pub task_id: uuid::Uuid,
    /// Entry severity.
    pub severity: String,
    /// Clipped entry text.
    pub message_text: String,
    /// Append timestamp.
    pub recorded_at: DateTime<Utc>,
}
