//! Import task aggregate root and its lifecycle state machine.

use super::{ImportDomainError, ImportTaskId, ParseImportTaskStateError, UserId};
use crate::catalog::domain::{CommitInfo, RepositoryStats, RoleId, RoleName};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Import task lifecycle state.
///
/// Transitions are monotonic: `Pending → Running → {Success, Failed}`, with
/// `Pending → Failed` reserved for the stuck-import sweep. Terminal states
/// are immutable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImportTaskState {
    /// Task has been created but the pipeline has not picked it up.
    Pending,
    /// The pipeline is executing.
    Running,
    /// The run completed with zero ERROR diagnostics.
    Success,
    /// The run completed with errors, aborted, or timed out.
    Failed,
}

impl ImportTaskState {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Running => "RUNNING",
            Self::Success => "SUCCESS",
            Self::Failed => "FAILED",
        }
    }

    /// Returns whether `self → to` is a permitted transition.
    #[must_use]
    pub const fn can_transition_to(self, to: Self) -> bool {
        matches!(
            (self, to),
            (Self::Pending, Self::Running | Self::Failed)
                | (Self::Running, Self::Success | Self::Failed)
        )
    }

    /// Returns true for the immutable terminal states.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::Failed)
    }
}

impl TryFrom<&str> for ImportTaskState {
    type Error = ParseImportTaskStateError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Ok(Self::Pending),
            "RUNNING" => Ok(Self::Running),
            "SUCCESS" => Ok(Self::Success),
            "FAILED" => Ok(Self::Failed),
            _ => Err(ParseImportTaskStateError(value.to_owned())),
        }
    }
}

/// Import task aggregate root.
///
/// One tracked, logged execution of the ingestion pipeline for a single
/// role. The pipeline is the sole mutator while the task runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportTask {
    id: ImportTaskId,
    owner: UserId,
    role_id: RoleId,
    pinned_ref: Option<String>,
    alternate_role_name: Option<RoleName>,
    branch: Option<String>,
    state: ImportTaskState,
    stats: RepositoryStats,
    commit: Option<CommitInfo>,
    created_at: DateTime<Utc>,
    started_at: Option<DateTime<Utc>>,
    finished_at: Option<DateTime<Utc>>,
}

/// Parameter object for reconstructing a persisted import task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedImportTaskData {
    /// Persisted task identifier.
    pub id: ImportTaskId,
    /// Persisted owning user.
    pub owner: UserId,
    /// Persisted target role.
    pub role_id: RoleId,
    /// Persisted pinned branch/tag/commit reference, if any.
    pub pinned_ref: Option<String>,
    /// Persisted alternate role name, if any.
    pub alternate_role_name: Option<RoleName>,
    /// Persisted branch the run actually used, if it got that far.
    pub branch: Option<String>,
    /// Persisted lifecycle state.
    pub state: ImportTaskState,
    /// Persisted repository statistics snapshot.
    pub stats: RepositoryStats,
    /// Persisted latest-commit metadata, if any.
    pub commit: Option<CommitInfo>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted start timestamp.
    pub started_at: Option<DateTime<Utc>>,
    /// Persisted finish timestamp.
    pub finished_at: Option<DateTime<Utc>>,
}

impl ImportTask {
    /// Creates a new pending import task for a role.
    #[must_use]
    pub fn new(owner: UserId, role_id: RoleId, clock: &impl Clock) -> Self {
        Self {
            id: ImportTaskId::new(),
            owner,
            role_id,
            pinned_ref: None,
            alternate_role_name: None,
            branch: None,
            state: ImportTaskState::Pending,
            stats: RepositoryStats::default(),
            commit: None,
            created_at: clock.utc(),
            started_at: None,
            finished_at: None,
        }
    }

    /// Pins the run to a specific branch, tag, or commit reference.
    #[must_use]
    pub fn with_pinned_ref(mut self, pinned_ref: impl Into<String>) -> Self {
        self.pinned_ref = Some(pinned_ref.into());
        self
    }

    /// Requests the role be renamed during the run.
    #[must_use]
    pub fn with_alternate_role_name(mut self, name: RoleName) -> Self {
        self.alternate_role_name = Some(name);
        self
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedImportTaskData) -> Self {
        Self {
            id: data.id,
            owner: data.owner,
            role_id: data.role_id,
            pinned_ref: data.pinned_ref,
            alternate_role_name: data.alternate_role_name,
            branch: data.branch,
            state: data.state,
            stats: data.stats,
            commit: data.commit,
            created_at: data.created_at,
            started_at: data.started_at,
            finished_at: data.finished_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> ImportTaskId {
        self.id
    }

    /// Returns the owning user.
    #[must_use]
    pub const fn owner(&self) -> UserId {
        self.owner
    }

    /// Returns the target role.
    #[must_use]
    pub const fn role_id(&self) -> RoleId {
        self.role_id
    }

    /// Returns the pinned reference, if any.
    #[must_use]
    pub fn pinned_ref(&self) -> Option<&str> {
        self.pinned_ref.as_deref()
    }

    /// Returns the requested alternate role name, if any.
    #[must_use]
    pub const fn alternate_role_name(&self) -> Option<&RoleName> {
        self.alternate_role_name.as_ref()
    }

    /// Returns the branch the run used, once selected.
    #[must_use]
    pub fn branch(&self) -> Option<&str> {
        self.branch.as_deref()
    }

    /// Returns the lifecycle state.
    #[must_use]
    pub const fn state(&self) -> ImportTaskState {
        self.state
    }

    /// Returns the repository statistics snapshot.
    #[must_use]
    pub const fn stats(&self) -> RepositoryStats {
        self.stats
    }

    /// Returns the latest-commit metadata, if any.
    #[must_use]
    pub const fn commit(&self) -> Option<&CommitInfo> {
        self.commit.as_ref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the start timestamp, once the run began.
    #[must_use]
    pub const fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Returns the finish timestamp, once the run ended.
    #[must_use]
    pub const fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    /// Transitions the task to `Running`, recording the start timestamp in
    /// the same step.
    ///
    /// # Errors
    ///
    /// Returns [`ImportDomainError::InvalidStateTransition`] unless the task
    /// is `Pending`.
    pub fn start(&mut self, clock: &impl Clock) -> Result<(), ImportDomainError> {
        self.transition_to(ImportTaskState::Running, clock)?;
        self.started_at = Some(clock.utc());
        Ok(())
    }

    /// Transitions the task to `Success`, recording the finish timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`ImportDomainError::InvalidStateTransition`] unless the task
    /// is `Running`.
    pub fn succeed(&mut self, clock: &impl Clock) -> Result<(), ImportDomainError> {
        self.transition_to(ImportTaskState::Success, clock)
    }

    /// Transitions the task to `Failed`, recording the finish timestamp.
    ///
    /// Permitted from `Pending` (the stuck-import sweep) and `Running` (an
    /// aborted or completed-with-errors run).
    ///
    /// # Errors
    ///
    /// Returns [`ImportDomainError::InvalidStateTransition`] when the task
    /// is already terminal.
    pub fn fail(&mut self, clock: &impl Clock) -> Result<(), ImportDomainError> {
        self.transition_to(ImportTaskState::Failed, clock)
    }

    /// Records the branch selected for the run.
    pub fn set_branch(&mut self, branch: impl Into<String>) {
        self.branch = Some(branch.into());
    }

    /// Replaces the repository statistics snapshot.
    pub const fn update_stats(&mut self, stats: RepositoryStats) {
        self.stats = stats;
    }

    /// Records the latest commit on the selected branch.
    pub fn record_commit(&mut self, commit: CommitInfo) {
        self.commit = Some(commit);
    }

    fn transition_to(
        &mut self,
        to: ImportTaskState,
        clock: &impl Clock,
    ) -> Result<(), ImportDomainError> {
        if !self.state.can_transition_to(to) {
            return Err(ImportDomainError::InvalidStateTransition {
                task_id: self.id,
                from: self.state,
                to,
            });
        }
        self.state = to;
        if to.is_terminal() {
            self.finished_at = Some(clock.utc());
        }
        Ok(())
    }
}
