//! Port for the version-controlled repository host a role is imported from.
//!
//! Transport, authentication, and rate limiting are the adapter's concern;
//! the pipeline receives an already-scoped handle for one repository as an
//! explicit argument, never from ambient state.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Result type for repository host operations.
pub type HostResult<T> = Result<T, HostError>;

/// Errors returned by repository host implementations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HostError {
    /// The requested file or resource does not exist upstream.
    #[error("not found: {0}")]
    NotFound(String),

    /// The host could not be reached or answered with a failure.
    #[error("repository host unavailable: {0}")]
    Unavailable(String),
}

/// Raw README payload as served by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteReadme {
    /// File name, used for type detection by suffix.
    pub file_name: String,
    /// Decoded file content.
    pub content: String,
}

/// One upstream repository tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamTag {
    /// Tag name.
    pub name: String,
    /// Commit date of the tagged commit.
    pub committed_at: DateTime<Utc>,
}

/// Latest commit on a branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamCommit {
    /// Commit SHA.
    pub sha: String,
    /// Full commit message.
    pub message: String,
    /// Commit web URL.
    pub html_url: String,
    /// Committer date.
    pub committed_at: DateTime<Utc>,
}

/// Repository attributes and statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryInfo {
    /// Repository description, if set upstream.
    pub description: Option<String>,
    /// Default branch name.
    pub default_branch: String,
    /// Repository web URL.
    pub html_url: String,
    /// Whether the issue tracker is enabled.
    pub has_issues: bool,
    /// Stargazer count.
    pub stargazers: u64,
    /// Fork count.
    pub forks: u64,
    /// Open issue count.
    pub open_issues: u64,
}

/// Upstream account or organization owning the repository.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnerProfile {
    /// Login of the account or organization.
    pub login: String,
    /// Human-readable display name.
    pub display_name: Option<String>,
    /// Avatar image URL.
    pub avatar_url: Option<String>,
    /// Free-form location.
    pub location: Option<String>,
    /// Company or employer.
    pub company: Option<String>,
    /// Contact email address.
    pub email: Option<String>,
    /// Public profile URL.
    pub html_url: Option<String>,
    /// Follower count.
    pub followers: Option<u64>,
    /// Whether the owner is an organization.
    pub is_organization: bool,
}

/// Read-only contract against one upstream repository.
#[async_trait]
pub trait RepositoryHost: Send + Sync {
    /// Fetches a file's raw bytes at the given reference.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::NotFound`] when the file does not exist at the
    /// reference.
    async fn file(&self, path: &str, git_ref: &str) -> HostResult<Vec<u8>>;

    /// Fetches the repository README at the given reference.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::NotFound`] when no README exists.
    async fn readme(&self, git_ref: &str) -> HostResult<RemoteReadme>;

    /// Fetches the host-rendered HTML version of the README.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::NotFound`] when no README exists.
    async fn rendered_readme(&self, git_ref: &str) -> HostResult<String>;

    /// Fetches repository attributes and statistics.
    async fn repository(&self) -> HostResult<RepositoryInfo>;

    /// Enumerates subscriber logins.
    ///
    /// The host exposes no direct count; the watcher statistic is the
    /// length of this enumeration.
    async fn subscribers(&self) -> HostResult<Vec<String>>;

    /// Fetches the latest commit on a branch, when the branch has any.
    async fn latest_commit(&self, branch: &str) -> HostResult<Option<UpstreamCommit>>;

    /// Fetches the full upstream tag list.
    async fn tags(&self) -> HostResult<Vec<UpstreamTag>>;

    /// Fetches the owning account or organization profile.
    async fn owner(&self) -> HostResult<OwnerProfile>;
}
