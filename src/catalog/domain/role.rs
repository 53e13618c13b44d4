//! Role aggregate root and related catalog types.

use super::{
    DependencyRef, NamespaceName, ParseRoleKindError, PlatformKey, RoleId, RoleName, RoleVersion,
    TagName,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Kind of content package a role represents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleKind {
    /// Plain role without a container descriptor.
    #[default]
    Plain,
    /// Role carrying a `meta/container.yml` descriptor.
    Container,
    /// Role carrying an `ansible/container.yml` descriptor.
    ContainerApp,
}

impl RoleKind {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Container => "container",
            Self::ContainerApp => "container_app",
        }
    }
}

impl TryFrom<&str> for RoleKind {
    type Error = ParseRoleKindError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "plain" => Ok(Self::Plain),
            "container" => Ok(Self::Container),
            "container_app" => Ok(Self::ContainerApp),
            _ => Err(ParseRoleKindError(value.to_owned())),
        }
    }
}

/// README file type recognized by filename suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadmeKind {
    /// Markdown (`.md`).
    Markdown,
    /// `reStructuredText` (`.rst`).
    Rst,
}

impl ReadmeKind {
    /// Detects the file type from a README filename.
    ///
    /// Exactly two suffixes are recognized; anything else yields `None`.
    #[must_use]
    pub fn from_file_name(name: &str) -> Option<Self> {
        if name.ends_with(".md") {
            Some(Self::Markdown)
        } else if name.ends_with(".rst") {
            Some(Self::Rst)
        } else {
            None
        }
    }
}

/// README content captured during an import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Readme {
    /// Raw README body.
    pub raw: String,
    /// Host-rendered HTML version, when the render fetch succeeded.
    pub rendered_html: Option<String>,
    /// Detected file type, when the suffix was recognized.
    pub kind: Option<ReadmeKind>,
}

/// Cached repository statistics mirrored from the upstream host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryStats {
    /// Stargazer count.
    pub stargazers: u64,
    /// Watcher count, obtained by full subscriber enumeration.
    pub watchers: u64,
    /// Fork count.
    pub forks: u64,
    /// Open issue count.
    pub open_issues: u64,
}

/// Latest-commit metadata captured from the selected branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitInfo {
    /// Commit SHA.
    pub sha: String,
    /// Commit message, clipped by the pipeline before storage.
    pub message: String,
    /// Commit web URL.
    pub html_url: String,
    /// Committer date.
    pub committed_at: DateTime<Utc>,
}

/// Normalized descriptive fields applied to a role in one step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleProfile {
    /// Role description.
    pub description: String,
    /// Author as given in the manifest.
    pub author: String,
    /// Company, capped at 50 characters.
    pub company: String,
    /// License, capped at 50 characters.
    pub license: String,
    /// Minimum supported engine version.
    pub min_engine_version: String,
    /// Issue tracker URL, cleared when malformed.
    pub issue_tracker_url: String,
    /// Source branch named in the manifest, when any.
    pub source_branch: String,
}

/// Role aggregate root.
///
/// Owned exclusively by the storage collaborator; the import pipeline
/// mutates it in place during a run and reconciles its set-valued relations
/// rather than recreating them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    id: RoleId,
    namespace: NamespaceName,
    name: RoleName,
    profile: RoleProfile,
    default_branch: String,
    kind: RoleKind,
    container_descriptor: Option<serde_json::Value>,
    readme: Option<Readme>,
    stats: RepositoryStats,
    commit: Option<CommitInfo>,
    tags: BTreeSet<TagName>,
    platforms: BTreeSet<PlatformKey>,
    dependencies: BTreeSet<DependencyRef>,
    versions: BTreeMap<String, RoleVersion>,
    is_valid: bool,
    imported_at: Option<DateTime<Utc>>,
}

/// Parameter object for reconstructing a persisted role aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedRoleData {
    /// Persisted role identifier.
    pub id: RoleId,
    /// Persisted namespace.
    pub namespace: NamespaceName,
    /// Persisted role name.
    pub name: RoleName,
    /// Persisted descriptive fields.
    pub profile: RoleProfile,
    /// Persisted upstream default branch.
    pub default_branch: String,
    /// Persisted role kind.
    pub kind: RoleKind,
    /// Persisted container descriptor, if any.
    pub container_descriptor: Option<serde_json::Value>,
    /// Persisted README content, if any.
    pub readme: Option<Readme>,
    /// Persisted repository statistics.
    pub stats: RepositoryStats,
    /// Persisted latest-commit metadata, if any.
    pub commit: Option<CommitInfo>,
    /// Persisted tag associations.
    pub tags: BTreeSet<TagName>,
    /// Persisted platform associations.
    pub platforms: BTreeSet<PlatformKey>,
    /// Persisted dependency associations.
    pub dependencies: BTreeSet<DependencyRef>,
    /// Persisted release history.
    pub versions: BTreeMap<String, RoleVersion>,
    /// Persisted validity flag.
    pub is_valid: bool,
    /// Persisted last-import timestamp.
    pub imported_at: Option<DateTime<Utc>>,
}

impl Role {
    /// Creates a new, never-imported role.
    #[must_use]
    pub fn new(namespace: NamespaceName, name: RoleName) -> Self {
        Self {
            id: RoleId::new(),
            namespace,
            name,
            profile: RoleProfile::default(),
            default_branch: String::new(),
            kind: RoleKind::Plain,
            container_descriptor: None,
            readme: None,
            stats: RepositoryStats::default(),
            commit: None,
            tags: BTreeSet::new(),
            platforms: BTreeSet::new(),
            dependencies: BTreeSet::new(),
            versions: BTreeMap::new(),
            is_valid: false,
            imported_at: None,
        }
    }

    /// Reconstructs a role from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedRoleData) -> Self {
        Self {
            id: data.id,
            namespace: data.namespace,
            name: data.name,
            profile: data.profile,
            default_branch: data.default_branch,
            kind: data.kind,
            container_descriptor: data.container_descriptor,
            readme: data.readme,
            stats: data.stats,
            commit: data.commit,
            tags: data.tags,
            platforms: data.platforms,
            dependencies: data.dependencies,
            versions: data.versions,
            is_valid: data.is_valid,
            imported_at: data.imported_at,
        }
    }

    /// Returns the role identifier.
    #[must_use]
    pub const fn id(&self) -> RoleId {
        self.id
    }

    /// Returns the namespace the role is published under.
    #[must_use]
    pub const fn namespace(&self) -> &NamespaceName {
        &self.namespace
    }

    /// Returns the role name.
    #[must_use]
    pub const fn name(&self) -> &RoleName {
        &self.name
    }

    /// Returns the normalized descriptive fields.
    #[must_use]
    pub const fn profile(&self) -> &RoleProfile {
        &self.profile
    }

    /// Returns the upstream default branch.
    #[must_use]
    pub fn default_branch(&self) -> &str {
        &self.default_branch
    }

    /// Returns the role kind.
    #[must_use]
    pub const fn kind(&self) -> RoleKind {
        self.kind
    }

    /// Returns the container descriptor stored verbatim, if any.
    #[must_use]
    pub const fn container_descriptor(&self) -> Option<&serde_json::Value> {
        self.container_descriptor.as_ref()
    }

    /// Returns the captured README, if any.
    #[must_use]
    pub const fn readme(&self) -> Option<&Readme> {
        self.readme.as_ref()
    }

    /// Returns the cached repository statistics.
    #[must_use]
    pub const fn stats(&self) -> RepositoryStats {
        self.stats
    }

    /// Returns the latest-commit metadata, if any.
    #[must_use]
    pub const fn commit(&self) -> Option<&CommitInfo> {
        self.commit.as_ref()
    }

    /// Returns the associated tag names.
    #[must_use]
    pub const fn tags(&self) -> &BTreeSet<TagName> {
        &self.tags
    }

    /// Returns the associated platform keys.
    #[must_use]
    pub const fn platforms(&self) -> &BTreeSet<PlatformKey> {
        &self.platforms
    }

    /// Returns the associated dependency references.
    #[must_use]
    pub const fn dependencies(&self) -> &BTreeSet<DependencyRef> {
        &self.dependencies
    }

    /// Returns the release history keyed by upstream tag name.
    #[must_use]
    pub const fn versions(&self) -> &BTreeMap<String, RoleVersion> {
        &self.versions
    }

    /// Returns whether the last completed import marked the role valid.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.is_valid
    }

    /// Returns the last-import timestamp, if the role was ever imported.
    #[must_use]
    pub const fn imported_at(&self) -> Option<DateTime<Utc>> {
        self.imported_at
    }

    /// Renames the role.
    pub fn rename(&mut self, name: RoleName) {
        self.name = name;
    }

    /// Applies normalized descriptive fields in one step.
    pub fn apply_profile(&mut self, profile: RoleProfile) {
        self.profile = profile;
    }

    /// Records the upstream default branch.
    pub fn set_default_branch(&mut self, branch: impl Into<String>) {
        self.default_branch = branch.into();
    }

    /// Sets the role kind together with its verbatim container descriptor.
    pub fn set_kind(&mut self, kind: RoleKind, descriptor: Option<serde_json::Value>) {
        self.kind = kind;
        self.container_descriptor = descriptor;
    }

    /// Replaces the captured README.
    pub fn set_readme(&mut self, readme: Option<Readme>) {
        self.readme = readme;
    }

    /// Replaces the cached repository statistics.
    pub const fn update_stats(&mut self, stats: RepositoryStats) {
        self.stats = stats;
    }

    /// Records the latest commit on the selected branch.
    pub fn record_commit(&mut self, commit: CommitInfo) {
        self.commit = Some(commit);
    }

    /// Adds a tag association. Adding an existing tag is a no-op.
    pub fn add_tag(&mut self, tag: TagName) {
        self.tags.insert(tag);
    }

    /// Removes a tag association. Removing an absent tag is a no-op.
    pub fn remove_tag(&mut self, tag: &TagName) {
        self.tags.remove(tag);
    }

    /// Adds a platform association. Adding an existing key is a no-op.
    pub fn add_platform(&mut self, key: PlatformKey) {
        self.platforms.insert(key);
    }

    /// Removes a platform association. Removing an absent key is a no-op.
    pub fn remove_platform(&mut self, key: &PlatformKey) {
        self.platforms.remove(key);
    }

    /// Adds a dependency association. Adding an existing reference is a
    /// no-op.
    pub fn add_dependency(&mut self, dependency: DependencyRef) {
        self.dependencies.insert(dependency);
    }

    /// Removes a dependency association. Removing an absent reference is a
    /// no-op.
    pub fn remove_dependency(&mut self, dependency: &DependencyRef) {
        self.dependencies.remove(dependency);
    }

    /// Records a release, updating the release date when the upstream tag
    /// name is already known.
    pub fn record_version(&mut self, version: RoleVersion) {
        self.versions.insert(version.name().to_owned(), version);
    }

    /// Marks the role as imported and valid.
    pub fn mark_imported(&mut self, clock: &impl Clock) {
        self.imported_at = Some(clock.utc());
        self.is_valid = true;
    }
}
