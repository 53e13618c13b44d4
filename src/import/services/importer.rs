//! Import task controller: stage sequencing, failure classification, and
//! task finalization.

use super::{
    DiagnosticRecorder, MetadataFetcher,
    reconcile::plan_set,
};
use crate::catalog::{
    domain::{
        CommitInfo, DependencyRef, NamespaceAttributes, NamespaceName, NamespaceProfile,
        PlatformKey, RepositoryStats, Role, RoleKind, RoleVersion, TagName,
    },
    ports::{CatalogRepository, CatalogRepositoryError},
};
use crate::import::domain::{
    ImportDomainError, ImportTask, ImportTaskId, ImportTaskState, Severity,
};
use crate::import::manifest::{
    CONTAINER_APP_DESCRIPTOR_PATH, CONTAINER_DESCRIPTOR_PATH, DependencyExtraction, MANIFEST_PATH,
    PlatformExtraction, PlatformReleases, PlatformSpec, RepoDefaults, extract_dependencies,
    extract_platforms, extract_tags, normalize_profile,
};
use crate::import::ports::{
    ImportTaskRepository, ImportTaskRepositoryError, IndexUpdate, OwnerProfile, RepositoryHost,
    RepositoryInfo, SearchIndex,
};
use crate::text::clip_chars;
use mockable::Clock;
use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;

const MAX_COMMIT_MESSAGE_CHARS: usize = 255;

/// Service-level errors for import runs.
#[derive(Debug, Error)]
pub enum ImportError {
    /// No task exists under the given identifier.
    #[error("import task not found: {0}")]
    TaskNotFound(ImportTaskId),

    /// The task state machine rejected a transition.
    #[error(transparent)]
    Domain(#[from] ImportDomainError),

    /// Task repository operation failed outside the abort path.
    #[error(transparent)]
    Repository(#[from] ImportTaskRepositoryError),

    /// A fatal stage failure aborted the run; the message is also the last
    /// ERROR entry of the task's diagnostic log.
    #[error("import aborted: {message}")]
    Aborted {
        /// Message recorded by the abort.
        message: String,
    },
}

/// Result of a completed (non-aborted) import run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportOutcome {
    /// Terminal state: `Success` with zero errors, `Failed` otherwise.
    pub state: ImportTaskState,
    /// ERROR entries recorded during the run.
    pub errors: u64,
    /// WARNING entries recorded during the run.
    pub warnings: u64,
}

/// A stage failure the controller classified as fatal.
struct Fatal(String);

fn storage_fatal(err: &CatalogRepositoryError) -> Fatal {
    Fatal(format!("Storage error: {err}"))
}

/// Drives one import task through the pipeline.
///
/// The controller owns the task state machine and is the single place a
/// stage failure is classified as fatal (abort) or recoverable (log and
/// continue). The repository host handle is an explicit per-run argument.
pub struct RoleImportService<C>
where
    C: Clock + Send + Sync + 'static,
{
    catalog: Arc<dyn CatalogRepository>,
    tasks: Arc<dyn ImportTaskRepository>,
    search_index: Arc<dyn SearchIndex>,
    clock: Arc<C>,
}

impl<C> RoleImportService<C>
where
    C: Clock + Send + Sync + 'static,
{
    /// Creates a new import service.
    #[must_use]
    pub fn new(
        catalog: Arc<dyn CatalogRepository>,
        tasks: Arc<dyn ImportTaskRepository>,
        search_index: Arc<dyn SearchIndex>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            catalog,
            tasks,
            search_index,
            clock,
        }
    }

    /// Runs the pipeline for one task.
    ///
    /// Fetch, normalization, and reconciliation failures are logged and the
    /// run continues; only a missing/undecodable required file, an
    /// unresolvable upstream identity, a storage error, or a finalize
    /// failure aborts. A completed run returns `Ok` even when errors made
    /// it `Failed`.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::TaskNotFound`] for an unknown identifier,
    /// [`ImportError::Aborted`] when a fatal failure stopped the run, and
    /// repository/domain errors when the task cannot enter `Running`.
    pub async fn run(
        &self,
        host: Arc<dyn RepositoryHost>,
        task_id: ImportTaskId,
    ) -> Result<ImportOutcome, ImportError> {
        tracing::info!(%task_id, "starting import task");
        let mut task = self
            .tasks
            .find_by_id(task_id)
            .await?
            .ok_or(ImportError::TaskNotFound(task_id))?;
        task.start(&*self.clock)?;
        self.tasks.update(&task).await?;

        let recorder =
            DiagnosticRecorder::new(Arc::clone(&self.tasks), task_id, Arc::clone(&self.clock));

        match self.execute(&host, &mut task, &recorder).await {
            Ok(role) => self.finalize(task, role, &recorder).await,
            Err(Fatal(message)) => Err(self.abort(&mut task, &recorder, message).await),
        }
    }

    async fn execute(
        &self,
        host: &Arc<dyn RepositoryHost>,
        task: &mut ImportTask,
        recorder: &DiagnosticRecorder<C>,
    ) -> Result<Role, Fatal> {
        let mut role = self
            .catalog
            .role_by_id(task.role_id())
            .await
            .map_err(|err| storage_fatal(&err))?
            .ok_or_else(|| Fatal(format!("Failed to get role for task: {}", task.id())))?;
        recorder
            .info(&format!(
                "Starting import: role_name={} repo={}.{}",
                role.name(),
                role.namespace(),
                role.name()
            ))
            .await;

        let owner = host
            .owner()
            .await
            .map_err(|err| Fatal(format!("Failed to resolve repository owner - {err}")))?;
        self.upsert_owner_namespace(&owner).await?;

        let info = host
            .repository()
            .await
            .map_err(|err| Fatal(format!("Failed to access repository - {err}")))?;

        let branch = select_branch(task, &role, &info);
        recorder.info(&format!("Accessing branch: {branch}")).await;
        task.set_branch(&branch);

        let fetcher = MetadataFetcher::new(Arc::clone(host));
        recorder
            .info(&format!("Parsing and validating {MANIFEST_PATH}"))
            .await;
        let manifest = fetcher
            .manifest(recorder, &branch)
            .await
            .map_err(|err| Fatal(err.to_string()))?;

        let info_block = manifest.galaxy_info();
        if info_block.is_none() {
            recorder
                .error(&format!("Key galaxy_info not found in {MANIFEST_PATH}"))
                .await;
        }

        if let Some(alternate_name) = task.alternate_role_name() {
            recorder
                .info(&format!("Setting role name to {alternate_name}"))
                .await;
            let renamed = alternate_name.clone();
            role.rename(renamed);
        }

        let defaults = RepoDefaults {
            description: info.description.clone(),
            issues_url: info
                .has_issues
                .then(|| format!("{}/issues", info.html_url)),
        };
        let profile_outcome = normalize_profile(info_block, &defaults);
        recorder.notes(&profile_outcome.notes).await;
        role.apply_profile(profile_outcome.profile);
        role.set_default_branch(&info.default_branch);

        self.detect_container_kind(&fetcher, recorder, &mut role, &branch)
            .await;

        recorder.info("Parsing galaxy_tags").await;
        let tag_extraction = extract_tags(info_block);
        recorder.notes(&tag_extraction.notes).await;
        self.reconcile_tags(&mut role, tag_extraction.tags).await?;

        recorder.info("Parsing platforms").await;
        match extract_platforms(info_block) {
            PlatformExtraction::Skipped(notes) => recorder.notes(&notes).await,
            PlatformExtraction::Parsed { specs, notes } => {
                recorder.notes(&notes).await;
                self.reconcile_platforms(recorder, &mut role, specs).await?;
            }
        }

        recorder.info("Adding dependencies").await;
        match extract_dependencies(&manifest) {
            DependencyExtraction::Skipped(notes) => recorder.notes(&notes).await,
            DependencyExtraction::Parsed { refs, notes } => {
                recorder.notes(&notes).await;
                self.reconcile_dependencies(recorder, &mut role, refs).await?;
            }
        }

        let readme = fetcher.readme(recorder, &branch).await;
        role.set_readme(readme);

        recorder.info("Adding repo tags as role versions").await;
        match host.tags().await {
            Ok(upstream_tags) => {
                for upstream_tag in upstream_tags {
                    match RoleVersion::new(&upstream_tag.name, upstream_tag.committed_at) {
                        Ok(version) => role.record_version(version),
                        Err(_) => {
                            recorder
                                .warning("Skipping upstream tag with an empty name")
                                .await;
                        }
                    }
                }
            }
            Err(err) => {
                recorder
                    .error(&format!(
                        "An error occurred while importing repo tags: {err}"
                    ))
                    .await;
            }
        }

        let stats = RepositoryStats {
            stargazers: info.stargazers,
            watchers: fetcher.watcher_count().await,
            forks: info.forks,
            open_issues: info.open_issues,
        };
        role.update_stats(stats);
        task.update_stats(stats);

        match host.latest_commit(&branch).await {
            Ok(Some(commit)) => {
                let commit_info = CommitInfo {
                    sha: commit.sha,
                    message: clip_chars(&commit.message, MAX_COMMIT_MESSAGE_CHARS),
                    html_url: commit.html_url,
                    committed_at: commit.committed_at,
                };
                role.record_commit(commit_info.clone());
                task.record_commit(commit_info);
            }
            Ok(None) => {
                recorder
                    .error(&format!("No commits found on branch {branch}"))
                    .await;
            }
            Err(err) => {
                recorder
                    .error(&format!(
                        "Failed to retrieve the latest commit for branch {branch}: {err}"
                    ))
                    .await;
            }
        }

        Ok(role)
    }

    async fn upsert_owner_namespace(&self, owner: &OwnerProfile) -> Result<(), Fatal> {
        let namespace = NamespaceName::new(owner.login.clone())
            .map_err(|err| Fatal(format!("Failed to resolve repository owner - {err}")))?;
        let profile = NamespaceProfile::new(
            namespace,
            NamespaceAttributes {
                display_name: owner.display_name.clone(),
                avatar_url: owner.avatar_url.clone(),
                location: owner.location.clone(),
                company: owner.company.clone(),
                email: owner.email.clone(),
                html_url: owner.html_url.clone(),
                followers: owner.followers,
            },
        );
        self.catalog
            .upsert_namespace(&profile)
            .await
            .map_err(|err| storage_fatal(&err))
    }

    async fn detect_container_kind(
        &self,
        fetcher: &MetadataFetcher,
        recorder: &DiagnosticRecorder<C>,
        role: &mut Role,
        branch: &str,
    ) {
        let container = fetcher
            .optional_document(recorder, CONTAINER_DESCRIPTOR_PATH, branch)
            .await;
        let container_app = fetcher
            .optional_document(recorder, CONTAINER_APP_DESCRIPTOR_PATH, branch)
            .await;

        match (container, container_app) {
            (Some(_), Some(_)) => {
                // Ambiguous upstream state: report only, apply neither.
                recorder
                    .error(&format!(
                        "Found {CONTAINER_APP_DESCRIPTOR_PATH} and {CONTAINER_DESCRIPTOR_PATH}. \
                         A role can have only one container descriptor file."
                    ))
                    .await;
            }
            (Some(descriptor), None) => {
                recorder
                    .info(&format!("Found {CONTAINER_DESCRIPTOR_PATH}"))
                    .await;
                recorder.info("Setting role kind to Container").await;
                self.apply_container_kind(recorder, role, RoleKind::Container, &descriptor)
                    .await;
            }
            (None, Some(descriptor)) => {
                recorder
                    .info(&format!("Found {CONTAINER_APP_DESCRIPTOR_PATH}"))
                    .await;
                recorder.info("Setting role kind to Container App").await;
                self.apply_container_kind(recorder, role, RoleKind::ContainerApp, &descriptor)
                    .await;
            }
            (None, None) => {}
        }
    }

    async fn apply_container_kind(
        &self,
        recorder: &DiagnosticRecorder<C>,
        role: &mut Role,
        kind: RoleKind,
        descriptor: &serde_yaml::Value,
    ) {
        match serde_json::to_value(descriptor) {
            Ok(stored) => role.set_kind(kind, Some(stored)),
            Err(err) => {
                recorder
                    .error(&format!("Failed to store container descriptor - {err}"))
                    .await;
            }
        }
    }

    async fn reconcile_tags(
        &self,
        role: &mut Role,
        desired_tags: Vec<TagName>,
    ) -> Result<(), Fatal> {
        let desired: BTreeSet<TagName> = desired_tags.into_iter().collect();
        let delta = plan_set(&desired, role.tags());
        for tag in delta.additions {
            self.catalog
                .find_or_create_tag(&tag)
                .await
                .map_err(|err| storage_fatal(&err))?;
            role.add_tag(tag);
        }
        for tag in &delta.removals {
            role.remove_tag(tag);
        }
        Ok(())
    }

    async fn reconcile_platforms(
        &self,
        recorder: &DiagnosticRecorder<C>,
        role: &mut Role,
        specs: Vec<PlatformSpec>,
    ) -> Result<(), Fatal> {
        let mut desired: BTreeSet<PlatformKey> = BTreeSet::new();
        for spec in specs {
            match spec.releases {
                PlatformReleases::All => {
                    let seeded = self
                        .catalog
                        .platforms_named(&spec.name)
                        .await
                        .map_err(|err| storage_fatal(&err))?;
                    for platform in seeded {
                        desired.insert(platform.key().clone());
                    }
                }
                PlatformReleases::Pinned(releases) => {
                    for release in releases {
                        let Ok(key) = PlatformKey::new(&spec.name, &release) else {
                            recorder
                                .error(&format!(
                                    "Invalid platform: {}-{release} (skipping)",
                                    spec.name
                                ))
                                .await;
                            continue;
                        };
                        match self
                            .catalog
                            .platform_by_key(&key)
                            .await
                            .map_err(|err| storage_fatal(&err))?
                        {
                            Some(platform) => {
                                desired.insert(platform.key().clone());
                            }
                            None => {
                                recorder
                                    .error(&format!(
                                        "Invalid platform: {}-{release} (skipping)",
                                        spec.name
                                    ))
                                    .await;
                            }
                        }
                    }
                }
            }
        }

        let delta = plan_set(&desired, role.platforms());
        for key in delta.additions {
            role.add_platform(key);
        }
        for key in &delta.removals {
            role.remove_platform(key);
        }
        Ok(())
    }

    async fn reconcile_dependencies(
        &self,
        recorder: &DiagnosticRecorder<C>,
        role: &mut Role,
        refs: Vec<DependencyRef>,
    ) -> Result<(), Fatal> {
        // Unresolvable keys stay in the keep-set: an association whose key
        // still appears in the metadata is preserved, never destructively
        // removed on ambiguous input.
        let keep: BTreeSet<DependencyRef> = refs.iter().cloned().collect();

        for dependency in &keep {
            if role.dependencies().contains(dependency) {
                continue;
            }
            let resolved = self
                .catalog
                .role_by_name(dependency.namespace(), dependency.name())
                .await
                .map_err(|err| storage_fatal(&err))?;
            if resolved.is_some() {
                role.add_dependency(dependency.clone());
            } else {
                recorder
                    .error(&format!("Role dependency not found: {dependency}"))
                    .await;
            }
        }

        let removals: Vec<DependencyRef> = role
            .dependencies()
            .iter()
            .filter(|current| !keep.contains(*current))
            .cloned()
            .collect();
        for dependency in &removals {
            role.remove_dependency(dependency);
        }
        Ok(())
    }

    async fn finalize(
        &self,
        mut task: ImportTask,
        mut role: Role,
        recorder: &DiagnosticRecorder<C>,
    ) -> Result<ImportOutcome, ImportError> {
        let counts = recorder.counts();
        let state = if counts.errors == 0 {
            ImportTaskState::Success
        } else {
            ImportTaskState::Failed
        };

        recorder.info("Import completed").await;
        let status_severity = if state == ImportTaskState::Success {
            Severity::Success
        } else {
            Severity::Failed
        };
        recorder
            .record(
                status_severity,
                &format!(
                    "Status {} : warnings={} errors={}",
                    state.as_str(),
                    counts.warnings,
                    counts.errors
                ),
            )
            .await;

        role.mark_imported(&*self.clock);
        if let Err(err) = self.catalog.update_role(&role).await {
            let message = format!("Error saving role: {err}");
            return Err(self.abort(&mut task, recorder, message).await);
        }

        if state == ImportTaskState::Success {
            task.succeed(&*self.clock)?;
        } else {
            task.fail(&*self.clock)?;
        }
        if let Err(err) = self.tasks.update(&task).await {
            let message = format!("Error saving import task: {err}");
            tracing::error!(task_id = %task.id(), "{message}");
            recorder.error(&message).await;
            return Err(ImportError::Aborted { message });
        }

        self.notify_search_index(&role);
        tracing::info!(
            task_id = %task.id(),
            state = state.as_str(),
            errors = counts.errors,
            warnings = counts.warnings,
            "import task completed"
        );
        Ok(ImportOutcome {
            state,
            errors: counts.errors,
            warnings: counts.warnings,
        })
    }

    /// Fires the search index update without awaiting it.
    fn notify_search_index(&self, role: &Role) {
        let mut platforms: Vec<String> = role
            .platforms()
            .iter()
            .map(|key| key.name().to_owned())
            .collect();
        platforms.dedup();
        let update = IndexUpdate {
            namespace: role.namespace().clone(),
            tags: role.tags().iter().cloned().collect(),
            platforms,
        };
        let index = Arc::clone(&self.search_index);
        drop(tokio::spawn(async move {
            index.update(update).await;
        }));
    }

    /// Records the fatal message, force-fails the task, and stops the run.
    async fn abort(
        &self,
        task: &mut ImportTask,
        recorder: &DiagnosticRecorder<C>,
        message: String,
    ) -> ImportError {
        tracing::error!(task_id = %task.id(), "{message}");
        recorder.error(&message).await;
        if !task.state().is_terminal() && task.fail(&*self.clock).is_ok() {
            if let Err(err) = self.tasks.update(task).await {
                tracing::error!(
                    task_id = %task.id(),
                    error = %err,
                    "failed to persist aborted task state"
                );
            }
        }
        ImportError::Aborted { message }
    }
}

/// Branch priority: pinned task reference, then the role's source branch,
/// then the upstream default.
fn select_branch(task: &ImportTask, role: &Role, info: &RepositoryInfo) -> String {
    if let Some(pinned) = task.pinned_ref() {
        return pinned.to_owned();
    }
    let source_branch = &role.profile().source_branch;
    if !source_branch.is_empty() {
        return source_branch.clone();
    }
    info.default_branch.clone()
}
