//! Scriptable in-memory repository host for tests.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::import::ports::{
    HostError, HostResult, OwnerProfile, RemoteReadme, RepositoryHost, RepositoryInfo,
    UpstreamCommit, UpstreamTag,
};

/// Repository host double serving fixture data.
///
/// Anything not explicitly configured answers with
/// [`HostError::NotFound`], which is exactly how an absent upstream file
/// behaves.
#[derive(Debug, Clone, Default)]
pub struct FixtureRepositoryHost {
    files: HashMap<String, Vec<u8>>,
    readme: Option<RemoteReadme>,
    rendered_readme: Option<String>,
    info: RepositoryInfo,
    owner: OwnerProfile,
    subscribers: Vec<String>,
    commit: Option<UpstreamCommit>,
    upstream_tags: Vec<UpstreamTag>,
    unavailable: bool,
}

impl FixtureRepositoryHost {
    /// Creates a host with the given repository and owner fixtures.
    #[must_use]
    pub fn new(info: RepositoryInfo, owner: OwnerProfile) -> Self {
        Self {
            info,
            owner,
            ..Self::default()
        }
    }

    /// Serves `content` for `path` at any reference.
    #[must_use]
    pub fn with_file(mut self, path: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        self.files.insert(path.into(), content.into());
        self
    }

    /// Serves a README file.
    #[must_use]
    pub fn with_readme(mut self, file_name: impl Into<String>, content: impl Into<String>) -> Self {
        let content = content.into();
        self.rendered_readme = Some(format!("<p>{content}</p>"));
        self.readme = Some(RemoteReadme {
            file_name: file_name.into(),
            content,
        });
        self
    }

    /// Serves subscriber logins.
    #[must_use]
    pub fn with_subscribers(mut self, subscribers: impl IntoIterator<Item = String>) -> Self {
        self.subscribers = subscribers.into_iter().collect();
        self
    }

    /// Serves a latest commit for every branch.
    #[must_use]
    pub fn with_commit(mut self, commit: UpstreamCommit) -> Self {
        self.commit = Some(commit);
        self
    }

    /// Serves upstream repository tags.
    #[must_use]
    pub fn with_tags(mut self, upstream_tags: impl IntoIterator<Item = UpstreamTag>) -> Self {
        self.upstream_tags = upstream_tags.into_iter().collect();
        self
    }

    /// Makes every operation fail as if the host were unreachable.
    #[must_use]
    pub fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }

    fn check_available(&self) -> HostResult<()> {
        if self.unavailable {
            return Err(HostError::Unavailable("connection refused".to_owned()));
        }
        Ok(())
    }
}

#[async_trait]
impl RepositoryHost for FixtureRepositoryHost {
    async fn file(&self, path: &str, _git_ref: &str) -> HostResult<Vec<u8>> {
        self.check_available()?;
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| HostError::NotFound(path.to_owned()))
    }

    async fn readme(&self, _git_ref: &str) -> HostResult<RemoteReadme> {
        self.check_available()?;
        self.readme
            .clone()
            .ok_or_else(|| HostError::NotFound("README".to_owned()))
    }

    async fn rendered_readme(&self, _git_ref: &str) -> HostResult<String> {
        self.check_available()?;
        self.rendered_readme
            .clone()
            .ok_or_else(|| HostError::NotFound("README".to_owned()))
    }

    async fn repository(&self) -> HostResult<RepositoryInfo> {
        self.check_available()?;
        Ok(self.info.clone())
    }

    async fn subscribers(&self) -> HostResult<Vec<String>> {
        self.check_available()?;
        Ok(self.subscribers.clone())
    }

    async fn latest_commit(&self, _branch: &str) -> HostResult<Option<UpstreamCommit>> {
        self.check_available()?;
        Ok(self.commit.clone())
    }

    async fn tags(&self) -> HostResult<Vec<UpstreamTag>> {
        self.check_available()?;
        Ok(self.upstream_tags.clone())
    }

    async fn owner(&self) -> HostResult<OwnerProfile> {
        self.check_available()?;
        Ok(self.owner.clone())
    }
}
