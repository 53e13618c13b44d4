//! Metadata retrieval against the repository host.
//!
//! The fetcher distinguishes required from optional files: a required file
//! that cannot be fetched or decoded yields a typed failure for the
//! controller to classify, while an optional file is silently treated as
//! absent. Decode failures on present files are always reported.

use super::DiagnosticRecorder;
use crate::catalog::domain::{Readme, ReadmeKind};
use crate::import::manifest::{MANIFEST_PATH, Manifest, parse_document};
use crate::import::ports::RepositoryHost;
use mockable::Clock;
use serde_yaml::Value;
use std::sync::Arc;
use thiserror::Error;

/// Typed failure for a required metadata file.
///
/// The display text is what the abort path records, matching the fatal
/// taxonomy: missing required file, or present but undecodable.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchFailure {
    /// The required file could not be fetched.
    #[error("Failed to find {path} - {reason}")]
    Missing {
        /// Repository path of the file.
        path: String,
        /// Upstream failure description.
        reason: String,
    },

    /// The required file was present but could not be decoded.
    #[error("Failed to parse {path}. Check YAML syntax.")]
    Undecodable {
        /// Repository path of the file.
        path: String,
    },
}

/// Retrieves and decodes role metadata from one repository.
pub struct MetadataFetcher {
    host: Arc<dyn RepositoryHost>,
}

impl MetadataFetcher {
    /// Creates a fetcher over a repository host handle.
    #[must_use]
    pub fn new(host: Arc<dyn RepositoryHost>) -> Self {
        Self { host }
    }

    /// Fetches and decodes the required role manifest.
    ///
    /// # Errors
    ///
    /// Returns [`FetchFailure`] when the manifest is missing or does not
    /// decode; decode failures are additionally recorded as ERROR entries.
    pub async fn manifest<C>(
        &self,
        recorder: &DiagnosticRecorder<C>,
        git_ref: &str,
    ) -> Result<Manifest, FetchFailure>
    where
        C: Clock + Send + Sync,
    {
        let bytes = self.host.file(MANIFEST_PATH, git_ref).await.map_err(|err| {
            FetchFailure::Missing {
                path: MANIFEST_PATH.to_owned(),
                reason: err.to_string(),
            }
        })?;
        match Manifest::parse(&bytes) {
            Ok(manifest) => Ok(manifest),
            Err(err) => {
                recorder.error(&err.to_string()).await;
                Err(FetchFailure::Undecodable {
                    path: MANIFEST_PATH.to_owned(),
                })
            }
        }
    }

    /// Fetches an optional YAML document.
    ///
    /// A file that cannot be fetched is silently absent; a present file
    /// that fails to decode is reported as an ERROR and treated as absent.
    pub async fn optional_document<C>(
        &self,
        recorder: &DiagnosticRecorder<C>,
        path: &str,
        git_ref: &str,
    ) -> Option<Value>
    where
        C: Clock + Send + Sync,
    {
        let bytes = self.host.file(path, git_ref).await.ok()?;
        match parse_document(&bytes) {
            Ok(value) => Some(value),
            Err(err) => {
                recorder.error(&format!("Failed to decode {path} - {err}")).await;
                None
            }
        }
    }

    /// Fetches the README in raw and host-rendered form.
    ///
    /// A missing README is an ERROR (every role repository must carry one)
    /// but never fatal; an unrecognized file suffix is an ERROR with the
    /// type left unset.
    pub async fn readme<C>(
        &self,
        recorder: &DiagnosticRecorder<C>,
        git_ref: &str,
    ) -> Option<Readme>
    where
        C: Clock + Send + Sync,
    {
        recorder.info("Parsing and validating README").await;

        let rendered_html = match self.host.rendered_readme(git_ref).await {
            Ok(html) => Some(html),
            Err(err) => {
                recorder
                    .error(&format!("Failed to get HTML version of README: {err}"))
                    .await;
                None
            }
        };

        let remote = match self.host.readme(git_ref).await {
            Ok(remote) => remote,
            Err(_) => {
                recorder
                    .error("Failed to get README. All role repositories must include a README.")
                    .await;
                return None;
            }
        };

        let kind = ReadmeKind::from_file_name(&remote.file_name);
        if kind.is_none() {
            recorder
                .error(
                    "Unable to determine README file type. Expecting file extension to be \
                     one of: .md, .rst",
                )
                .await;
        }

        Some(Readme {
            raw: remote.content,
            rendered_html,
            kind,
        })
    }

    /// Counts watchers by full subscriber enumeration.
    ///
    /// The host exposes no direct count; enumeration failure is
    /// best-effort and yields zero.
    pub async fn watcher_count(&self) -> u64 {
        match self.host.subscribers().await {
            Ok(subscribers) => u64::try_from(subscribers.len()).unwrap_or(u64::MAX),
            Err(err) => {
                tracing::debug!(error = %err, "subscriber enumeration failed");
                0
            }
        }
    }
}
