//! Release history entries derived from upstream repository tags.

use super::CatalogDomainError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One release of a role, keyed by the upstream tag name.
///
/// Versions are historical: the upstream tag list may legitimately shrink
/// without meaning a release never existed, so versions are only ever added
/// or updated, never removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleVersion {
    name: String,
    release_date: DateTime<Utc>,
}

impl RoleVersion {
    /// Creates a validated role version.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogDomainError::EmptyVersionName`] when the trimmed
    /// name is empty.
    pub fn new(
        name: impl Into<String>,
        release_date: DateTime<Utc>,
    ) -> Result<Self, CatalogDomainError> {
        let name = name.into().trim().to_owned();
        if name.is_empty() {
            return Err(CatalogDomainError::EmptyVersionName);
        }
        Ok(Self { name, release_date })
    }

    /// Returns the upstream tag name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the release date taken from the upstream tag commit.
    #[must_use]
    pub const fn release_date(&self) -> DateTime<Utc> {
        self.release_date
    }
}
