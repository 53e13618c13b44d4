//! Platform reference data and association keys.

use super::CatalogDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A (name, release) pair identifying one supported platform release.
///
/// Keys render as `name-release`, the form used in diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlatformKey {
    name: String,
    release: String,
}

impl PlatformKey {
    /// Creates a validated platform key.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogDomainError::EmptyPlatformName`] or
    /// [`CatalogDomainError::EmptyPlatformRelease`] when either trimmed part
    /// is empty.
    pub fn new(
        name: impl Into<String>,
        release: impl Into<String>,
    ) -> Result<Self, CatalogDomainError> {
        let name = name.into().trim().to_owned();
        if name.is_empty() {
            return Err(CatalogDomainError::EmptyPlatformName);
        }
        let release = release.into().trim().to_owned();
        if release.is_empty() {
            return Err(CatalogDomainError::EmptyPlatformRelease);
        }
        Ok(Self { name, release })
    }

    /// Returns the platform name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the platform release.
    #[must_use]
    pub fn release(&self) -> &str {
        &self.release
    }
}

impl fmt::Display for PlatformKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.name, self.release)
    }
}

/// Stored platform entity.
///
/// Platforms are pre-seeded reference data: the import pipeline looks them
/// up and never creates them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    id: Uuid,
    key: PlatformKey,
}

impl Platform {
    /// Creates a new platform entity with a fresh identifier.
    #[must_use]
    pub fn new(key: PlatformKey) -> Self {
        Self {
            id: Uuid::new_v4(),
            key,
        }
    }

    /// Reconstructs a platform from persisted storage.
    #[must_use]
    pub const fn from_persisted(id: Uuid, key: PlatformKey) -> Self {
        Self { id, key }
    }

    /// Returns the platform identifier.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the (name, release) key.
    #[must_use]
    pub const fn key(&self) -> &PlatformKey {
        &self.key
    }
}
