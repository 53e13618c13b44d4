//! Shared tag entity and validated tag names.

use super::CatalogDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Normalized tag name shared across roles.
///
/// Tag names are ASCII alphanumeric. The legacy "categories" metadata form
/// may carry a single internal `:` separator; the import pipeline splits on
/// it before tokens reach this type, so a stored name holds at most one
/// separator and never starts or ends with it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagName(String);

impl TagName {
    /// Creates a validated tag name.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogDomainError::InvalidTagName`] when the value is not
    /// alphanumeric, or carries more than one internal separator.
    pub fn new(value: impl Into<String>) -> Result<Self, CatalogDomainError> {
        let raw = value.into();
        let mut segments = raw.split(':');
        let first = segments.next().unwrap_or_default();
        let second = segments.next();
        let has_more = segments.next().is_some();

        let segment_ok = |segment: &str| {
            !segment.is_empty() && segment.chars().all(|c| c.is_ascii_alphanumeric())
        };
        let is_valid =
            segment_ok(first) && second.is_none_or(segment_ok) && !has_more;
        if !is_valid {
            return Err(CatalogDomainError::InvalidTagName(raw));
        }
        Ok(Self(raw))
    }

    /// Returns the tag name as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TagName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for TagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Canonical tag entity, shared across roles via find-or-create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    id: Uuid,
    name: TagName,
}

impl Tag {
    /// Creates a new tag entity with a fresh identifier.
    #[must_use]
    pub fn new(name: TagName) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
        }
    }

    /// Reconstructs a tag from persisted storage.
    #[must_use]
    pub const fn from_persisted(id: Uuid, name: TagName) -> Self {
        Self { id, name }
    }

    /// Returns the tag identifier.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the tag name.
    #[must_use]
    pub const fn name(&self) -> &TagName {
        &self.name
    }
}
