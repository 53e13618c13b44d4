//! Error types for catalog domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing catalog domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogDomainError {
    /// The namespace value is empty or contains whitespace.
    #[error("invalid namespace '{0}', expected a non-empty value without whitespace")]
    InvalidNamespace(String),

    /// The role name is empty or contains whitespace.
    #[error("invalid role name '{0}', expected a non-empty value without whitespace")]
    InvalidRoleName(String),

    /// The tag name contains characters outside the allowed set.
    #[error("invalid tag name '{0}', expected alphanumeric characters")]
    InvalidTagName(String),

    /// The dependency reference does not follow `namespace.name` format.
    #[error("invalid dependency reference '{0}', expected namespace.name")]
    InvalidDependencyRef(String),

    /// The platform name is empty after trimming.
    #[error("platform name must not be empty")]
    EmptyPlatformName,

    /// The platform release is empty after trimming.
    #[error("platform release must not be empty")]
    EmptyPlatformRelease,

    /// The version name is empty after trimming.
    #[error("version name must not be empty")]
    EmptyVersionName,

    /// The issue tracker URL is missing a scheme, host, or path component.
    #[error("invalid issue tracker URL '{0}', expected scheme, host, and path")]
    InvalidIssueTrackerUrl(String),
}

/// Error returned while parsing role kinds from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown role kind: {0}")]
pub struct ParseRoleKindError(pub String);
