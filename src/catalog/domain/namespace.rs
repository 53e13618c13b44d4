//! Namespace profiles mirrored from the upstream account or organization.

use super::NamespaceName;
use serde::{Deserialize, Serialize};

/// Upstream account/organization attributes stored per namespace.
///
/// Profiles are upserted by the import pipeline on every run and never
/// deleted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceAttributes {
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
    /// Follower count at the time of the last import.
    pub followers: Option<u64>,
}

/// A namespace together with its mirrored upstream attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceProfile {
    namespace: NamespaceName,
    attributes: NamespaceAttributes,
}

impl NamespaceProfile {
    /// Creates a namespace profile.
    #[must_use]
    pub const fn new(namespace: NamespaceName, attributes: NamespaceAttributes) -> Self {
        Self {
            namespace,
            attributes,
        }
    }

    /// Returns the namespace name.
    #[must_use]
    pub const fn namespace(&self) -> &NamespaceName {
        &self.namespace
    }

    /// Returns the mirrored attributes.
    #[must_use]
    pub const fn attributes(&self) -> &NamespaceAttributes {
        &self.attributes
    }

    /// Replaces the mirrored attributes with a fresh upstream snapshot.
    pub fn refresh(&mut self, attributes: NamespaceAttributes) {
        self.attributes = attributes;
    }
}
