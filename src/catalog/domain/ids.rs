//! Identifier and validated scalar types for the catalog domain.

use super::CatalogDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a role record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleId(Uuid);

impl RoleId {
    /// Creates a new random role identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a role identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for RoleId {
    fn default() -> Self {
        Self::new()
    }
}

impl AsRef<Uuid> for RoleId {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Normalized upstream account or organization name a role is published
/// under.
///
/// Namespaces may contain dots; dependency references treat everything up to
/// the final dot as the namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NamespaceName(String);

impl NamespaceName {
    /// Creates a validated namespace name.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogDomainError::InvalidNamespace`] when the trimmed
    /// value is empty or contains whitespace.
    pub fn new(value: impl Into<String>) -> Result<Self, CatalogDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        if normalized.is_empty() || normalized.chars().any(char::is_whitespace) {
            return Err(CatalogDomainError::InvalidNamespace(raw));
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Returns the namespace as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for NamespaceName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for NamespaceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Normalized role name within a namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleName(String);

impl RoleName {
    /// Creates a validated role name.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogDomainError::InvalidRoleName`] when the trimmed
    /// value is empty or contains whitespace.
    pub fn new(value: impl Into<String>) -> Result<Self, CatalogDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        if normalized.is_empty() || normalized.chars().any(char::is_whitespace) {
            return Err(CatalogDomainError::InvalidRoleName(raw));
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Returns the role name as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for RoleName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reference to another role in `namespace.name` dotted form.
///
/// Namespaces containing dots are supported: everything up to the final dot
/// is the namespace, the final segment is the role name. `"alice.nginx"`
/// resolves to namespace `alice` and name `nginx`; `"a.b.c"` resolves to
/// namespace `a.b` and name `c`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DependencyRef {
    namespace: NamespaceName,
    name: RoleName,
}

impl DependencyRef {
    /// Creates a dependency reference from already-validated parts.
    #[must_use]
    pub const fn from_parts(namespace: NamespaceName, name: RoleName) -> Self {
        Self { namespace, name }
    }

    /// Parses a dotted `namespace.name` reference.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogDomainError::InvalidDependencyRef`] when the value
    /// has fewer than two dot-separated segments or either part fails
    /// validation.
    pub fn parse(spec: &str) -> Result<Self, CatalogDomainError> {
        let trimmed = spec.trim();
        let Some((namespace, name)) = trimmed.rsplit_once('.') else {
            return Err(CatalogDomainError::InvalidDependencyRef(spec.to_owned()));
        };
        let namespace = NamespaceName::new(namespace)
            .map_err(|_| CatalogDomainError::InvalidDependencyRef(spec.to_owned()))?;
        let name = RoleName::new(name)
            .map_err(|_| CatalogDomainError::InvalidDependencyRef(spec.to_owned()))?;
        Ok(Self { namespace, name })
    }

    /// Returns the namespace part.
    #[must_use]
    pub const fn namespace(&self) -> &NamespaceName {
        &self.namespace
    }

    /// Returns the role name part.
    #[must_use]
    pub const fn name(&self) -> &RoleName {
        &self.name
    }
}

impl fmt::Display for DependencyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.namespace, self.name)
    }
}
