//! Repository port for catalog persistence and shared-entity lookup.

use crate::catalog::domain::{
    NamespaceName, NamespaceProfile, Platform, PlatformKey, Role, RoleId, RoleName, Tag, TagName,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for catalog repository operations.
pub type CatalogRepositoryResult<T> = Result<T, CatalogRepositoryError>;

/// Catalog persistence contract.
///
/// Tag and namespace upserts follow explicit find-or-create semantics and
/// return owned handles. Platforms are reference data: they are looked up
/// and seeded, never created implicitly by an import.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Stores a new role.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogRepositoryError::DuplicateRole`] when a role with
    /// the same (namespace, name) already exists.
    async fn store_role(&self, role: &Role) -> CatalogRepositoryResult<()>;

    /// Persists changes to an existing role, including its set-valued
    /// relations and release history.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogRepositoryError::RoleNotFound`] when the role does
    /// not exist.
    async fn update_role(&self, role: &Role) -> CatalogRepositoryResult<()>;

    /// Finds a role by internal identifier.
    ///
    /// Returns `None` when the role does not exist.
    async fn role_by_id(&self, id: RoleId) -> CatalogRepositoryResult<Option<Role>>;

    /// Finds a role by its (namespace, name) pair.
    ///
    /// Returns `None` when no role matches; dependency resolution relies on
    /// this lookup and never creates roles.
    async fn role_by_name(
        &self,
        namespace: &NamespaceName,
        name: &RoleName,
    ) -> CatalogRepositoryResult<Option<Role>>;

    /// Looks up the canonical tag for `name`, creating it when absent.
    async fn find_or_create_tag(&self, name: &TagName) -> CatalogRepositoryResult<Tag>;

    /// Finds a platform by its exact (name, release) key.
    ///
    /// Returns `None` when the release is not seeded for that name.
    async fn platform_by_key(
        &self,
        key: &PlatformKey,
    ) -> CatalogRepositoryResult<Option<Platform>>;

    /// Returns every seeded release for the given platform name.
    ///
    /// The `all` release sentinel expands through this lookup.
    async fn platforms_named(&self, name: &str) -> CatalogRepositoryResult<Vec<Platform>>;

    /// Seeds a platform release.
    async fn store_platform(&self, platform: &Platform) -> CatalogRepositoryResult<()>;

    /// Inserts or refreshes a namespace profile. Namespaces are never
    /// deleted.
    async fn upsert_namespace(&self, profile: &NamespaceProfile) -> CatalogRepositoryResult<()>;

    /// Finds a namespace profile by name.
    async fn namespace(
        &self,
        name: &NamespaceName,
    ) -> CatalogRepositoryResult<Option<NamespaceProfile>>;
}

/// Errors returned by catalog repository implementations.
#[derive(Debug, Clone, Error)]
pub enum CatalogRepositoryError {
    /// A role with the same (namespace, name) already exists.
    #[error("duplicate role: {namespace}.{name}")]
    DuplicateRole {
        /// Namespace of the conflicting role.
        namespace: NamespaceName,
        /// Name of the conflicting role.
        name: RoleName,
    },

    /// The role was not found.
    #[error("role not found: {0}")]
    RoleNotFound(RoleId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl CatalogRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
