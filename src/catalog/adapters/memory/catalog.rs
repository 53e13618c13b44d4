//! Thread-safe in-memory catalog repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::catalog::{
    domain::{
        NamespaceName, NamespaceProfile, Platform, PlatformKey, Role, RoleId, RoleName, Tag,
        TagName,
    },
    ports::{CatalogRepository, CatalogRepositoryError, CatalogRepositoryResult},
};

/// In-memory [`CatalogRepository`] backed by hash maps.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    state: Arc<RwLock<InMemoryCatalogState>>,
}

#[derive(Debug, Default)]
struct InMemoryCatalogState {
    roles: HashMap<RoleId, Role>,
    name_index: HashMap<(NamespaceName, RoleName), RoleId>,
    tags: HashMap<TagName, Tag>,
    platforms: HashMap<PlatformKey, Platform>,
    namespaces: HashMap<NamespaceName, NamespaceProfile>,
}

impl InMemoryCatalog {
    /// Creates an empty in-memory catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_poisoned(err: impl std::fmt::Display) -> CatalogRepositoryError {
    CatalogRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl CatalogRepository for InMemoryCatalog {
    async fn store_role(&self, role: &Role) -> CatalogRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        let key = (role.namespace().clone(), role.name().clone());
        if state.name_index.contains_key(&key) {
            return Err(CatalogRepositoryError::DuplicateRole {
                namespace: role.namespace().clone(),
                name: role.name().clone(),
            });
        }
        state.name_index.insert(key, role.id());
        state.roles.insert(role.id(), role.clone());
        Ok(())
    }

    async fn update_role(&self, role: &Role) -> CatalogRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        let old = state
            .roles
            .get(&role.id())
            .ok_or(CatalogRepositoryError::RoleNotFound(role.id()))?
            .clone();

        // A rename moves the (namespace, name) index entry.
        let old_key = (old.namespace().clone(), old.name().clone());
        state.name_index.remove(&old_key);
        state
            .name_index
            .insert((role.namespace().clone(), role.name().clone()), role.id());
        state.roles.insert(role.id(), role.clone());
        Ok(())
    }

    async fn role_by_id(&self, id: RoleId) -> CatalogRepositoryResult<Option<Role>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state.roles.get(&id).cloned())
    }

    async fn role_by_name(
        &self,
        namespace: &NamespaceName,
        name: &RoleName,
    ) -> CatalogRepositoryResult<Option<Role>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        let role = state
            .name_index
            .get(&(namespace.clone(), name.clone()))
            .and_then(|id| state.roles.get(id))
            .cloned();
        Ok(role)
    }

    async fn find_or_create_tag(&self, name: &TagName) -> CatalogRepositoryResult<Tag> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        let tag = state
            .tags
            .entry(name.clone())
            .or_insert_with(|| Tag::new(name.clone()));
        Ok(tag.clone())
    }

    async fn platform_by_key(
        &self,
        key: &PlatformKey,
    ) -> CatalogRepositoryResult<Option<Platform>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state.platforms.get(key).cloned())
    }

    async fn platforms_named(&self, name: &str) -> CatalogRepositoryResult<Vec<Platform>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        let mut matches: Vec<Platform> = state
            .platforms
            .values()
            .filter(|platform| platform.key().name() == name)
            .cloned()
            .collect();
        matches.sort_by(|a, b| a.key().cmp(b.key()));
        Ok(matches)
    }

    async fn store_platform(&self, platform: &Platform) -> CatalogRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        state
            .platforms
            .insert(platform.key().clone(), platform.clone());
        Ok(())
    }

    async fn upsert_namespace(&self, profile: &NamespaceProfile) -> CatalogRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        state
            .namespaces
            .insert(profile.namespace().clone(), profile.clone());
        Ok(())
    }

    async fn namespace(
        &self,
        name: &NamespaceName,
    ) -> CatalogRepositoryResult<Option<NamespaceProfile>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state.namespaces.get(name).cloned())
    }
}
