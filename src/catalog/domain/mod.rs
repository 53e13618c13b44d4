//! Domain model for the role catalog.
//!
//! The catalog domain covers the role aggregate and the shared entities it
//! associates with: tags, platforms, release versions, and namespaces. All
//! infrastructure concerns stay outside the domain boundary.

mod error;
mod ids;
mod namespace;
mod platform;
mod role;
mod tag;
mod version;

pub use error::{CatalogDomainError, ParseRoleKindError};
pub use ids::{DependencyRef, NamespaceName, RoleId, RoleName};
pub use namespace::{NamespaceAttributes, NamespaceProfile};
pub use platform::{Platform, PlatformKey};
pub use role::{
    CommitInfo, PersistedRoleData, Readme, ReadmeKind, RepositoryStats, Role, RoleKind,
    RoleProfile,
};
pub use tag::{Tag, TagName};
pub use version::RoleVersion;
