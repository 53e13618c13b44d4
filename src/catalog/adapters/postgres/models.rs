//! Diesel row models for catalog persistence.

use super::schema::{namespaces, platforms, role_dependencies, role_platforms, role_tags,
    role_versions, roles, tags};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for role records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = roles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RoleRow {
    /// Internal role identifier.
    pub id: uuid::Uuid,
    /// Namespace the role is published under.
    pub namespace: String,
    /// Role name within the namespace.
    pub name: String,
    /// Normalized descriptive fields payload.
    pub profile: Value,
    /// Upstream default branch.
    pub default_branch: String,
    /// Role kind.
    pub kind: String,
    /// Verbatim container descriptor, when present.
    pub container_descriptor: Option<Value>,
    /// Captured README payload, when present.
    pub readme: Option<Value>,
    /// Cached repository statistics payload.
    pub stats: Value,
    /// Latest-commit metadata payload, when present.
    pub commit: Option<Value>,
    /// Whether the last completed import marked the role valid.
    pub is_valid: bool,
    /// Last-import timestamp.
    pub imported_at: Option<DateTime<Utc>>,
}

/// Insert and update model for role records.
///
/// `treat_none_as_null` makes clearing an optional column (descriptor,
/// README, commit) actually persist on update.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = roles)]
#[diesel(treat_none_as_null = true)]
pub struct NewRoleRow {
    /// Internal role identifier.
    pub id: uuid::Uuid,
    /// Namespace the role is published under.
    pub namespace: String,
    /// Role name within the namespace.
    pub name: String,
    /// Normalized descriptive fields payload.
    pub profile: Value,
    /// Upstream default branch.
    pub default_branch: String,
    /// Role kind.
    pub kind: String,
    /// Verbatim container descriptor, when present.
    pub container_descriptor: Option<Value>,
    /// Captured README payload, when present.
    pub readme: Option<Value>,
    /// Cached repository statistics payload.
    pub stats: Value,
    /// Latest-commit metadata payload, when present.
    pub commit: Option<Value>,
    /// Whether the last completed import marked the role valid.
    pub is_valid: bool,
    /// Last-import timestamp.
    pub imported_at: Option<DateTime<Utc>>,
}

/// Query result row for tag records.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = tags)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TagRow {
    /// Tag identifier.
    pub id: uuid::Uuid,
    /// Unique tag name.
    pub name: String,
}

/// Query result row for platform records.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = platforms)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PlatformRow {
    /// Platform identifier.
    pub id: uuid::Uuid,
    /// Platform name.
    pub name: String,
    /// Platform release.
    pub release: String,
}

/// Row model for namespace profiles.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = namespaces)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NamespaceRow {
    /// Namespace name.
    pub namespace: String,
    /// Mirrored upstream attributes payload.
    pub attributes: Value,
}

/// Row model for role-to-tag associations.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = role_tags)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RoleTagRow {
    /// Owning role.
    pub role_id: uuid::Uuid,
    /// Associated tag.
    pub tag_id: uuid::Uuid,
}

/// Row model for role-to-platform associations.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = role_platforms)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RolePlatformRow {
    /// Owning role.
    pub role_id: uuid::Uuid,
    /// Associated platform release.
    pub platform_id: uuid::Uuid,
}

/// Row model for dependency references.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = role_dependencies)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RoleDependencyRow {
    /// Owning role.
    pub role_id: uuid::Uuid,
    /// Dependency namespace.
    pub namespace: String,
    /// Dependency role name.
    pub name: String,
}

/// Row model for release history entries.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = role_versions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RoleVersionRow {
    /// Owning role.
    pub role_id: uuid::Uuid,
    /// Upstream tag name.
    pub name: String,
    /// Release date from the upstream tag commit.
    pub release_date: DateTime<Utc>,
}
