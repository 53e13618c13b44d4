//! `PostgreSQL` repository implementation for catalog storage.

use super::{
    models::{
        NamespaceRow, NewRoleRow, PlatformRow, RoleDependencyRow, RolePlatformRow, RoleRow,
        RoleTagRow, RoleVersionRow, TagRow,
    },
    schema::{namespaces, platforms, role_dependencies, role_platforms, role_tags, role_versions,
        roles, tags},
};
use crate::catalog::{
    domain::{
        CommitInfo, DependencyRef, NamespaceAttributes, NamespaceName, NamespaceProfile,
        PersistedRoleData, Platform, PlatformKey, Readme, RepositoryStats, Role, RoleId, RoleKind,
        RoleName, RoleProfile, RoleVersion, Tag, TagName,
    },
    ports::{CatalogRepository, CatalogRepositoryError, CatalogRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};
use std::collections::{BTreeMap, BTreeSet};

/// `PostgreSQL` connection pool type used by catalog adapters.
pub type CatalogPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed catalog repository.
#[derive(Debug, Clone)]
pub struct PostgresCatalog {
    pool: CatalogPgPool,
}

impl From<DieselError> for CatalogRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

impl PostgresCatalog {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: CatalogPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> CatalogRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> CatalogRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(CatalogRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(CatalogRepositoryError::persistence)?
    }
}

#[async_trait]
impl CatalogRepository for PostgresCatalog {
    async fn store_role(&self, role: &Role) -> CatalogRepositoryResult<()> {
        let row = to_role_row(role)?;
        let role_snapshot = role.clone();

        self.run_blocking(move |connection| {
            connection.transaction(|conn| {
                diesel::insert_into(roles::table)
                    .values(&row)
                    .execute(conn)
                    .map_err(|err| match err {
                        DieselError::DatabaseError(
                            DatabaseErrorKind::UniqueViolation,
                            ref info,
                        ) if is_role_name_unique_violation(info.as_ref()) => {
                            CatalogRepositoryError::DuplicateRole {
                                namespace: role_snapshot.namespace().clone(),
                                name: role_snapshot.name().clone(),
                            }
                        }
                        _ => CatalogRepositoryError::persistence(err),
                    })?;
                write_associations(conn, &role_snapshot)
            })
        })
        .await
    }

    async fn update_role(&self, role: &Role) -> CatalogRepositoryResult<()> {
        let row = to_role_row(role)?;
        let role_snapshot = role.clone();

        self.run_blocking(move |connection| {
            connection.transaction(|conn| {
                let updated = diesel::update(roles::table.filter(roles::id.eq(row.id)))
                    .set(&row)
                    .execute(conn)?;
                if updated == 0 {
                    return Err(CatalogRepositoryError::RoleNotFound(role_snapshot.id()));
                }
                write_associations(conn, &role_snapshot)
            })
        })
        .await
    }

    async fn role_by_id(&self, id: RoleId) -> CatalogRepositoryResult<Option<Role>> {
        self.run_blocking(move |connection| {
            let row = roles::table
                .filter(roles::id.eq(id.into_inner()))
                .select(RoleRow::as_select())
                .first::<RoleRow>(connection)
                .optional()?;
            row.map(|found| load_role(connection, found)).transpose()
        })
        .await
    }

    async fn role_by_name(
        &self,
        namespace: &NamespaceName,
        name: &RoleName,
    ) -> CatalogRepositoryResult<Option<Role>> {
        let namespace_value = namespace.as_str().to_owned();
        let name_value = name.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = roles::table
                .filter(roles::namespace.eq(namespace_value))
                .filter(roles::name.eq(name_value))
                .select(RoleRow::as_select())
                .first::<RoleRow>(connection)
                .optional()?;
            row.map(|found| load_role(connection, found)).transpose()
        })
        .await
    }

    async fn find_or_create_tag(&self, name: &TagName) -> CatalogRepositoryResult<Tag> {
        let name_value = name.as_str().to_owned();
        self.run_blocking(move |connection| {
            // Insert-then-select keeps the operation race-safe: a concurrent
            // insert wins the unique index and the select picks it up.
            diesel::insert_into(tags::table)
                .values(&TagRow {
                    id: uuid::Uuid::new_v4(),
                    name: name_value.clone(),
                })
                .on_conflict(tags::name)
                .do_nothing()
                .execute(connection)?;

            let row = tags::table
                .filter(tags::name.eq(&name_value))
                .select(TagRow::as_select())
                .first::<TagRow>(connection)?;
            row_to_tag(row)
        })
        .await
    }

    async fn platform_by_key(
        &self,
        key: &PlatformKey,
    ) -> CatalogRepositoryResult<Option<Platform>> {
        let name_value = key.name().to_owned();
        let release_value = key.release().to_owned();
        self.run_blocking(move |connection| {
            let row = platforms::table
                .filter(platforms::name.eq(name_value))
                .filter(platforms::release.eq(release_value))
                .select(PlatformRow::as_select())
                .first::<PlatformRow>(connection)
                .optional()?;
            row.map(row_to_platform).transpose()
        })
        .await
    }

    async fn platforms_named(&self, name: &str) -> CatalogRepositoryResult<Vec<Platform>> {
        let name_value = name.to_owned();
        self.run_blocking(move |connection| {
            let rows = platforms::table
                .filter(platforms::name.eq(name_value))
                .order(platforms::release.asc())
                .select(PlatformRow::as_select())
                .load::<PlatformRow>(connection)?;
            rows.into_iter().map(row_to_platform).collect()
        })
        .await
    }

    async fn store_platform(&self, platform: &Platform) -> CatalogRepositoryResult<()> {
        let row = PlatformRow {
            id: platform.id(),
            name: platform.key().name().to_owned(),
            release: platform.key().release().to_owned(),
        };
        self.run_blocking(move |connection| {
            diesel::insert_into(platforms::table)
                .values(&row)
                .on_conflict((platforms::name, platforms::release))
                .do_nothing()
                .execute(connection)?;
            Ok(())
        })
        .await
    }

    async fn upsert_namespace(&self, profile: &NamespaceProfile) -> CatalogRepositoryResult<()> {
        let row = NamespaceRow {
            namespace: profile.namespace().as_str().to_owned(),
            attributes: serde_json::to_value(profile.attributes())
                .map_err(CatalogRepositoryError::persistence)?,
        };
        self.run_blocking(move |connection| {
            diesel::insert_into(namespaces::table)
                .values(&row)
                .on_conflict(namespaces::namespace)
                .do_update()
                .set(namespaces::attributes.eq(&row.attributes))
                .execute(connection)?;
            Ok(())
        })
        .await
    }

    async fn namespace(
        &self,
        name: &NamespaceName,
    ) -> CatalogRepositoryResult<Option<NamespaceProfile>> {
        let name_value = name.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = namespaces::table
                .filter(namespaces::namespace.eq(name_value))
                .select(NamespaceRow::as_select())
                .first::<NamespaceRow>(connection)
                .optional()?;
            row.map(row_to_namespace).transpose()
        })
        .await
    }
}

fn is_role_name_unique_violation(info: &dyn DatabaseErrorInformation) -> bool {
    info.constraint_name()
        .is_some_and(|name| name == "idx_roles_namespace_name_unique")
}

fn to_role_row(role: &Role) -> CatalogRepositoryResult<NewRoleRow> {
    let profile =
        serde_json::to_value(role.profile()).map_err(CatalogRepositoryError::persistence)?;
    let stats =
        serde_json::to_value(role.stats()).map_err(CatalogRepositoryError::persistence)?;
    let readme = role
        .readme()
        .map(serde_json::to_value)
        .transpose()
        .map_err(CatalogRepositoryError::persistence)?;
    let commit = role
        .commit()
        .map(serde_json::to_value)
        .transpose()
        .map_err(CatalogRepositoryError::persistence)?;

    Ok(NewRoleRow {
        id: role.id().into_inner(),
        namespace: role.namespace().as_str().to_owned(),
        name: role.name().as_str().to_owned(),
        profile,
        default_branch: role.default_branch().to_owned(),
        kind: role.kind().as_str().to_owned(),
        container_descriptor: role.container_descriptor().cloned(),
        readme,
        stats,
        commit,
        is_valid: role.is_valid(),
        imported_at: role.imported_at(),
    })
}

/// Rewrites a role's association and version rows to match the aggregate.
///
/// Additions and removals are computed against the stored rows so an
/// unchanged aggregate produces no writes.
fn write_associations(conn: &mut PgConnection, role: &Role) -> CatalogRepositoryResult<()> {
    write_tag_links(conn, role)?;
    write_platform_links(conn, role)?;
    write_dependency_links(conn, role)?;
    write_versions(conn, role)
}

fn write_tag_links(conn: &mut PgConnection, role: &Role) -> CatalogRepositoryResult<()> {
    let role_id = role.id().into_inner();
    let names: Vec<String> = role
        .tags()
        .iter()
        .map(|tag| tag.as_str().to_owned())
        .collect();
    let desired: Vec<TagRow> = tags::table
        .filter(tags::name.eq_any(&names))
        .select(TagRow::as_select())
        .load::<TagRow>(conn)?;
    let desired_ids: BTreeSet<uuid::Uuid> = desired.iter().map(|row| row.id).collect();

    diesel::delete(
        role_tags::table
            .filter(role_tags::role_id.eq(role_id))
            .filter(role_tags::tag_id.ne_all(desired_ids.iter().copied().collect::<Vec<_>>())),
    )
    .execute(conn)?;

    let links: Vec<RoleTagRow> = desired_ids
        .into_iter()
        .map(|tag_id| RoleTagRow { role_id, tag_id })
        .collect();
    diesel::insert_into(role_tags::table)
        .values(&links)
        .on_conflict_do_nothing()
        .execute(conn)?;
    Ok(())
}

fn write_platform_links(conn: &mut PgConnection, role: &Role) -> CatalogRepositoryResult<()> {
    let role_id = role.id().into_inner();
    let names: Vec<String> = role
        .platforms()
        .iter()
        .map(|key| key.name().to_owned())
        .collect();
    let candidates: Vec<PlatformRow> = platforms::table
        .filter(platforms::name.eq_any(&names))
        .select(PlatformRow::as_select())
        .load::<PlatformRow>(conn)?;
    let desired_ids: BTreeSet<uuid::Uuid> = candidates
        .iter()
        .filter(|row| {
            PlatformKey::new(row.name.clone(), row.release.clone())
                .is_ok_and(|key| role.platforms().contains(&key))
        })
        .map(|row| row.id)
        .collect();

    diesel::delete(
        role_platforms::table
            .filter(role_platforms::role_id.eq(role_id))
            .filter(
                role_platforms::platform_id
                    .ne_all(desired_ids.iter().copied().collect::<Vec<_>>()),
            ),
    )
    .execute(conn)?;

    let links: Vec<RolePlatformRow> = desired_ids
        .into_iter()
        .map(|platform_id| RolePlatformRow {
            role_id,
            platform_id,
        })
        .collect();
    diesel::insert_into(role_platforms::table)
        .values(&links)
        .on_conflict_do_nothing()
        .execute(conn)?;
    Ok(())
}

fn write_dependency_links(conn: &mut PgConnection, role: &Role) -> CatalogRepositoryResult<()> {
    let role_id = role.id().into_inner();
    let desired: BTreeSet<(String, String)> = role
        .dependencies()
        .iter()
        .map(|dep| (dep.namespace().as_str().to_owned(), dep.name().as_str().to_owned()))
        .collect();

    let current: Vec<RoleDependencyRow> = role_dependencies::table
        .filter(role_dependencies::role_id.eq(role_id))
        .select(RoleDependencyRow::as_select())
        .load::<RoleDependencyRow>(conn)?;

    for row in &current {
        let key = (row.namespace.clone(), row.name.clone());
        if !desired.contains(&key) {
            diesel::delete(
                role_dependencies::table
                    .filter(role_dependencies::role_id.eq(role_id))
                    .filter(role_dependencies::namespace.eq(&row.namespace))
                    .filter(role_dependencies::name.eq(&row.name)),
            )
            .execute(conn)?;
        }
    }

    let links: Vec<RoleDependencyRow> = desired
        .into_iter()
        .map(|(namespace, name)| RoleDependencyRow {
            role_id,
            namespace,
            name,
        })
        .collect();
    diesel::insert_into(role_dependencies::table)
        .values(&links)
        .on_conflict_do_nothing()
        .execute(conn)?;
    Ok(())
}

fn write_versions(conn: &mut PgConnection, role: &Role) -> CatalogRepositoryResult<()> {
    let role_id = role.id().into_inner();
    for version in role.versions().values() {
        diesel::insert_into(role_versions::table)
            .values(&RoleVersionRow {
                role_id,
                name: version.name().to_owned(),
                release_date: version.release_date(),
            })
            .on_conflict((role_versions::role_id, role_versions::name))
            .do_update()
            .set(role_versions::release_date.eq(version.release_date()))
            .execute(conn)?;
    }
    Ok(())
}

fn load_role(conn: &mut PgConnection, row: RoleRow) -> CatalogRepositoryResult<Role> {
    let role_id = row.id;

    let tag_rows: Vec<TagRow> = role_tags::table
        .inner_join(tags::table)
        .filter(role_tags::role_id.eq(role_id))
        .select(TagRow::as_select())
        .load::<TagRow>(conn)?;
    let mut tag_names = BTreeSet::new();
    for tag_row in tag_rows {
        tag_names.insert(
            TagName::new(tag_row.name).map_err(CatalogRepositoryError::persistence)?,
        );
    }

    let platform_rows: Vec<PlatformRow> = role_platforms::table
        .inner_join(platforms::table)
        .filter(role_platforms::role_id.eq(role_id))
        .select(PlatformRow::as_select())
        .load::<PlatformRow>(conn)?;
    let mut platform_keys = BTreeSet::new();
    for platform_row in platform_rows {
        platform_keys.insert(
            PlatformKey::new(platform_row.name, platform_row.release)
                .map_err(CatalogRepositoryError::persistence)?,
        );
    }

    let dependency_rows: Vec<RoleDependencyRow> = role_dependencies::table
        .filter(role_dependencies::role_id.eq(role_id))
        .select(RoleDependencyRow::as_select())
        .load::<RoleDependencyRow>(conn)?;
    let mut dependencies = BTreeSet::new();
    for dependency_row in dependency_rows {
        let namespace = NamespaceName::new(dependency_row.namespace)
            .map_err(CatalogRepositoryError::persistence)?;
        let name =
            RoleName::new(dependency_row.name).map_err(CatalogRepositoryError::persistence)?;
        dependencies.insert(DependencyRef::from_parts(namespace, name));
    }

    let version_rows: Vec<RoleVersionRow> = role_versions::table
        .filter(role_versions::role_id.eq(role_id))
        .select(RoleVersionRow::as_select())
        .load::<RoleVersionRow>(conn)?;
    let mut versions = BTreeMap::new();
    for version_row in version_rows {
        let version = RoleVersion::new(version_row.name, version_row.release_date)
            .map_err(CatalogRepositoryError::persistence)?;
        versions.insert(version.name().to_owned(), version);
    }

    row_to_role(row, tag_names, platform_keys, dependencies, versions)
}

fn row_to_role(
    row: RoleRow,
    tags_set: BTreeSet<TagName>,
    platforms_set: BTreeSet<PlatformKey>,
    dependencies: BTreeSet<DependencyRef>,
    versions: BTreeMap<String, RoleVersion>,
) -> CatalogRepositoryResult<Role> {
    let namespace =
        NamespaceName::new(row.namespace).map_err(CatalogRepositoryError::persistence)?;
    let name = RoleName::new(row.name).map_err(CatalogRepositoryError::persistence)?;
    let profile = serde_json::from_value::<RoleProfile>(row.profile)
        .map_err(CatalogRepositoryError::persistence)?;
    let kind =
        RoleKind::try_from(row.kind.as_str()).map_err(CatalogRepositoryError::persistence)?;
    let readme = row
        .readme
        .map(serde_json::from_value::<Readme>)
        .transpose()
        .map_err(CatalogRepositoryError::persistence)?;
    let stats = serde_json::from_value::<RepositoryStats>(row.stats)
        .map_err(CatalogRepositoryError::persistence)?;
    let commit = row
        .commit
        .map(serde_json::from_value::<CommitInfo>)
        .transpose()
        .map_err(CatalogRepositoryError::persistence)?;

    Ok(Role::from_persisted(PersistedRoleData {
        id: RoleId::from_uuid(row.id),
        namespace,
        name,
        profile,
        default_branch: row.default_branch,
        kind,
        container_descriptor: row.container_descriptor,
        readme,
        stats,
        commit,
        tags: tags_set,
        platforms: platforms_set,
        dependencies,
        versions,
        is_valid: row.is_valid,
        imported_at: row.imported_at,
    }))
}

fn row_to_tag(row: TagRow) -> CatalogRepositoryResult<Tag> {
    let name = TagName::new(row.name).map_err(CatalogRepositoryError::persistence)?;
    Ok(Tag::from_persisted(row.id, name))
}

fn row_to_platform(row: PlatformRow) -> CatalogRepositoryResult<Platform> {
    let key = PlatformKey::new(row.name, row.release)
        .map_err(CatalogRepositoryError::persistence)?;
    Ok(Platform::from_persisted(row.id, key))
}

fn row_to_namespace(row: NamespaceRow) -> CatalogRepositoryResult<NamespaceProfile> {
    let namespace =
        NamespaceName::new(row.namespace).map_err(CatalogRepositoryError::persistence)?;
    let attributes = serde_json::from_value::<NamespaceAttributes>(row.attributes)
        .map_err(CatalogRepositoryError::persistence)?;
    Ok(NamespaceProfile::new(namespace, attributes))
}
