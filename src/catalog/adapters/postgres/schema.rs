//! Diesel schema for catalog persistence.

diesel::table! {
    /// Role records with descriptive metadata and cached upstream state.
    roles (id) {
        /// Internal role identifier.
        id -> Uuid,
        /// Namespace the role is published under.
        #[max_length = 255]
        namespace -> Varchar,
        /// Role name within the namespace.
        #[max_length = 255]
        name -> Varchar,
        /// Normalized descriptive fields payload.
        profile -> Jsonb,
        /// Upstream default branch.
        #[max_length = 255]
        default_branch -> Varchar,
        /// Role kind.
        #[max_length = 50]
        kind -> Varchar,
        /// Verbatim container descriptor, when present.
        container_descriptor -> Nullable<Jsonb>,
        /// Captured README payload, when present.
        readme -> Nullable<Jsonb>,
        /// Cached repository statistics payload.
        stats -> Jsonb,
        /// Latest-commit metadata payload, when present.
        commit -> Nullable<Jsonb>,
        /// Whether the last completed import marked the role valid.
        is_valid -> Bool,
        /// Last-import timestamp.
        imported_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Canonical tags shared across roles.
    tags (id) {
        /// Tag identifier.
        id -> Uuid,
        /// Unique tag name.
        #[max_length = 255]
        name -> Varchar,
    }
}

diesel::table! {
    /// Seeded platform releases.
    platforms (id) {
        /// Platform identifier.
        id -> Uuid,
        /// Platform name.
        #[max_length = 255]
        name -> Varchar,
        /// Platform release.
        #[max_length = 255]
        release -> Varchar,
    }
}

diesel::table! {
    /// Namespace profiles mirrored from the upstream host.
    namespaces (namespace) {
        /// Namespace name.
        #[max_length = 255]
        namespace -> Varchar,
        /// Mirrored upstream attributes payload.
        attributes -> Jsonb,
    }
}

diesel::table! {
    /// Role-to-tag associations.
    role_tags (role_id, tag_id) {
        /// Owning role.
        role_id -> Uuid,
        /// Associated tag.
        tag_id -> Uuid,
    }
}

diesel::table! {
    /// Role-to-platform associations.
    role_platforms (role_id, platform_id) {
        /// Owning role.
        role_id -> Uuid,
        /// Associated platform release.
        platform_id -> Uuid,
    }
}

diesel::table! {
    /// Role dependency references, stored by (namespace, name) key.
    role_dependencies (role_id, namespace, name) {
        /// Owning role.
        role_id -> Uuid,
        /// Dependency namespace.
        #[max_length = 255]
        namespace -> Varchar,
        /// Dependency role name.
        #[max_length = 255]
        name -> Varchar,
    }
}

diesel::table! {
    /// Per-role release history keyed by upstream tag name.
    role_versions (role_id, name) {
        /// Owning role.
        role_id -> Uuid,
        /// Upstream tag name.
        #[max_length = 255]
        name -> Varchar,
        /// Release date from the upstream tag commit.
        release_date -> Timestamptz,
    }
}

diesel::joinable!(role_tags -> roles (role_id));
diesel::joinable!(role_tags -> tags (tag_id));
diesel::joinable!(role_platforms -> roles (role_id));
diesel::joinable!(role_platforms -> platforms (platform_id));

diesel::allow_tables_to_appear_in_same_query!(
    roles,
    tags,
    platforms,
    namespaces,
    role_tags,
    role_platforms,
    role_dependencies,
    role_versions,
);
