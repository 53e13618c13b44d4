//! Unit tests for the in-memory catalog adapter.

use crate::catalog::{
    adapters::memory::InMemoryCatalog,
    domain::{
        NamespaceAttributes, NamespaceName, NamespaceProfile, Platform, PlatformKey, Role,
        RoleName, TagName,
    },
    ports::{CatalogRepository, CatalogRepositoryError},
};
use rstest::{fixture, rstest};

#[fixture]
fn catalog() -> InMemoryCatalog {
    InMemoryCatalog::new()
}

fn sample_role(namespace: &str, name: &str) -> Role {
    Role::new(
        NamespaceName::new(namespace).expect("valid namespace"),
        RoleName::new(name).expect("valid role name"),
    )
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn store_role_rejects_duplicate_name_pair(catalog: InMemoryCatalog) {
    catalog
        .store_role(&sample_role("alice", "nginx"))
        .await
        .expect("first store succeeds");

    let result = catalog.store_role(&sample_role("alice", "nginx")).await;
    assert!(matches!(
        result,
        Err(CatalogRepositoryError::DuplicateRole { .. })
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_role_moves_name_index_on_rename(catalog: InMemoryCatalog) {
    let mut role = sample_role("alice", "nginx");
    catalog.store_role(&role).await.expect("store succeeds");

    role.rename(RoleName::new("nginx2").expect("valid role name"));
    catalog.update_role(&role).await.expect("update succeeds");

    let namespace = NamespaceName::new("alice").expect("valid namespace");
    let old_name = RoleName::new("nginx").expect("valid role name");
    let new_name = RoleName::new("nginx2").expect("valid role name");
    assert!(
        catalog
            .role_by_name(&namespace, &old_name)
            .await
            .expect("lookup succeeds")
            .is_none()
    );
    assert!(
        catalog
            .role_by_name(&namespace, &new_name)
            .await
            .expect("lookup succeeds")
            .is_some()
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn find_or_create_tag_returns_same_entity(catalog: InMemoryCatalog) {
    let name = TagName::new("web").expect("valid tag");
    let first = catalog
        .find_or_create_tag(&name)
        .await
        .expect("find-or-create succeeds");
    let second = catalog
        .find_or_create_tag(&name)
        .await
        .expect("find-or-create succeeds");
    assert_eq!(first.id(), second.id());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn platforms_named_returns_every_seeded_release(catalog: InMemoryCatalog) {
    for release in ["trusty", "xenial", "bionic"] {
        let key = PlatformKey::new("Ubuntu", release).expect("valid key");
        catalog
            .store_platform(&Platform::new(key))
            .await
            .expect("seed succeeds");
    }
    let other = PlatformKey::new("Debian", "stretch").expect("valid key");
    catalog
        .store_platform(&Platform::new(other))
        .await
        .expect("seed succeeds");

    let ubuntu = catalog
        .platforms_named("Ubuntu")
        .await
        .expect("lookup succeeds");
    assert_eq!(ubuntu.len(), 3);
    assert!(ubuntu.iter().all(|p| p.key().name() == "Ubuntu"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn upsert_namespace_refreshes_attributes(catalog: InMemoryCatalog) {
    let namespace = NamespaceName::new("alice").expect("valid namespace");
    let initial = NamespaceProfile::new(
        namespace.clone(),
        NamespaceAttributes {
            company: Some("Initech".to_owned()),
            ..NamespaceAttributes::default()
        },
    );
    catalog
        .upsert_namespace(&initial)
        .await
        .expect("upsert succeeds");

    let refreshed = NamespaceProfile::new(
        namespace.clone(),
        NamespaceAttributes {
            company: Some("Globex".to_owned()),
            followers: Some(42),
            ..NamespaceAttributes::default()
        },
    );
    catalog
        .upsert_namespace(&refreshed)
        .await
        .expect("upsert succeeds");

    let stored = catalog
        .namespace(&namespace)
        .await
        .expect("lookup succeeds")
        .expect("namespace present");
    assert_eq!(stored.attributes().company.as_deref(), Some("Globex"));
    assert_eq!(stored.attributes().followers, Some(42));
}
