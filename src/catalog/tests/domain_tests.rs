//! Unit tests for catalog domain types.

use crate::catalog::domain::{
    CatalogDomainError, DependencyRef, NamespaceName, PlatformKey, ReadmeKind, Role, RoleKind,
    RoleName, RoleVersion, TagName,
};
use chrono::{TimeZone, Utc};
use rstest::rstest;

#[rstest]
#[case("nginx", true)]
#[case("Nginx2", true)]
#[case("web:server", true)]
#[case("", false)]
#[case("web server", false)]
#[case("web:", false)]
#[case(":server", false)]
#[case("a:b:c", false)]
#[case("däta", false)]
fn tag_name_validates_allowed_characters(#[case] value: &str, #[case] expected: bool) {
    assert_eq!(TagName::new(value).is_ok(), expected);
}

#[rstest]
#[case("alice.nginx", "alice", "nginx")]
#[case("a.b.c", "a.b", "c")]
#[case("my.dotted.org.role", "my.dotted.org", "role")]
fn dependency_ref_splits_on_last_dot(
    #[case] spec: &str,
    #[case] namespace: &str,
    #[case] name: &str,
) {
    let parsed = DependencyRef::parse(spec).expect("valid dependency reference");
    assert_eq!(parsed.namespace().as_str(), namespace);
    assert_eq!(parsed.name().as_str(), name);
}

#[rstest]
#[case("nodots")]
#[case("")]
#[case("trailing.")]
#[case(".leading")]
#[case("with space.role")]
fn dependency_ref_rejects_malformed_specs(#[case] spec: &str) {
    assert!(matches!(
        DependencyRef::parse(spec),
        Err(CatalogDomainError::InvalidDependencyRef(_))
    ));
}

#[rstest]
#[case(RoleKind::Plain, "plain")]
#[case(RoleKind::Container, "container")]
#[case(RoleKind::ContainerApp, "container_app")]
fn role_kind_round_trips_through_storage_form(#[case] kind: RoleKind, #[case] repr: &str) {
    assert_eq!(kind.as_str(), repr);
    assert_eq!(RoleKind::try_from(repr).expect("parse succeeds"), kind);
}

#[test]
fn role_kind_rejects_unknown_storage_form() {
    assert!(RoleKind::try_from("virtual_machine").is_err());
}

#[rstest]
#[case("README.md", Some(ReadmeKind::Markdown))]
#[case("README.rst", Some(ReadmeKind::Rst))]
#[case("README.txt", None)]
#[case("README", None)]
fn readme_kind_detects_exactly_two_suffixes(
    #[case] file_name: &str,
    #[case] expected: Option<ReadmeKind>,
) {
    assert_eq!(ReadmeKind::from_file_name(file_name), expected);
}

#[test]
fn platform_key_renders_name_dash_release() {
    let key = PlatformKey::new("Ubuntu", "trusty").expect("valid key");
    assert_eq!(key.to_string(), "Ubuntu-trusty");
}

#[test]
fn record_version_updates_release_date_for_known_tag() {
    let namespace = NamespaceName::new("alice").expect("valid namespace");
    let name = RoleName::new("nginx").expect("valid name");
    let mut role = Role::new(namespace, name);

    let first = Utc.with_ymd_and_hms(2016, 1, 1, 0, 0, 0).single().expect("valid date");
    let second = Utc.with_ymd_and_hms(2016, 2, 1, 0, 0, 0).single().expect("valid date");
    role.record_version(RoleVersion::new("v1.0.0", first).expect("valid version"));
    role.record_version(RoleVersion::new("v1.0.0", second).expect("valid version"));

    assert_eq!(role.versions().len(), 1);
    let stored = role.versions().get("v1.0.0").expect("version recorded");
    assert_eq!(stored.release_date(), second);
}

#[test]
fn tag_associations_are_set_valued() {
    let namespace = NamespaceName::new("alice").expect("valid namespace");
    let name = RoleName::new("nginx").expect("valid name");
    let mut role = Role::new(namespace, name);

    let tag = TagName::new("web").expect("valid tag");
    role.add_tag(tag.clone());
    role.add_tag(tag.clone());
    assert_eq!(role.tags().len(), 1);

    role.remove_tag(&tag);
    role.remove_tag(&tag);
    assert!(role.tags().is_empty());
}
