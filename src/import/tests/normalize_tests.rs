//! Unit tests for manifest validation and normalization rules.

use crate::import::domain::Severity;
use crate::import::manifest::{
    DependencyExtraction, MAX_DESCRIPTION_CHARS, MAX_LICENSE_CHARS, MAX_TAGS,
    MIN_ENGINE_VERSION_DEFAULT, Manifest, Note, PlatformExtraction, PlatformReleases,
    RepoDefaults, extract_dependencies, extract_platforms, extract_tags, normalize_profile,
};
use rstest::rstest;
use serde_yaml::Mapping;

fn info_block(yaml: &str) -> Mapping {
    serde_yaml::from_str(yaml).expect("fixture YAML parses")
}

fn defaults() -> RepoDefaults {
    RepoDefaults {
        description: Some("Repo description".to_owned()),
        issues_url: Some("https://example.com/alice/nginx/issues".to_owned()),
    }
}

fn errors(notes: &[Note]) -> Vec<&str> {
    notes
        .iter()
        .filter(|note| note.severity == Severity::Error)
        .map(|note| note.text.as_str())
        .collect()
}

fn warnings(notes: &[Note]) -> Vec<&str> {
    notes
        .iter()
        .filter(|note| note.severity == Severity::Warning)
        .map(|note| note.text.as_str())
        .collect()
}

#[test]
fn description_longer_than_cap_is_truncated_with_one_warning() {
    let long = "d".repeat(MAX_DESCRIPTION_CHARS + 1);
    let block = info_block(&format!(
        "description: {long}\nlicense: MIT\nmin_engine_version: '2.0'\n"
    ));
    let outcome = normalize_profile(Some(&block), &defaults());

    assert_eq!(
        outcome.profile.description.chars().count(),
        MAX_DESCRIPTION_CHARS
    );
    let all_warnings = warnings(&outcome.notes);
    let truncation_warnings: Vec<&&str> = all_warnings
        .iter()
        .filter(|text| text.contains("description"))
        .collect::<Vec<_>>();
    assert_eq!(truncation_warnings.len(), 1);
}

#[test]
fn explicitly_empty_description_is_one_error_without_truncation_warning() {
    let block = info_block("description: ''\nlicense: MIT\nmin_engine_version: '2.0'\n");
    let outcome = normalize_profile(Some(&block), &defaults());

    assert_eq!(outcome.profile.description, "");
    let description_notes: Vec<&Note> = outcome
        .notes
        .iter()
        .filter(|note| note.text.contains("description"))
        .collect();
    assert_eq!(description_notes.len(), 1);
    assert_eq!(description_notes.first().map(|n| n.severity), Some(Severity::Error));
}

#[test]
fn absent_description_falls_back_to_repository_description() {
    let block = info_block("license: MIT\nmin_engine_version: '2.0'\n");
    let outcome = normalize_profile(Some(&block), &defaults());
    assert_eq!(outcome.profile.description, "Repo description");
    assert!(errors(&outcome.notes).is_empty());
}

#[test]
fn empty_license_is_one_error_with_empty_stored_value() {
    let block = info_block("description: fine\nmin_engine_version: '2.0'\n");
    let outcome = normalize_profile(Some(&block), &defaults());

    assert_eq!(outcome.profile.license, "");
    let license_errors: Vec<&str> = errors(&outcome.notes)
        .into_iter()
        .filter(|text| text.contains("license"))
        .collect();
    assert_eq!(license_errors.len(), 1);
}

#[test]
fn license_of_sixty_chars_is_clipped_to_fifty_with_one_warning() {
    let long = "L".repeat(60);
    let block = info_block(&format!(
        "description: fine\nlicense: {long}\nmin_engine_version: '2.0'\n"
    ));
    let outcome = normalize_profile(Some(&block), &defaults());

    assert_eq!(outcome.profile.license.chars().count(), MAX_LICENSE_CHARS);
    let license_warnings: Vec<&str> = warnings(&outcome.notes)
        .into_iter()
        .filter(|text| text.contains("license"))
        .collect();
    assert_eq!(license_warnings.len(), 1);
}

#[test]
fn company_is_clipped_to_fifty_with_one_warning() {
    let long = "C".repeat(51);
    let block = info_block(&format!(
        "description: fine\nlicense: MIT\ncompany: {long}\nmin_engine_version: '2.0'\n"
    ));
    let outcome = normalize_profile(Some(&block), &defaults());
    assert_eq!(outcome.profile.company.chars().count(), 50);
    assert_eq!(
        warnings(&outcome.notes)
            .iter()
            .filter(|text| text.contains("company"))
            .count(),
        1
    );
}

#[test]
fn missing_min_engine_version_defaults_with_a_warning() {
    let block = info_block("description: fine\nlicense: MIT\n");
    let outcome = normalize_profile(Some(&block), &defaults());
    assert_eq!(outcome.profile.min_engine_version, MIN_ENGINE_VERSION_DEFAULT);
    assert_eq!(
        warnings(&outcome.notes)
            .iter()
            .filter(|text| text.contains("min_engine_version"))
            .count(),
        1
    );
}

#[test]
fn issue_tracker_defaults_to_repository_issues_url() {
    let block = info_block("description: fine\nlicense: MIT\nmin_engine_version: '2.0'\n");
    let outcome = normalize_profile(Some(&block), &defaults());
    assert_eq!(
        outcome.profile.issue_tracker_url,
        "https://example.com/alice/nginx/issues"
    );
}

#[test]
fn malformed_issue_tracker_url_is_cleared_with_a_warning() {
    let block = info_block(
        "description: fine\nlicense: MIT\nmin_engine_version: '2.0'\n\
         issue_tracker_url: not-a-url\n",
    );
    let outcome = normalize_profile(Some(&block), &defaults());
    assert_eq!(outcome.profile.issue_tracker_url, "");
    assert_eq!(
        warnings(&outcome.notes)
            .iter()
            .filter(|text| text.contains("Invalid URL"))
            .count(),
        1
    );
}

#[rstest]
#[case("https://example.com/issues", true)]
#[case("http://example.com/", true)]
#[case("https://example.com", false)]
#[case("example.com/issues", false)]
#[case("://example.com/issues", false)]
fn issue_tracker_url_requires_scheme_host_and_path(#[case] url: &str, #[case] kept: bool) {
    let block = info_block(&format!(
        "description: fine\nlicense: MIT\nmin_engine_version: '2.0'\nissue_tracker_url: '{url}'\n"
    ));
    let outcome = normalize_profile(Some(&block), &defaults());
    if kept {
        assert_eq!(outcome.profile.issue_tracker_url, url);
    } else {
        assert_eq!(outcome.profile.issue_tracker_url, "");
    }
}

#[test]
fn no_issue_tracker_anywhere_is_a_warning() {
    let block = info_block("description: fine\nlicense: MIT\nmin_engine_version: '2.0'\n");
    let bare = RepoDefaults {
        description: None,
        issues_url: None,
    };
    let outcome = normalize_profile(Some(&block), &bare);
    assert_eq!(outcome.profile.issue_tracker_url, "");
    assert_eq!(
        warnings(&outcome.notes)
            .iter()
            .filter(|text| text.contains("issue tracker"))
            .count(),
        1
    );
}

#[test]
fn galaxy_tags_are_colon_split_and_deduplicated_in_order() {
    let block = info_block("galaxy_tags:\n  - web:server\n  - database\n  - web\n");
    let extraction = extract_tags(Some(&block));
    let names: Vec<&str> = extraction.tags.iter().map(AsRef::as_ref).collect();
    assert_eq!(names, vec!["web", "server", "database"]);
    assert!(errors(&extraction.notes).is_empty());
}

#[test]
fn categories_key_carries_a_deprecation_warning() {
    let block = info_block("categories:\n  - monitoring\n");
    let extraction = extract_tags(Some(&block));
    let names: Vec<&str> = extraction.tags.iter().map(AsRef::as_ref).collect();
    assert_eq!(names, vec!["monitoring"]);
    assert_eq!(
        warnings(&extraction.notes)
            .iter()
            .filter(|text| text.contains("galaxy_info.categories"))
            .count(),
        1
    );
}

#[test]
fn invalid_tag_tokens_are_dropped_with_warnings() {
    let block = info_block("galaxy_tags:\n  - 'web server'\n  - good\n  - 'bäd'\n");
    let extraction = extract_tags(Some(&block));
    let names: Vec<&str> = extraction.tags.iter().map(AsRef::as_ref).collect();
    assert_eq!(names, vec!["good"]);
    assert_eq!(warnings(&extraction.notes).len(), 2);
}

#[test]
fn scalar_galaxy_tags_value_is_an_error() {
    let block = info_block("galaxy_tags: web\n");
    let extraction = extract_tags(Some(&block));
    assert!(extraction.tags.is_empty());
    // The shape error plus the resulting "no tags" error.
    assert_eq!(errors(&extraction.notes).len(), 2);
}

#[test]
fn zero_valid_tags_is_an_error() {
    let extraction = extract_tags(None);
    assert!(extraction.tags.is_empty());
    assert_eq!(errors(&extraction.notes).len(), 1);
}

#[test]
fn more_than_twenty_tags_keeps_the_first_twenty_in_encounter_order() {
    let listed: Vec<String> = (0..25).map(|i| format!("  - tag{i}")).collect();
    let block = info_block(&format!("galaxy_tags:\n{}\n", listed.join("\n")));
    let extraction = extract_tags(Some(&block));

    assert_eq!(extraction.tags.len(), MAX_TAGS);
    let names: Vec<&str> = extraction.tags.iter().map(AsRef::as_ref).collect();
    let expected: Vec<String> = (0..MAX_TAGS).map(|i| format!("tag{i}")).collect();
    assert_eq!(names, expected.iter().map(String::as_str).collect::<Vec<_>>());
    assert_eq!(warnings(&extraction.notes).len(), 1);
}

#[test]
fn missing_platforms_key_skips_the_stage_with_an_error() {
    let block = info_block("description: fine\n");
    let extraction = extract_platforms(Some(&block));
    let PlatformExtraction::Skipped(notes) = extraction else {
        panic!("expected the stage to be skipped");
    };
    assert_eq!(errors(&notes).len(), 1);
}

#[test]
fn scalar_platforms_value_skips_the_stage_with_an_error() {
    let block = info_block("platforms: Ubuntu\n");
    let extraction = extract_platforms(Some(&block));
    assert!(matches!(extraction, PlatformExtraction::Skipped(_)));
}

#[test]
fn platform_entries_are_validated_individually() {
    let block = info_block(
        "platforms:\n\
         \x20 - Ubuntu\n\
         \x20 - versions: ['1.0']\n\
         \x20 - name: Debian\n\
         \x20   versions: wheezy\n\
         \x20 - name: EL\n\
         \x20   versions: ['6', '7']\n",
    );
    let PlatformExtraction::Parsed { specs, notes } = extract_platforms(Some(&block)) else {
        panic!("expected parsed platform entries");
    };

    // Three invalid entries each produce one error and are skipped.
    assert_eq!(errors(&notes).len(), 3);
    assert_eq!(specs.len(), 1);
    let spec = specs.first().expect("one spec survives");
    assert_eq!(spec.name, "EL");
    assert_eq!(
        spec.releases,
        PlatformReleases::Pinned(vec!["6".to_owned(), "7".to_owned()])
    );
}

#[test]
fn omitted_versions_default_to_the_all_sentinel() {
    let block = info_block("platforms:\n  - name: Ubuntu\n");
    let PlatformExtraction::Parsed { specs, notes } = extract_platforms(Some(&block)) else {
        panic!("expected parsed platform entries");
    };
    assert!(notes.is_empty());
    assert_eq!(
        specs.first().map(|spec| &spec.releases),
        Some(&PlatformReleases::All)
    );
}

#[test]
fn all_sentinel_wins_even_among_explicit_releases() {
    let block = info_block("platforms:\n  - name: Ubuntu\n    versions: ['trusty', 'all']\n");
    let PlatformExtraction::Parsed { specs, .. } = extract_platforms(Some(&block)) else {
        panic!("expected parsed platform entries");
    };
    assert_eq!(
        specs.first().map(|spec| &spec.releases),
        Some(&PlatformReleases::All)
    );
}

#[test]
fn missing_dependencies_key_skips_the_stage_with_an_error() {
    let manifest = Manifest::parse(b"galaxy_info:\n  description: fine\n").expect("parses");
    let extraction = extract_dependencies(&manifest);
    let DependencyExtraction::Skipped(notes) = extraction else {
        panic!("expected the stage to be skipped");
    };
    assert_eq!(errors(&notes).len(), 1);
}

#[test]
fn empty_dependencies_list_parses_to_no_references() {
    let manifest = Manifest::parse(b"dependencies: []\n").expect("parses");
    let DependencyExtraction::Parsed { refs, notes } = extract_dependencies(&manifest) else {
        panic!("expected parsed dependencies");
    };
    assert!(refs.is_empty());
    assert!(notes.is_empty());
}

#[test]
fn dependency_entries_accept_strings_and_role_mappings() {
    let manifest = Manifest::parse(
        b"dependencies:\n  - alice.nginx\n  - role: a.b.c\n  - nodots\n  - role2: missing\n",
    )
    .expect("parses");
    let DependencyExtraction::Parsed { refs, notes } = extract_dependencies(&manifest) else {
        panic!("expected parsed dependencies");
    };

    let rendered: Vec<String> = refs.iter().map(ToString::to_string).collect();
    assert_eq!(rendered, vec!["alice.nginx", "a.b.c"]);
    let first = refs.first().expect("first dependency");
    assert_eq!(first.namespace().as_str(), "alice");
    assert_eq!(first.name().as_str(), "nginx");
    let second = refs.get(1).expect("second dependency");
    assert_eq!(second.namespace().as_str(), "a.b");
    assert_eq!(second.name().as_str(), "c");
    assert_eq!(errors(&notes).len(), 2);
}

#[test]
fn scalar_dependencies_value_skips_the_stage_with_an_error() {
    let manifest = Manifest::parse(b"dependencies: alice.nginx\n").expect("parses");
    assert!(matches!(
        extract_dependencies(&manifest),
        DependencyExtraction::Skipped(_)
    ));
}
