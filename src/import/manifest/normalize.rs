//! Pure validation and normalization of raw manifest fields.
//!
//! Every rule is independent: a violation is recorded as a note and the
//! stage continues with a defaulted, clipped, or cleared value. Nothing in
//! this module halts the pipeline.

use super::{Manifest, ValueShape, mapping_get, scalar_string, shape};
use crate::catalog::domain::{DependencyRef, RoleProfile, TagName};
use crate::import::domain::Severity;
use crate::text::{clip_chars, exceeds_chars};
use serde_yaml::{Mapping, Value};

/// Maximum characters stored for a role description.
pub const MAX_DESCRIPTION_CHARS: usize = 255;

/// Maximum characters stored for a company.
pub const MAX_COMPANY_CHARS: usize = 50;

/// Maximum characters stored for a license.
pub const MAX_LICENSE_CHARS: usize = 50;

/// Substituted when the manifest does not name a minimum engine version.
pub const MIN_ENGINE_VERSION_DEFAULT: &str = "1.9";

/// Maximum number of tags kept per role.
pub const MAX_TAGS: usize = 20;

/// Release sentinel expanding to every seeded release of a platform.
pub const RELEASE_ALL: &str = "all";

/// One diagnostic note produced by a pure normalization rule.
///
/// Notes carry the severity and text of the eventual log entry; writing
/// them to the diagnostic log is the caller's concern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    /// Severity of the eventual log entry.
    pub severity: Severity,
    /// Text of the eventual log entry.
    pub text: String,
}

impl Note {
    /// Creates a WARNING note.
    #[must_use]
    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            text: text.into(),
        }
    }

    /// Creates an ERROR note.
    #[must_use]
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            text: text.into(),
        }
    }
}

/// Upstream repository values substituted when manifest fields are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepoDefaults {
    /// Repository description, used when the manifest omits one.
    pub description: Option<String>,
    /// Repository issues URL, used when the manifest omits a tracker and
    /// the upstream repository has its issue tracker enabled.
    pub issues_url: Option<String>,
}

/// Result of normalizing the descriptive manifest fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileOutcome {
    /// Normalized field values.
    pub profile: RoleProfile,
    /// Rule violations encountered along the way.
    pub notes: Vec<Note>,
}

/// Normalizes the descriptive fields of the `galaxy_info` block.
///
/// Each field is independently defaulted and length-capped per the rules
/// table; violations become notes and never halt normalization.
#[must_use]
pub fn normalize_profile(info: Option<&Mapping>, defaults: &RepoDefaults) -> ProfileOutcome {
    let mut notes = Vec::new();

    let field = |key: &str| info.and_then(|mapping| mapping_get(mapping, key));
    let scalar_field =
        |key: &str| field(key).map(|value| scalar_string(value).unwrap_or_default());

    let mut description = scalar_field("description").unwrap_or_else(|| {
        defaults
            .description
            .as_deref()
            .map(|text| text.trim().to_owned())
            .unwrap_or_default()
    });
    let author = scalar_field("author").unwrap_or_default();
    let mut company = scalar_field("company").unwrap_or_default();
    let mut license = scalar_field("license").unwrap_or_default();
    let mut min_engine_version = scalar_field("min_engine_version").unwrap_or_default();
    let mut issue_tracker_url = scalar_field("issue_tracker_url").unwrap_or_default();
    let source_branch = scalar_field("branch").unwrap_or_default();

    if exceeds_chars(&company, MAX_COMPANY_CHARS) {
        notes.push(Note::warning(format!(
            "galaxy_info.company exceeds max length of {MAX_COMPANY_CHARS} in meta/main.yml"
        )));
        company = clip_chars(&company, MAX_COMPANY_CHARS);
    }

    if description.is_empty() {
        notes.push(Note::error(
            "missing description. Add a description to the repository or meta/main.yml.",
        ));
    } else if exceeds_chars(&description, MAX_DESCRIPTION_CHARS) {
        notes.push(Note::warning(format!(
            "galaxy_info.description exceeds max length of {MAX_DESCRIPTION_CHARS} in meta/main.yml"
        )));
        description = clip_chars(&description, MAX_DESCRIPTION_CHARS);
    }

    if license.is_empty() {
        notes.push(Note::error(
            "galaxy_info.license missing value in meta/main.yml",
        ));
    } else if exceeds_chars(&license, MAX_LICENSE_CHARS) {
        notes.push(Note::warning(format!(
            "galaxy_info.license exceeds max length of {MAX_LICENSE_CHARS} in meta/main.yml"
        )));
        license = clip_chars(&license, MAX_LICENSE_CHARS);
    }

    if min_engine_version.is_empty() {
        notes.push(Note::warning(format!(
            "galaxy_info.min_engine_version missing value in meta/main.yml. \
             Defaulting to {MIN_ENGINE_VERSION_DEFAULT}."
        )));
        min_engine_version = MIN_ENGINE_VERSION_DEFAULT.to_owned();
    }

    if issue_tracker_url.is_empty() {
        if let Some(issues_url) = &defaults.issues_url {
            issue_tracker_url = issues_url.clone();
        }
    }
    if issue_tracker_url.is_empty() {
        notes.push(Note::warning(
            "No issue tracker defined. Enable the issue tracker in repository settings or \
             define galaxy_info.issue_tracker_url in meta/main.yml.",
        ));
    } else if !is_well_formed_url(&issue_tracker_url) {
        notes.push(Note::warning(
            "Invalid URL provided for galaxy_info.issue_tracker_url in meta/main.yml",
        ));
        issue_tracker_url = String::new();
    }

    ProfileOutcome {
        profile: RoleProfile {
            description,
            author,
            company,
            license,
            min_engine_version,
            issue_tracker_url,
            source_branch,
        },
        notes,
    }
}

/// Requires a scheme, a host, and a path component.
fn is_well_formed_url(value: &str) -> bool {
    let Some((scheme, rest)) = value.split_once("://") else {
        return false;
    };
    let scheme_ok = !scheme.is_empty()
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    let Some((host, _path)) = rest.split_once('/') else {
        return false;
    };
    scheme_ok && !host.is_empty()
}

/// Result of extracting tag tokens from the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagExtraction {
    /// Validated, deduplicated, capped tag names in encounter order.
    pub tags: Vec<TagName>,
    /// Rule violations encountered along the way.
    pub notes: Vec<Note>,
}

/// Extracts tags from the legacy `categories` and current `galaxy_tags`
/// keys.
///
/// Tokens are colon-split and individually validated; invalid tokens are
/// dropped with a warning. The result is deduplicated in encounter order,
/// must be non-empty, and is capped at [`MAX_TAGS`].
#[must_use]
pub fn extract_tags(info: Option<&Mapping>) -> TagExtraction {
    let mut notes = Vec::new();
    let mut tokens: Vec<TagName> = Vec::new();

    if let Some(value) = info.and_then(|mapping| mapping_get(mapping, "categories")) {
        if !is_absent_collection(value) {
            notes.push(Note::warning(
                "Found galaxy_info.categories. Update meta/main.yml to use \
                 galaxy_info.galaxy_tags.",
            ));
            collect_tag_tokens(value, "galaxy_info.categories", &mut tokens, &mut notes);
        }
    }

    if let Some(value) = info.and_then(|mapping| mapping_get(mapping, "galaxy_tags")) {
        if !is_absent_collection(value) {
            collect_tag_tokens(value, "galaxy_info.galaxy_tags", &mut tokens, &mut notes);
        }
    }

    let mut tags: Vec<TagName> = Vec::new();
    for token in tokens {
        if !tags.contains(&token) {
            tags.push(token);
        }
    }

    if tags.is_empty() {
        notes.push(Note::error(
            "No values found for galaxy_tags. galaxy_info.galaxy_tags must be an iterable \
             list in meta/main.yml",
        ));
    } else if tags.len() > MAX_TAGS {
        notes.push(Note::warning(format!(
            "Found more than {MAX_TAGS} values for galaxy_info.galaxy_tags in meta/main.yml. \
             Only the first {MAX_TAGS} will be used."
        )));
        tags.truncate(MAX_TAGS);
    }

    TagExtraction { tags, notes }
}

fn collect_tag_tokens(
    value: &Value,
    key: &str,
    tokens: &mut Vec<TagName>,
    notes: &mut Vec<Note>,
) {
    let ValueShape::Sequence(items) = shape(value) else {
        notes.push(Note::error(format!(
            "{key} must be an iterable list in meta/main.yml"
        )));
        return;
    };
    for item in items {
        let Some(text) = scalar_string(item) else {
            notes.push(Note::warning(format!(
                "'{}' is not a valid tag. Skipping.",
                render_value(item)
            )));
            continue;
        };
        for token in text.split(':') {
            match TagName::new(token) {
                Ok(tag) => tokens.push(tag),
                Err(_) => notes.push(Note::warning(format!(
                    "'{token}' is not a valid tag. Skipping."
                ))),
            }
        }
    }
}

/// Empty and null collections are treated as absent, not as shape errors.
fn is_absent_collection(value: &Value) -> bool {
    match shape(value) {
        ValueShape::Null => true,
        ValueShape::Sequence(items) => items.is_empty(),
        ValueShape::Scalar(_) | ValueShape::Mapping(_) => false,
    }
}

/// Requested releases for one platform entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformReleases {
    /// The `all` sentinel: every seeded release for the platform name.
    All,
    /// An explicit release list.
    Pinned(Vec<String>),
}

/// One validated platform entry from the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformSpec {
    /// Platform name.
    pub name: String,
    /// Requested releases.
    pub releases: PlatformReleases,
}

/// Result of extracting the `platforms` list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformExtraction {
    /// The key was missing or not a sequence; reconciliation must be
    /// skipped so existing associations survive.
    Skipped(Vec<Note>),
    /// Per-entry parse results.
    Parsed {
        /// Entries that passed per-entry validation.
        specs: Vec<PlatformSpec>,
        /// Rule violations encountered along the way.
        notes: Vec<Note>,
    },
}

/// Extracts platform entries from `galaxy_info.platforms`.
///
/// Per-entry violations skip only that entry; a missing or non-sequence
/// key skips the whole stage.
#[must_use]
pub fn extract_platforms(info: Option<&Mapping>) -> PlatformExtraction {
    let Some(value) = info.and_then(|mapping| mapping_get(mapping, "platforms")) else {
        return PlatformExtraction::Skipped(vec![Note::error(
            "galaxy_info.platforms not defined in meta/main.yml. Must be an iterable list.",
        )]);
    };
    let items = match shape(value) {
        ValueShape::Sequence(items) => items,
        ValueShape::Null => {
            return PlatformExtraction::Skipped(vec![Note::error(
                "galaxy_info.platforms not defined in meta/main.yml. Must be an iterable list.",
            )]);
        }
        ValueShape::Scalar(_) | ValueShape::Mapping(_) => {
            return PlatformExtraction::Skipped(vec![Note::error(
                "Failed to iterate platforms. galaxy_info.platforms must be an iterable list \
                 in meta/main.yml.",
            )]);
        }
    };

    let mut specs = Vec::new();
    let mut notes = Vec::new();
    for item in items {
        let ValueShape::Mapping(entry) = shape(item) else {
            notes.push(Note::error(format!(
                "The platform '{}' does not appear to be a dictionary, skipping",
                render_value(item)
            )));
            continue;
        };
        let name = mapping_get(entry, "name")
            .and_then(scalar_string)
            .unwrap_or_default();
        if name.is_empty() {
            notes.push(Note::error("No name specified for platform, skipping"));
            continue;
        }

        let releases = match mapping_get(entry, "versions") {
            None => PlatformReleases::All,
            Some(versions) => match shape(versions) {
                ValueShape::Sequence(entries) => {
                    collect_releases(&name, entries, &mut notes)
                }
                _ => {
                    notes.push(Note::error(format!(
                        "Expected a list of versions for platform {name}, skipping"
                    )));
                    continue;
                }
            },
        };
        specs.push(PlatformSpec { name, releases });
    }

    PlatformExtraction::Parsed { specs, notes }
}

fn collect_releases(name: &str, entries: &[Value], notes: &mut Vec<Note>) -> PlatformReleases {
    let mut releases = Vec::new();
    let mut expand_all = false;
    for entry in entries {
        match scalar_string(entry) {
            Some(release) if release == RELEASE_ALL => expand_all = true,
            Some(release) => releases.push(release),
            None => notes.push(Note::error(format!(
                "Invalid platform: {name}-{} (skipping)",
                render_value(entry)
            ))),
        }
    }
    if expand_all {
        // The sentinel wins even when named alongside explicit releases.
        PlatformReleases::All
    } else {
        PlatformReleases::Pinned(releases)
    }
}

/// Result of extracting the `dependencies` list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencyExtraction {
    /// The key was missing or not a sequence; reconciliation must be
    /// skipped so existing associations survive.
    Skipped(Vec<Note>),
    /// Per-entry parse results.
    Parsed {
        /// References that passed per-entry validation.
        refs: Vec<DependencyRef>,
        /// Rule violations encountered along the way.
        notes: Vec<Note>,
    },
}

/// Extracts dependency references from the manifest root.
///
/// Entries are either a mapping with a `role` key or a bare dotted string.
/// Per-entry violations skip only that entry; a missing or non-sequence key
/// skips the whole stage.
#[must_use]
pub fn extract_dependencies(manifest: &Manifest) -> DependencyExtraction {
    let missing_note = || {
        Note::error(
            "meta/main.yml missing definition for dependencies. Define dependencies as [] \
             or an iterable list.",
        )
    };
    let Some(value) = manifest.dependencies() else {
        return DependencyExtraction::Skipped(vec![missing_note()]);
    };
    let items = match shape(value) {
        ValueShape::Sequence(items) => items,
        ValueShape::Null => return DependencyExtraction::Skipped(vec![missing_note()]),
        ValueShape::Scalar(_) | ValueShape::Mapping(_) => {
            return DependencyExtraction::Skipped(vec![Note::error(
                "Failed to iterate dependencies. Define dependencies in meta/main.yml as [] \
                 or an iterable list.",
            )]);
        }
    };

    let mut refs = Vec::new();
    let mut notes = Vec::new();
    for item in items {
        let raw_spec = match shape(item) {
            ValueShape::Mapping(entry) => mapping_get(entry, "role").and_then(scalar_string),
            ValueShape::Scalar(_) => scalar_string(item),
            ValueShape::Null | ValueShape::Sequence(_) => None,
        };
        let Some(spec) = raw_spec else {
            notes.push(Note::error(format!(
                "Invalid role dependency: {} (skipping)",
                render_value(item)
            )));
            continue;
        };
        match DependencyRef::parse(&spec) {
            Ok(dependency) => refs.push(dependency),
            Err(_) => notes.push(Note::error(format!(
                "Invalid role dependency: {spec} (skipping)"
            ))),
        }
    }

    DependencyExtraction::Parsed { refs, notes }
}

/// Renders a YAML value compactly for inclusion in a diagnostic.
fn render_value(value: &Value) -> String {
    scalar_string(value).unwrap_or_else(|| {
        serde_yaml::to_string(value)
            .map(|text| text.trim().to_owned())
            .unwrap_or_default()
    })
}
