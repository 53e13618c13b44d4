//! Manifest parsing boundary.
//!
//! Upstream metadata arrives as YAML of unknown shape. The shape of every
//! value is decided once here, as a tagged variant, so downstream
//! normalization never re-checks "is this iterable" ad hoc.

mod normalize;

pub use normalize::{
    DependencyExtraction, MAX_COMPANY_CHARS, MAX_DESCRIPTION_CHARS, MAX_LICENSE_CHARS, MAX_TAGS,
    MIN_ENGINE_VERSION_DEFAULT, Note, PlatformExtraction, PlatformReleases, PlatformSpec,
    ProfileOutcome, RELEASE_ALL, RepoDefaults, TagExtraction, extract_dependencies, extract_tags,
    extract_platforms, normalize_profile,
};

use serde_yaml::{Mapping, Value};
use thiserror::Error;

/// Path of the required role manifest inside the repository.
pub const MANIFEST_PATH: &str = "meta/main.yml";

/// Path of the container descriptor marking a Container role.
pub const CONTAINER_DESCRIPTOR_PATH: &str = "meta/container.yml";

/// Path of the container descriptor marking a Container App role.
pub const CONTAINER_APP_DESCRIPTOR_PATH: &str = "ansible/container.yml";

/// Errors produced while decoding a metadata file.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ManifestError {
    /// The file content is not valid UTF-8.
    #[error("file content is not valid UTF-8")]
    InvalidEncoding,

    /// The file content is not valid YAML.
    #[error("YAML parse error: {0}")]
    Syntax(String),

    /// The document parsed but its root is not a mapping.
    #[error("expected a mapping at the document root")]
    RootNotMapping,
}

/// Shape of a YAML value, decided once at the parse boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueShape<'a> {
    /// Explicit null or empty value.
    Null,
    /// A scalar (string, number, or boolean).
    Scalar(&'a Value),
    /// A sequence of values.
    Sequence(&'a [Value]),
    /// A key/value mapping.
    Mapping(&'a Mapping),
}

/// Classifies a YAML value, looking through `!tag` wrappers.
#[must_use]
pub fn shape(value: &Value) -> ValueShape<'_> {
    match value {
        Value::Null => ValueShape::Null,
        Value::Bool(_) | Value::Number(_) | Value::String(_) => ValueShape::Scalar(value),
        Value::Sequence(items) => ValueShape::Sequence(items),
        Value::Mapping(mapping) => ValueShape::Mapping(mapping),
        Value::Tagged(tagged) => shape(&tagged.value),
    }
}

/// Renders a scalar value as a trimmed string.
///
/// Returns `None` for null, sequence, and mapping values.
#[must_use]
pub fn scalar_string(value: &Value) -> Option<String> {
    match shape(value) {
        ValueShape::Scalar(Value::String(text)) => Some(text.trim().to_owned()),
        ValueShape::Scalar(Value::Bool(flag)) => Some(flag.to_string()),
        ValueShape::Scalar(Value::Number(number)) => Some(number.to_string()),
        _ => None,
    }
}

/// Looks up a string key in a mapping.
#[must_use]
pub fn mapping_get<'a>(mapping: &'a Mapping, key: &str) -> Option<&'a Value> {
    mapping.get(&Value::String(key.to_owned()))
}

/// Decoded role manifest with a mapping at the root.
#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    root: Mapping,
}

impl Manifest {
    /// Decodes manifest bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError`] when the bytes are not UTF-8, not YAML, or
    /// the document root is not a mapping.
    pub fn parse(bytes: &[u8]) -> Result<Self, ManifestError> {
        let text = std::str::from_utf8(bytes).map_err(|_| ManifestError::InvalidEncoding)?;
        let value: Value =
            serde_yaml::from_str(text).map_err(|err| ManifestError::Syntax(err.to_string()))?;
        match value {
            Value::Mapping(root) => Ok(Self { root }),
            _ => Err(ManifestError::RootNotMapping),
        }
    }

    /// Returns the `galaxy_info` block when present and mapping-shaped.
    #[must_use]
    pub fn galaxy_info(&self) -> Option<&Mapping> {
        let value = mapping_get(&self.root, "galaxy_info")?;
        match shape(value) {
            ValueShape::Mapping(mapping) => Some(mapping),
            _ => None,
        }
    }

    /// Returns the raw `dependencies` value when the key is present.
    #[must_use]
    pub fn dependencies(&self) -> Option<&Value> {
        mapping_get(&self.root, "dependencies")
    }
}

/// Decodes an optional YAML document without requiring a mapping root.
///
/// # Errors
///
/// Returns [`ManifestError`] when the bytes are not UTF-8 or not YAML.
pub fn parse_document(bytes: &[u8]) -> Result<Value, ManifestError> {
    let text = std::str::from_utf8(bytes).map_err(|_| ManifestError::InvalidEncoding)?;
    serde_yaml::from_str(text).map_err(|err| ManifestError::Syntax(err.to_string()))
}
