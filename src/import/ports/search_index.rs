//! Port for the search-index collaborator.

use crate::catalog::domain::{NamespaceName, TagName};
use async_trait::async_trait;

/// Payload sent to the search index after a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexUpdate {
    /// Namespace of the imported role.
    pub namespace: NamespaceName,
    /// Current tag set of the role.
    pub tags: Vec<TagName>,
    /// Distinct platform names of the role.
    pub platforms: Vec<String>,
}

/// Fire-and-forget search index notification.
///
/// The pipeline spawns the update and never awaits it; implementations
/// absorb their own failures.
#[async_trait]
pub trait SearchIndex: Send + Sync {
    /// Pushes the role's current tags and platforms to the index.
    async fn update(&self, update: IndexUpdate);
}
