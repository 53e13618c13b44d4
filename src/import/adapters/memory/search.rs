//! Recording search index double.

use async_trait::async_trait;
use std::sync::{Arc, Mutex, PoisonError};

use crate::import::ports::{IndexUpdate, SearchIndex};

/// Search index double that records every update it receives.
#[derive(Debug, Clone, Default)]
pub struct RecordingSearchIndex {
    updates: Arc<Mutex<Vec<IndexUpdate>>>,
}

impl RecordingSearchIndex {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every update received so far.
    #[must_use]
    pub fn updates(&self) -> Vec<IndexUpdate> {
        self.updates
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl SearchIndex for RecordingSearchIndex {
    async fn update(&self, update: IndexUpdate) {
        self.updates
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(update);
    }
}
