use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults;

/// Hybrid retriever configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Graph-pattern candidates need confidence strictly above this.
    pub graph_confidence_threshold: f64,
    /// Semantic neighbors need similarity strictly above this.
    pub semantic_similarity_threshold: f64,
    /// Merged list length per intent.
    pub candidate_cap: usize,
    /// Per-store query timeout (milliseconds).
    pub store_timeout_ms: u64,
    /// Raw candidates requested from each store.
    pub per_store_limit: usize,
}

impl RetrievalConfig {
    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            graph_confidence_threshold: defaults::DEFAULT_GRAPH_CONFIDENCE_THRESHOLD,
            semantic_similarity_threshold: defaults::DEFAULT_SEMANTIC_SIMILARITY_THRESHOLD,
            candidate_cap: defaults::DEFAULT_CANDIDATE_CAP,
            store_timeout_ms: defaults::DEFAULT_STORE_TIMEOUT_MS,
            per_store_limit: defaults::DEFAULT_PER_STORE_LIMIT,
        }
    }
}
