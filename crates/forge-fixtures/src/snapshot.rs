use std::sync::Arc;

use serde::Deserialize;

use forge_core::models::Correction;
use forge_core::traits::CorrectionStore;
use forge_storage::{
    Exemplar, HashedTermEmbedder, InMemoryCorrectionStore, InMemoryGroundTruthStore,
    InMemoryPatternStore, InMemorySemanticStore, PatternEntry, SemanticEntry,
};

/// Contents of all four stores at one point in time.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StoreSnapshot {
    pub corrections: Vec<Correction>,
    pub ground_truth: Vec<Exemplar>,
    pub graph_patterns: Vec<PatternEntry>,
    pub semantic: Vec<SemanticEntry>,
}

impl StoreSnapshot {
    /// Load `test-fixtures/snapshots/<name>.json`.
    pub fn load(name: &str) -> Self {
        crate::load_fixture(&format!("snapshots/{name}.json"))
    }

    /// Build in-memory stores holding this snapshot.
    pub async fn seed(&self) -> SeededStores {
        let stores = SeededStores::empty();
        for correction in &self.corrections {
            stores
                .corrections
                .record(correction)
                .await
                .unwrap_or_else(|e| panic!("seeding correction failed: {e}"));
        }
        for exemplar in &self.ground_truth {
            stores.ground_truth.insert(exemplar.clone());
        }
        for pattern in &self.graph_patterns {
            stores.patterns.insert(pattern.clone());
        }
        for entry in &self.semantic {
            stores
                .semantic
                .insert(entry.clone())
                .unwrap_or_else(|e| panic!("seeding semantic entry {} failed: {e}", entry.id));
        }
        stores
    }
}

/// The four in-memory stores, shareable across engine and updater.
#[derive(Debug, Clone)]
pub struct SeededStores {
    pub corrections: Arc<InMemoryCorrectionStore>,
    pub ground_truth: Arc<InMemoryGroundTruthStore>,
    pub patterns: Arc<InMemoryPatternStore>,
    pub semantic: Arc<InMemorySemanticStore>,
}

impl SeededStores {
    pub fn empty() -> Self {
        Self {
            corrections: Arc::new(InMemoryCorrectionStore::new()),
            ground_truth: Arc::new(InMemoryGroundTruthStore::new()),
            patterns: Arc::new(InMemoryPatternStore::new()),
            semantic: Arc::new(InMemorySemanticStore::new(Arc::new(HashedTermEmbedder::new(
                forge_core::constants::DEFAULT_EMBEDDING_DIMENSIONS,
            )))),
        }
    }
}
