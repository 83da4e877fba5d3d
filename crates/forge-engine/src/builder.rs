//! Builder wiring the model, the four stores, and config into an engine.

use std::path::Path;
use std::sync::Arc;

use forge_core::errors::{ConfigError, ForgeResult};
use forge_core::traits::{CorrectionStore, KnowledgeStore, LanguageModel, PatternStore};
use forge_core::ForgeConfig;
use forge_storage::SqliteKnowledgeStore;

use crate::engine::SynthesisEngine;

#[derive(Default)]
pub struct SynthesisEngineBuilder {
    model: Option<Arc<dyn LanguageModel>>,
    config: ForgeConfig,
    stores: Vec<Arc<dyn KnowledgeStore>>,
    corrections: Option<Arc<dyn CorrectionStore>>,
    patterns: Option<Arc<dyn PatternStore>>,
}

impl SynthesisEngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn model<M: LanguageModel + 'static>(mut self, model: Arc<M>) -> Self {
        self.model = Some(model);
        self
    }

    pub fn config(mut self, config: ForgeConfig) -> Self {
        self.config = config;
        self
    }

    /// Correction history. Queried at tier 1 and written by feedback.
    pub fn correction_store<S: CorrectionStore + 'static>(mut self, store: Arc<S>) -> Self {
        self.stores.push(store.clone());
        self.corrections = Some(store);
        self
    }

    pub fn ground_truth_store<S: KnowledgeStore + 'static>(self, store: Arc<S>) -> Self {
        self.store(store)
    }

    /// Graph patterns. Queried at tier 3; confidence updated by feedback.
    pub fn pattern_store<S: PatternStore + 'static>(mut self, store: Arc<S>) -> Self {
        self.stores.push(store.clone());
        self.patterns = Some(store);
        self
    }

    pub fn semantic_store<S: KnowledgeStore + 'static>(self, store: Arc<S>) -> Self {
        self.store(store)
    }

    /// Any read-only store. Its tier comes from `KnowledgeStore::origin`.
    pub fn store(mut self, store: Arc<dyn KnowledgeStore>) -> Self {
        self.stores.push(store);
        self
    }

    /// Use a SQLite file for the correction history and graph patterns.
    pub fn sqlite(self, path: &Path) -> ForgeResult<Self> {
        let db = SqliteKnowledgeStore::open(path)?;
        Ok(self
            .correction_store(Arc::new(db.corrections()))
            .pattern_store(Arc::new(db.patterns())))
    }

    /// Validate the config and build. A language model is required.
    pub fn build(self) -> ForgeResult<SynthesisEngine> {
        self.config.validate()?;
        let model = self.model.ok_or_else(|| ConfigError::ValidationFailed {
            field: "model".to_string(),
            message: "a language model is required".to_string(),
        })?;
        Ok(SynthesisEngine::new(
            model,
            self.config,
            self.stores,
            self.corrections,
            self.patterns,
        ))
    }
}
