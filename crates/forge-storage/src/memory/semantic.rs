//! Semantic neighbors: embedded descriptions compared by cosine similarity.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use forge_core::errors::ForgeResult;
use forge_core::models::{CandidateOrigin, IntentCategory, RetrievalCandidate, StoreQuery};
use forge_core::traits::{EmbeddingProvider, KnowledgeStore};
use forge_core::Confidence;

use crate::embedding::cosine_similarity;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticEntry {
    pub id: String,
    pub category: IntentCategory,
    /// Natural-language description that gets embedded.
    pub text: String,
    pub content: serde_json::Value,
    #[serde(default = "default_confidence")]
    pub confidence: Confidence,
}

fn default_confidence() -> Confidence {
    Confidence::new(1.0)
}

#[derive(Debug)]
struct IndexedEntry {
    entry: SemanticEntry,
    embedding: Vec<f32>,
}

pub struct InMemorySemanticStore {
    embedder: Arc<dyn EmbeddingProvider>,
    entries: DashMap<String, IndexedEntry>,
}

impl InMemorySemanticStore {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            embedder,
            entries: DashMap::new(),
        }
    }

    /// Embed and index an entry, replacing any entry with the same id.
    pub fn insert(&self, entry: SemanticEntry) -> ForgeResult<()> {
        let embedding = self.embedder.embed(&entry.text)?;
        self.entries
            .insert(entry.id.clone(), IndexedEntry { entry, embedding });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for InMemorySemanticStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemorySemanticStore")
            .field("embedder", &self.embedder.name())
            .field("entries", &self.entries.len())
            .finish()
    }
}

#[async_trait]
impl KnowledgeStore for InMemorySemanticStore {
    fn name(&self) -> &str {
        "semantic-neighbors"
    }

    fn origin(&self) -> CandidateOrigin {
        CandidateOrigin::SemanticNeighbor
    }

    async fn query(&self, query: &StoreQuery) -> ForgeResult<Vec<RetrievalCandidate>> {
        let probe = self.embedder.embed(&query.text)?;
        let scored: Vec<(String, RetrievalCandidate)> = self
            .entries
            .iter()
            .filter(|e| e.value().entry.category == query.category)
            .map(|e| {
                let indexed = e.value();
                let similarity = cosine_similarity(&probe, &indexed.embedding);
                let candidate = RetrievalCandidate::new(
                    indexed.entry.content.clone(),
                    CandidateOrigin::SemanticNeighbor,
                    indexed.entry.category,
                    similarity,
                )
                .with_confidence(indexed.entry.confidence)
                .with_reference(indexed.entry.id.clone());
                (indexed.entry.id.clone(), candidate)
            })
            .collect();
        Ok(super::sort_and_truncate(scored, query.limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HashedTermEmbedder;
    use forge_core::models::IntegrationIntent;
    use serde_json::json;

    fn store() -> InMemorySemanticStore {
        InMemorySemanticStore::new(Arc::new(HashedTermEmbedder::new(256)))
    }

    fn entry(id: &str, text: &str) -> SemanticEntry {
        SemanticEntry {
            id: id.into(),
            category: IntentCategory::Transform,
            text: text.into(),
            content: json!({ "id": id }),
            confidence: Confidence::new(0.7),
        }
    }

    #[tokio::test]
    async fn closest_text_ranks_first() {
        let store = store();
        store
            .insert(entry("csv", "convert csv rows into json records"))
            .unwrap();
        store
            .insert(entry("xml", "render an xml invoice document"))
            .unwrap();

        let intent = IntegrationIntent::new(
            IntentCategory::Transform,
            vec![],
            "convert csv rows into json records",
            "F",
        );
        let hits = store.query(&StoreQuery::for_intent(&intent, 10)).await.unwrap();
        assert_eq!(hits[0].reference.as_deref(), Some("csv"));
        assert!(hits[0].score > 0.99);
        assert!(hits[0].score > hits[1].score);
    }

    #[tokio::test]
    async fn other_categories_are_ignored() {
        let store = store();
        store.insert(entry("csv", "convert csv")).unwrap();
        let intent = IntegrationIntent::new(IntentCategory::Trigger, vec![], "convert csv", "F");
        assert!(store
            .query(&StoreQuery::for_intent(&intent, 10))
            .await
            .unwrap()
            .is_empty());
    }
}
