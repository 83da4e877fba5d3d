//! Ground truth: hand-verified exemplars tied to a fingerprint or a
//! canonical pattern id.

use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use forge_core::errors::ForgeResult;
use forge_core::models::{CandidateOrigin, IntentCategory, RetrievalCandidate, StoreQuery};
use forge_core::traits::KnowledgeStore;
use forge_core::Confidence;

/// Score for an exemplar bound to the request's own fingerprint.
const FINGERPRINT_MATCH_SCORE: f64 = 1.0;
/// Score for an exemplar matched through its canonical pattern id.
const CANONICAL_MATCH_SCORE: f64 = 0.9;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exemplar {
    pub id: String,
    pub category: IntentCategory,
    #[serde(default)]
    pub fingerprint: Option<String>,
    #[serde(default)]
    pub canonical_pattern_id: Option<String>,
    pub content: serde_json::Value,
}

#[derive(Debug, Default)]
pub struct InMemoryGroundTruthStore {
    exemplars: DashMap<String, Exemplar>,
}

impl InMemoryGroundTruthStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, exemplar: Exemplar) {
        self.exemplars.insert(exemplar.id.clone(), exemplar);
    }

    pub fn len(&self) -> usize {
        self.exemplars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exemplars.is_empty()
    }

    fn match_score(exemplar: &Exemplar, query: &StoreQuery) -> Option<f64> {
        if exemplar.category != query.category {
            return None;
        }
        if exemplar
            .fingerprint
            .as_deref()
            .is_some_and(|fp| query.matches_fingerprint(fp))
        {
            return Some(FINGERPRINT_MATCH_SCORE);
        }
        let canonical = exemplar.canonical_pattern_id.as_deref()?;
        let declared = query.canonical_pattern_id.as_deref() == Some(canonical);
        let mentioned = query
            .keywords
            .iter()
            .any(|k| k.eq_ignore_ascii_case(canonical));
        (declared || mentioned).then_some(CANONICAL_MATCH_SCORE)
    }
}

#[async_trait]
impl KnowledgeStore for InMemoryGroundTruthStore {
    fn name(&self) -> &str {
        "ground-truth"
    }

    fn origin(&self) -> CandidateOrigin {
        CandidateOrigin::GroundTruth
    }

    async fn query(&self, query: &StoreQuery) -> ForgeResult<Vec<RetrievalCandidate>> {
        let scored: Vec<(String, RetrievalCandidate)> = self
            .exemplars
            .iter()
            .filter_map(|entry| {
                let exemplar = entry.value();
                let score = Self::match_score(exemplar, query)?;
                let candidate = RetrievalCandidate::new(
                    exemplar.content.clone(),
                    CandidateOrigin::GroundTruth,
                    exemplar.category,
                    score,
                )
                .with_confidence(Confidence::new(1.0))
                .with_reference(exemplar.id.clone());
                Some((exemplar.id.clone(), candidate))
            })
            .collect();
        Ok(super::sort_and_truncate(scored, query.limit))
    }
}
