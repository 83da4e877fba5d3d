//! Graph-relationship patterns with a learned confidence.

use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use forge_core::errors::{ForgeResult, StoreError};
use forge_core::models::{CandidateOrigin, IntentCategory, Outcome, RetrievalCandidate, StoreQuery};
use forge_core::traits::{ConfidenceUpdate, KnowledgeStore, PatternStore, WriteMode};
use forge_core::Confidence;

use crate::keyword_overlap;

/// One reusable pattern. `version` increments on every confidence write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternEntry {
    pub id: String,
    pub category: IntentCategory,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub content: serde_json::Value,
    pub confidence: Confidence,
    #[serde(default)]
    pub version: u64,
    #[serde(default)]
    pub success_count: u64,
    #[serde(default)]
    pub failure_count: u64,
}

impl PatternEntry {
    pub fn new(
        id: impl Into<String>,
        category: IntentCategory,
        keywords: Vec<String>,
        content: serde_json::Value,
        confidence: f64,
    ) -> Self {
        Self {
            id: id.into(),
            category,
            keywords,
            content,
            confidence: Confidence::new(confidence),
            version: 0,
            success_count: 0,
            failure_count: 0,
        }
    }

    pub(crate) fn apply(&mut self, confidence: Confidence, outcome: Outcome) {
        self.confidence = confidence;
        self.version += 1;
        match outcome {
            Outcome::Success => self.success_count += 1,
            Outcome::Failure => self.failure_count += 1,
        }
    }
}

/// Blend of stored confidence and keyword overlap with the query.
pub(crate) fn pattern_score(confidence: Confidence, pattern_keywords: &[String], query: &StoreQuery) -> f64 {
    0.5 * confidence.value() + 0.5 * keyword_overlap(pattern_keywords, &query.keywords)
}

pub(crate) fn pattern_candidate(entry: &PatternEntry, query: &StoreQuery) -> RetrievalCandidate {
    RetrievalCandidate::new(
        entry.content.clone(),
        CandidateOrigin::GraphPattern,
        entry.category,
        pattern_score(entry.confidence, &entry.keywords, query),
    )
    .with_confidence(entry.confidence)
    .with_reference(entry.id.clone())
}

#[derive(Debug, Default)]
pub struct InMemoryPatternStore {
    entries: DashMap<String, PatternEntry>,
}

impl InMemoryPatternStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, entry: PatternEntry) {
        self.entries.insert(entry.id.clone(), entry);
    }

    /// Snapshot of one entry.
    pub fn get(&self, pattern_id: &str) -> Option<PatternEntry> {
        self.entries.get(pattern_id).map(|e| e.value().clone())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn not_found(pattern_id: &str) -> StoreError {
        StoreError::PatternNotFound {
            pattern_id: pattern_id.to_string(),
        }
    }
}

#[async_trait]
impl KnowledgeStore for InMemoryPatternStore {
    fn name(&self) -> &str {
        "graph-patterns"
    }

    fn origin(&self) -> CandidateOrigin {
        CandidateOrigin::GraphPattern
    }

    async fn query(&self, query: &StoreQuery) -> ForgeResult<Vec<RetrievalCandidate>> {
        let scored: Vec<(String, RetrievalCandidate)> = self
            .entries
            .iter()
            .filter(|e| e.value().category == query.category)
            .map(|e| (e.key().clone(), pattern_candidate(e.value(), query)))
            .collect();
        Ok(super::sort_and_truncate(scored, query.limit))
    }
}

#[async_trait]
impl PatternStore for InMemoryPatternStore {
    async fn update(&self, update: &ConfidenceUpdate) -> ForgeResult<Confidence> {
        let id = update.pattern_id.as_str();
        let outcome = update.outcome.value();

        let written = match update.mode {
            WriteMode::CompareAndSwap => {
                // Read, compute outside the lock, then write only if nobody
                // else wrote in between.
                let (expected, old) = {
                    let entry = self.entries.get(id).ok_or_else(|| Self::not_found(id))?;
                    (entry.version, entry.confidence)
                };
                let new = old.ema(outcome, update.alpha);
                let mut entry = self
                    .entries
                    .get_mut(id)
                    .ok_or_else(|| Self::not_found(id))?;
                if entry.version != expected {
                    return Err(StoreError::VersionConflict {
                        pattern_id: id.to_string(),
                        expected,
                        found: entry.version,
                    }
                    .into());
                }
                entry.apply(new, update.outcome);
                new
            }
            WriteMode::LastWriterWins => {
                let mut entry = self
                    .entries
                    .get_mut(id)
                    .ok_or_else(|| Self::not_found(id))?;
                let new = entry.confidence.ema(outcome, update.alpha);
                entry.apply(new, update.outcome);
                new
            }
        };

        debug!(pattern_id = id, confidence = %written, mode = ?update.mode, "pattern confidence updated");
        Ok(written)
    }
}
