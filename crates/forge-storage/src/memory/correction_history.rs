//! Correction history: user fixes keyed by source fingerprint.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;

use forge_core::errors::ForgeResult;
use forge_core::models::{CandidateOrigin, Correction, RetrievalCandidate, StoreQuery};
use forge_core::traits::{CorrectionStore, KnowledgeStore};
use forge_core::Confidence;

#[derive(Debug, Clone)]
struct CorrectionRecord {
    sequence: u64,
    correction: Correction,
}

/// Append-only correction log. Newer corrections outrank older ones.
#[derive(Debug, Default)]
pub struct InMemoryCorrectionStore {
    by_fingerprint: DashMap<String, Vec<CorrectionRecord>>,
    sequence: AtomicU64,
}

impl InMemoryCorrectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of corrections recorded.
    pub fn len(&self) -> usize {
        self.by_fingerprint.iter().map(|e| e.value().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Candidate for a recorded correction. Score rises with the sequence number
/// so the most recent fix for an artifact ranks first.
pub(crate) fn correction_candidate(correction: &Correction, sequence: u64) -> RetrievalCandidate {
    let score = 1.0 - 1.0 / (sequence as f64 + 2.0);
    let candidate = RetrievalCandidate::new(
        correction.corrected_config.clone(),
        CandidateOrigin::CorrectionHistory,
        correction.node_type,
        score,
    )
    .with_confidence(Confidence::new(1.0));
    match &correction.pattern_ref {
        Some(pattern_id) => candidate.with_reference(pattern_id.clone()),
        None => candidate,
    }
}

#[async_trait]
impl KnowledgeStore for InMemoryCorrectionStore {
    fn name(&self) -> &str {
        "correction-history"
    }

    fn origin(&self) -> CandidateOrigin {
        CandidateOrigin::CorrectionHistory
    }

    async fn query(&self, query: &StoreQuery) -> ForgeResult<Vec<RetrievalCandidate>> {
        let mut scored = Vec::new();
        for fingerprint in &query.fingerprints {
            if let Some(records) = self.by_fingerprint.get(fingerprint) {
                scored.extend(
                    records
                        .iter()
                        .filter(|r| r.correction.node_type == query.category)
                        .map(|r| {
                            (
                                std::cmp::Reverse(r.sequence),
                                correction_candidate(&r.correction, r.sequence),
                            )
                        }),
                );
            }
        }
        Ok(super::sort_and_truncate(scored, query.limit))
    }
}

#[async_trait]
impl CorrectionStore for InMemoryCorrectionStore {
    async fn record(&self, correction: &Correction) -> ForgeResult<u64> {
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst);
        self.by_fingerprint
            .entry(correction.fingerprint.clone())
            .or_default()
            .push(CorrectionRecord {
                sequence,
                correction: correction.clone(),
            });
        debug!(
            fingerprint = %correction.fingerprint,
            node_type = %correction.node_type,
            sequence,
            "correction recorded"
        );
        Ok(sequence)
    }
}
