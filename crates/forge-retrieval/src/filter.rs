//! Tier thresholds: graph patterns by confidence, semantic neighbors by
//! similarity. Correction history and ground truth are never filtered.

use forge_core::config::RetrievalConfig;
use forge_core::models::{CandidateOrigin, RetrievalCandidate};

pub fn passes_threshold(candidate: &RetrievalCandidate, config: &RetrievalConfig) -> bool {
    match candidate.origin {
        CandidateOrigin::CorrectionHistory | CandidateOrigin::GroundTruth => true,
        CandidateOrigin::GraphPattern => {
            candidate.confidence.value() > config.graph_confidence_threshold
        }
        CandidateOrigin::SemanticNeighbor => candidate.score > config.semantic_similarity_threshold,
    }
}

pub fn apply_thresholds(
    candidates: Vec<RetrievalCandidate>,
    config: &RetrievalConfig,
) -> Vec<RetrievalCandidate> {
    candidates
        .into_iter()
        .filter(|c| passes_threshold(c, config))
        .collect()
}
