use std::fmt;

use serde::{Deserialize, Serialize};

use super::IntentCategory;
use crate::confidence::Confidence;

/// Which knowledge store produced a candidate.
///
/// Declaration order is priority order: `Ord` sorts correction-history first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CandidateOrigin {
    CorrectionHistory,
    GroundTruth,
    GraphPattern,
    SemanticNeighbor,
}

impl CandidateOrigin {
    pub const ALL: [CandidateOrigin; 4] = [
        Self::CorrectionHistory,
        Self::GroundTruth,
        Self::GraphPattern,
        Self::SemanticNeighbor,
    ];

    /// Source tier, 1 (highest) through 4.
    pub fn priority(self) -> u8 {
        match self {
            Self::CorrectionHistory => 1,
            Self::GroundTruth => 2,
            Self::GraphPattern => 3,
            Self::SemanticNeighbor => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::CorrectionHistory => "correction-history",
            Self::GroundTruth => "ground-truth",
            Self::GraphPattern => "graph-pattern",
            Self::SemanticNeighbor => "semantic-neighbor",
        }
    }
}

impl fmt::Display for CandidateOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A previously known implementation fragment offered as grounding.
/// Immutable once retrieved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalCandidate {
    /// Component config fragment (JSON object).
    pub content: serde_json::Value,
    pub origin: CandidateOrigin,
    /// Store-specific relevance score, higher is better.
    pub score: f64,
    pub confidence: Confidence,
    /// Category this candidate grounds.
    pub node_type: IntentCategory,
    /// Graph-pattern id or exemplar id, when the store has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl RetrievalCandidate {
    pub fn new(
        content: serde_json::Value,
        origin: CandidateOrigin,
        node_type: IntentCategory,
        score: f64,
    ) -> Self {
        Self {
            content,
            origin,
            score,
            confidence: Confidence::default(),
            node_type,
            reference: None,
        }
    }

    pub fn with_confidence(mut self, confidence: Confidence) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    /// blake3 hash of the canonical JSON serialization of `content`.
    /// Object keys serialize in sorted order, so equal content hashes equal.
    pub fn content_hash(&self) -> String {
        let canonical = serde_json::to_vec(&self.content).unwrap_or_default();
        blake3::hash(&canonical).to_hex().to_string()
    }
}
