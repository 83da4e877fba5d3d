use serde::{Deserialize, Serialize};

use super::{DegradationEvent, FlowGraph, ValidationIssue};

/// Input from the documentation parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynthesisRequest {
    pub intent_text: String,
    pub source_fingerprint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prior_corrections_ref: Option<String>,
    /// Declared canonical pattern id for ground-truth lookups.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canonical_pattern_id: Option<String>,
}

impl SynthesisRequest {
    pub fn new(intent_text: impl Into<String>, source_fingerprint: impl Into<String>) -> Self {
        Self {
            intent_text: intent_text.into(),
            source_fingerprint: source_fingerprint.into(),
            prior_corrections_ref: None,
            canonical_pattern_id: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvenanceSummary {
    pub template_count: usize,
    pub retrieved_count: usize,
    pub corrected_count: usize,
}

impl ProvenanceSummary {
    pub fn from_graph(graph: &FlowGraph) -> Self {
        let (template_count, retrieved_count, corrected_count) = graph.provenance_counts();
        Self {
            template_count,
            retrieved_count,
            corrected_count,
        }
    }
}

/// Output to the packaging collaborator. The graph is final.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisOutput {
    pub graph: FlowGraph,
    pub summary: ProvenanceSummary,
    pub issues: Vec<ValidationIssue>,
    pub degradations: Vec<DegradationEvent>,
    /// True when the interpreter used the deterministic keyword fallback.
    pub used_fallback_plan: bool,
}
