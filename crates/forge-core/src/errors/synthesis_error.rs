/// Synthesis, assembly and validation errors.
#[derive(Debug, thiserror::Error)]
pub enum SynthesisError {
    /// Terminal failure: the graph violates a structural invariant that
    /// cannot be repaired. Carries the offending node and edge ids.
    #[error("synthesis failed: {reason} (nodes: [{}], edges: [{}])", .node_ids.join(", "), .edge_ids.join(", "))]
    SynthesisFailed {
        reason: String,
        node_ids: Vec<String>,
        edge_ids: Vec<String>,
    },

    #[error("empty plan: no component groups to assemble")]
    EmptyPlan,

    #[error("invalid component config for {node_id}: {reason}")]
    InvalidConfig { node_id: String, reason: String },
}

impl SynthesisError {
    /// Build a `SynthesisFailed` diagnostic.
    pub fn failed(
        reason: impl Into<String>,
        node_ids: Vec<String>,
        edge_ids: Vec<String>,
    ) -> Self {
        Self::SynthesisFailed {
            reason: reason.into(),
            node_ids,
            edge_ids,
        }
    }
}
