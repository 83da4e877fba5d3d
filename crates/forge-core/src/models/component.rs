use std::fmt;

use serde::{Deserialize, Serialize};

use super::CandidateOrigin;

/// Concrete node type emitted by the synthesizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComponentType {
    Trigger,
    Transform,
    Invocation,
    Channel,
    Endpoint,
    Decision,
    Route,
    ErrorHandler,
    Terminal,
    Merge,
    Placeholder,
}

impl ComponentType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trigger => "trigger",
            Self::Transform => "transform",
            Self::Invocation => "invocation",
            Self::Channel => "channel",
            Self::Endpoint => "endpoint",
            Self::Decision => "decision",
            Self::Route => "route",
            Self::ErrorHandler => "error-handler",
            Self::Terminal => "terminal",
            Self::Merge => "merge",
            Self::Placeholder => "placeholder",
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a node's config came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    Template,
    Retrieved,
    Corrected,
}

impl Provenance {
    /// Provenance implied by the candidate that informed a node, if any.
    pub fn from_origin(origin: Option<CandidateOrigin>) -> Self {
        match origin {
            Some(CandidateOrigin::CorrectionHistory) => Self::Corrected,
            Some(_) => Self::Retrieved,
            None => Self::Template,
        }
    }
}

/// One node of a flow graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentSpec {
    pub id: String,
    #[serde(rename = "type")]
    pub component_type: ComponentType,
    pub name: String,
    pub config: serde_json::Value,
    pub provenance: Provenance,
    /// Global emission order; stable across runs.
    pub order: u32,
    /// Position of the originating intent in the plan.
    pub intent_index: usize,
    /// Shared by all nodes of one composite expansion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
}
