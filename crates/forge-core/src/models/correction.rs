use serde::{Deserialize, Serialize};

use super::IntentCategory;

/// Deployment outcome reported with a correction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Success,
    Failure,
}

impl Outcome {
    /// 1.0 for success, 0.0 for failure.
    pub fn value(self) -> f64 {
        match self {
            Self::Success => 1.0,
            Self::Failure => 0.0,
        }
    }
}

impl From<bool> for Outcome {
    fn from(succeeded: bool) -> Self {
        if succeeded {
            Self::Success
        } else {
            Self::Failure
        }
    }
}

/// A user's explicit fix for a node synthesized from a given artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Correction {
    pub fingerprint: String,
    pub node_type: IntentCategory,
    pub corrected_config: serde_json::Value,
    pub outcome: Outcome,
    /// Graph-pattern entry this correction applies to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern_ref: Option<String>,
}

impl Correction {
    pub fn new(
        fingerprint: impl Into<String>,
        node_type: IntentCategory,
        corrected_config: serde_json::Value,
        outcome: Outcome,
    ) -> Self {
        Self {
            fingerprint: fingerprint.into(),
            node_type,
            corrected_config,
            outcome,
            pattern_ref: None,
        }
    }

    pub fn with_pattern_ref(mut self, pattern_id: impl Into<String>) -> Self {
        self.pattern_ref = Some(pattern_id.into());
        self
    }
}
