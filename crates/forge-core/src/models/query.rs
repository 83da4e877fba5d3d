use serde::{Deserialize, Serialize};

use super::{IntegrationIntent, IntentCategory};

/// Key passed to every knowledge store's `query`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreQuery {
    /// Request fingerprint first, then any prior-corrections reference.
    pub fingerprints: Vec<String>,
    pub category: IntentCategory,
    pub keywords: Vec<String>,
    pub text: String,
    pub canonical_pattern_id: Option<String>,
    pub limit: usize,
}

impl StoreQuery {
    pub fn for_intent(intent: &IntegrationIntent, limit: usize) -> Self {
        Self {
            fingerprints: vec![intent.source_fingerprint.clone()],
            category: intent.category,
            keywords: intent.keywords.clone(),
            text: intent.search_text(),
            canonical_pattern_id: None,
            limit,
        }
    }

    pub fn with_prior_corrections(mut self, reference: Option<&str>) -> Self {
        if let Some(r) = reference {
            if !self.fingerprints.iter().any(|f| f == r) {
                self.fingerprints.push(r.to_string());
            }
        }
        self
    }

    pub fn with_canonical_pattern(mut self, pattern_id: Option<&str>) -> Self {
        self.canonical_pattern_id = pattern_id.map(str::to_string);
        self
    }

    pub fn matches_fingerprint(&self, fingerprint: &str) -> bool {
        self.fingerprints.iter().any(|f| f == fingerprint)
    }
}
