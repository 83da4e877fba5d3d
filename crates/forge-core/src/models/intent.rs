use std::fmt;

use serde::{Deserialize, Serialize};

/// Fixed category vocabulary for component intents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IntentCategory {
    Trigger,
    Transform,
    ExternalCall,
    ConditionalBranch,
    ErrorHandler,
    Terminal,
    /// Anything outside the vocabulary. Never produced by the interpreter;
    /// only reachable through caller-supplied intents.
    #[serde(other)]
    Unknown,
}

impl IntentCategory {
    /// The categories a model is allowed to emit.
    pub const VOCABULARY: [IntentCategory; 6] = [
        Self::Trigger,
        Self::Transform,
        Self::ExternalCall,
        Self::ConditionalBranch,
        Self::ErrorHandler,
        Self::Terminal,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trigger => "trigger",
            Self::Transform => "transform",
            Self::ExternalCall => "external-call",
            Self::ConditionalBranch => "conditional-branch",
            Self::ErrorHandler => "error-handler",
            Self::Terminal => "terminal",
            Self::Unknown => "unknown",
        }
    }

    /// Strict lookup against the vocabulary. Returns `None` for anything else,
    /// including the literal `"unknown"`.
    pub fn from_label(label: &str) -> Option<Self> {
        let normalized = label.trim().to_ascii_lowercase().replace('_', "-");
        Self::VOCABULARY
            .into_iter()
            .find(|c| c.as_str() == normalized)
    }

    /// Composite categories expand into a fixed multi-node micro-pattern.
    pub fn is_composite(self) -> bool {
        matches!(self, Self::ExternalCall | Self::ConditionalBranch)
    }
}

impl fmt::Display for IntentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed, extracted unit of integration requirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrationIntent {
    pub category: IntentCategory,
    pub keywords: Vec<String>,
    pub raw_text: String,
    pub source_fingerprint: String,
}

impl IntegrationIntent {
    pub fn new(
        category: IntentCategory,
        keywords: Vec<String>,
        raw_text: impl Into<String>,
        source_fingerprint: impl Into<String>,
    ) -> Self {
        Self {
            category,
            keywords,
            raw_text: raw_text.into(),
            source_fingerprint: source_fingerprint.into(),
        }
    }

    /// Text used for semantic lookups: keywords followed by the raw text.
    pub fn search_text(&self) -> String {
        if self.keywords.is_empty() {
            return self.raw_text.clone();
        }
        format!("{} {}", self.keywords.join(" "), self.raw_text)
    }
}
