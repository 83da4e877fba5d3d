//! Deterministic fallback plan used when the model cannot produce a valid one.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use forge_core::constants::STOPWORDS;
use forge_core::models::{IntegrationIntent, IntentCategory};

static TOKEN_RE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"[a-z0-9]+").ok());

/// Lowercase alphanumeric tokens at least `min_len` long, stopwords removed,
/// first occurrence order kept.
pub fn extract_keywords(text: &str, min_len: usize) -> Vec<String> {
    let Some(re) = TOKEN_RE.as_ref() else {
        return Vec::new();
    };
    let lowered = text.to_lowercase();
    let mut seen = HashSet::new();
    re.find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|t| t.len() >= min_len && !STOPWORDS.contains(t))
        .filter(|t| seen.insert(*t))
        .map(str::to_string)
        .collect()
}

/// Minimal single-intent plan: one `external-call` carrying the whole text.
pub fn fallback_plan(text: &str, fingerprint: &str, min_len: usize) -> Vec<IntegrationIntent> {
    vec![IntegrationIntent::new(
        IntentCategory::ExternalCall,
        extract_keywords(text, min_len),
        text.trim(),
        fingerprint,
    )]
}
