//! Strict validation of model output against the intent plan shape.

use serde::Deserialize;

use forge_core::errors::IntentError;
use forge_core::models::{IntegrationIntent, IntentCategory};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPlan {
    intents: Vec<RawIntent>,
}

#[derive(Debug, Deserialize)]
struct RawIntent {
    category: String,
    #[serde(default)]
    keywords: Vec<String>,
    #[serde(default)]
    text: String,
}

/// Some models wrap JSON in a markdown fence even when told not to.
fn strip_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Parse a model response into intents. Any category outside the fixed
/// vocabulary is a schema violation.
pub fn parse_plan(
    raw: &str,
    requirement: &str,
    fingerprint: &str,
) -> Result<Vec<IntegrationIntent>, IntentError> {
    let plan: RawPlan =
        serde_json::from_str(strip_fence(raw)).map_err(|e| IntentError::SchemaViolation {
            reason: e.to_string(),
        })?;
    if plan.intents.is_empty() {
        return Err(IntentError::EmptyPlan);
    }

    plan.intents
        .into_iter()
        .map(|raw_intent| {
            let category = IntentCategory::from_label(&raw_intent.category).ok_or_else(|| {
                IntentError::UnknownCategory {
                    category: raw_intent.category.clone(),
                }
            })?;
            let keywords = raw_intent
                .keywords
                .iter()
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect();
            let text = if raw_intent.text.trim().is_empty() {
                requirement.to_string()
            } else {
                raw_intent.text.trim().to_string()
            };
            Ok(IntegrationIntent::new(category, keywords, text, fingerprint))
        })
        .collect()
}
