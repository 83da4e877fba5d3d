//! Prompt and response-schema construction.

use forge_core::models::IntentCategory;
use serde_json::{json, Value};

/// JSON schema the model output must satisfy.
pub fn response_schema() -> Value {
    let vocabulary: Vec<&str> = IntentCategory::VOCABULARY
        .iter()
        .map(|c| c.as_str())
        .collect();
    json!({
        "type": "object",
        "required": ["intents"],
        "additionalProperties": false,
        "properties": {
            "intents": {
                "type": "array",
                "minItems": 1,
                "items": {
                    "type": "object",
                    "required": ["category", "keywords", "text"],
                    "properties": {
                        "category": { "type": "string", "enum": vocabulary },
                        "keywords": { "type": "array", "items": { "type": "string" } },
                        "text": { "type": "string" }
                    }
                }
            }
        }
    })
}

fn vocabulary_line() -> String {
    IntentCategory::VOCABULARY
        .iter()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// First-attempt prompt.
pub fn build_prompt(requirement: &str) -> String {
    format!(
        "Split the integration requirement below into ordered steps.\n\
         Each step has a category from: {}.\n\
         Respond with JSON only: {{\"intents\": [{{\"category\": ..., \"keywords\": [...], \"text\": ...}}]}}.\n\n\
         Requirement:\n{requirement}",
        vocabulary_line()
    )
}

/// Retry prompt: restates the constraints and adds a worked example.
pub fn build_strict_prompt(requirement: &str) -> String {
    format!(
        "Your previous answer did not match the required JSON schema.\n\
         Output a single JSON object and nothing else. No prose, no code fences.\n\
         \"category\" MUST be exactly one of: {}.\n\
         \"keywords\" MUST be an array of lowercase strings.\n\n\
         Example requirement: \"every hour read orders.csv and post them to https://erp.local/api\"\n\
         Example answer: {}\n\n\
         Requirement:\n{requirement}",
        vocabulary_line(),
        example_answer()
    )
}

fn example_answer() -> Value {
    json!({
        "intents": [
            { "category": "trigger", "keywords": ["hour", "schedule"], "text": "every hour" },
            { "category": "transform", "keywords": ["orders", "csv"], "text": "read orders.csv" },
            { "category": "external-call", "keywords": ["post", "erp"], "text": "post them to https://erp.local/api" }
        ]
    })
}
