/// Intent Interpreter errors.
///
/// None of these escape `IntentInterpreter::interpret`; they drive the retry
/// and fallback path and end up in logs and degradation events.
#[derive(Debug, thiserror::Error)]
pub enum IntentError {
    #[error("model output violates schema: {reason}")]
    SchemaViolation { reason: String },

    #[error("model returned no intents")]
    EmptyPlan,

    #[error("unknown intent category: {category}")]
    UnknownCategory { category: String },

    #[error("model call failed: {reason}")]
    ModelFailed { reason: String },
}
