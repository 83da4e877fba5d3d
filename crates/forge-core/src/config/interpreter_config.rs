use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults;

/// Intent interpreter configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpreterConfig {
    /// Per-attempt model timeout (milliseconds).
    pub model_timeout_ms: u64,
    /// Total model attempts; the second uses the stricter prompt.
    pub max_attempts: u32,
    /// Shortest token the keyword fallback keeps.
    pub fallback_min_keyword_len: usize,
}

impl InterpreterConfig {
    pub fn model_timeout(&self) -> Duration {
        Duration::from_millis(self.model_timeout_ms)
    }
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            model_timeout_ms: defaults::DEFAULT_MODEL_TIMEOUT_MS,
            max_attempts: defaults::DEFAULT_MODEL_MAX_ATTEMPTS,
            fallback_min_keyword_len: defaults::DEFAULT_FALLBACK_MIN_KEYWORD_LEN,
        }
    }
}
