use serde::{Deserialize, Serialize};

use super::defaults;

/// Feedback/confidence updater configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LearningConfig {
    /// EMA smoothing factor in (0, 1].
    pub ema_alpha: f64,
    /// Compare-and-swap attempts before falling back to last-writer-wins.
    pub max_update_attempts: u32,
    /// Pending feedback events before `submit` reports the queue as full.
    pub queue_capacity: usize,
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            ema_alpha: defaults::DEFAULT_EMA_ALPHA,
            max_update_attempts: defaults::DEFAULT_MAX_UPDATE_ATTEMPTS,
            queue_capacity: defaults::DEFAULT_FEEDBACK_QUEUE_CAPACITY,
        }
    }
}
