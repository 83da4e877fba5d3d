/// Feedback/Confidence Updater errors.
#[derive(Debug, thiserror::Error)]
pub enum LearningError {
    #[error("feedback queue closed")]
    QueueClosed,

    #[error("feedback queue full ({capacity} pending)")]
    QueueFull { capacity: usize },

    #[error("invalid correction: {reason}")]
    InvalidCorrection { reason: String },
}
