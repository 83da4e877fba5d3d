use super::error_code::{self, ForgeErrorCode};
use super::{
    ConfigError, IntentError, LearningError, RetrievalError, StoreError, SynthesisError,
};

/// Top-level error aggregating all subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum ForgeError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("intent error: {0}")]
    Intent(#[from] IntentError),

    #[error("retrieval error: {0}")]
    Retrieval(#[from] RetrievalError),

    #[error("synthesis error: {0}")]
    Synthesis(#[from] SynthesisError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("learning error: {0}")]
    Learning(#[from] LearningError),

    #[error("{operation} timed out after {after_ms}ms")]
    Timeout { operation: String, after_ms: u64 },

    #[error("request cancelled")]
    Cancelled,
}

pub type ForgeResult<T> = Result<T, ForgeError>;

impl ForgeErrorCode for ForgeError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Store(e) => e.error_code(),
            Self::Intent(e) => e.error_code(),
            Self::Retrieval(e) => e.error_code(),
            Self::Synthesis(e) => e.error_code(),
            Self::Config(_) => error_code::CONFIG_INVALID,
            Self::Learning(e) => e.error_code(),
            Self::Timeout { .. } => error_code::TIMEOUT,
            Self::Cancelled => error_code::CANCELLED,
        }
    }
}
