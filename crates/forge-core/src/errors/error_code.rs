//! Stable machine-readable error codes.

use super::{IntentError, LearningError, RetrievalError, StoreError, SynthesisError};

pub const STORE_UNAVAILABLE: &str = "STORE_UNAVAILABLE";
pub const STORE_IO: &str = "STORE_IO";
pub const PATTERN_NOT_FOUND: &str = "PATTERN_NOT_FOUND";
pub const CONFIDENCE_CONFLICT: &str = "CONFIDENCE_CONFLICT";
pub const INTENT_PARSE: &str = "INTENT_PARSE";
pub const MODEL_FAILED: &str = "MODEL_FAILED";
pub const RETRIEVAL_TIMEOUT: &str = "RETRIEVAL_TIMEOUT";
pub const RETRIEVAL_FAILED: &str = "RETRIEVAL_FAILED";
pub const SYNTHESIS_FAILED: &str = "SYNTHESIS_FAILED";
pub const SYNTHESIS_INVALID: &str = "SYNTHESIS_INVALID";
pub const CONFIG_INVALID: &str = "CONFIG_INVALID";
pub const FEEDBACK_REJECTED: &str = "FEEDBACK_REJECTED";
pub const TIMEOUT: &str = "TIMEOUT";
pub const CANCELLED: &str = "CANCELLED";

/// Maps an error to a stable code for callers that cannot match on types.
pub trait ForgeErrorCode {
    fn error_code(&self) -> &'static str;
}

impl ForgeErrorCode for StoreError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Unavailable { .. } => STORE_UNAVAILABLE,
            Self::PatternNotFound { .. } => PATTERN_NOT_FOUND,
            Self::VersionConflict { .. } => CONFIDENCE_CONFLICT,
            Self::SqliteError { .. } | Self::MigrationFailed { .. } | Self::Serialization { .. } => {
                STORE_IO
            }
        }
    }
}

impl ForgeErrorCode for IntentError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::ModelFailed { .. } => MODEL_FAILED,
            _ => INTENT_PARSE,
        }
    }
}

impl ForgeErrorCode for RetrievalError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::StoreTimeout { .. } => RETRIEVAL_TIMEOUT,
            _ => RETRIEVAL_FAILED,
        }
    }
}

impl ForgeErrorCode for SynthesisError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::SynthesisFailed { .. } => SYNTHESIS_FAILED,
            _ => SYNTHESIS_INVALID,
        }
    }
}

impl ForgeErrorCode for LearningError {
    fn error_code(&self) -> &'static str {
        FEEDBACK_REJECTED
    }
}
