pub use crate::constants::{
    DEFAULT_CANDIDATE_CAP, DEFAULT_EMA_ALPHA, DEFAULT_EMBEDDING_DIMENSIONS,
    DEFAULT_FALLBACK_MIN_KEYWORD_LEN, DEFAULT_FEEDBACK_QUEUE_CAPACITY,
    DEFAULT_GRAPH_CONFIDENCE_THRESHOLD, DEFAULT_MAX_UPDATE_ATTEMPTS, DEFAULT_MODEL_MAX_ATTEMPTS,
    DEFAULT_MODEL_TIMEOUT_MS, DEFAULT_PER_STORE_LIMIT, DEFAULT_SEMANTIC_SIMILARITY_THRESHOLD,
    DEFAULT_STORE_TIMEOUT_MS,
};

/// Project config file name looked up in the project root.
pub const PROJECT_CONFIG_FILE: &str = "flowforge.toml";

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "FORGE_";
