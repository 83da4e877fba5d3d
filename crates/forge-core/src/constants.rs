/// flowforge version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Graph-pattern candidates must have confidence strictly above this.
pub const DEFAULT_GRAPH_CONFIDENCE_THRESHOLD: f64 = 0.8;

/// Semantic-neighbor candidates must have similarity strictly above this.
pub const DEFAULT_SEMANTIC_SIMILARITY_THRESHOLD: f64 = 0.75;

/// Maximum number of merged candidates kept per intent.
pub const DEFAULT_CANDIDATE_CAP: usize = 20;

/// Allowed range for the candidate cap.
pub const MIN_CANDIDATE_CAP: usize = 15;
pub const MAX_CANDIDATE_CAP: usize = 20;

/// Maximum raw candidates requested from a single store per query.
pub const DEFAULT_PER_STORE_LIMIT: usize = 50;

/// Per-store query timeout.
pub const DEFAULT_STORE_TIMEOUT_MS: u64 = 10_000;

/// Language-model call timeout (per attempt).
pub const DEFAULT_MODEL_TIMEOUT_MS: u64 = 30_000;

/// One model call plus one stricter retry.
pub const DEFAULT_MODEL_MAX_ATTEMPTS: u32 = 2;

/// Minimum token length kept by the keyword fallback.
pub const DEFAULT_FALLBACK_MIN_KEYWORD_LEN: usize = 3;

/// EMA smoothing factor for confidence updates.
pub const DEFAULT_EMA_ALPHA: f64 = 0.3;

/// Optimistic read-modify-write attempts before last-writer-wins.
pub const DEFAULT_MAX_UPDATE_ATTEMPTS: u32 = 3;

/// Capacity of the feedback event queue.
pub const DEFAULT_FEEDBACK_QUEUE_CAPACITY: usize = 256;

/// Dimensionality of the hashed term-frequency embedder.
pub const DEFAULT_EMBEDDING_DIMENSIONS: usize = 256;

/// Filler words of integration requirements. Dropped by keyword extraction
/// and by the embedder so phrasing does not outweigh the nouns and verbs.
pub const STOPWORDS: &[&str] = &[
    "and", "are", "but", "for", "from", "into", "its", "not", "off", "onto", "that", "the",
    "then", "this", "to", "with", "was", "were", "will", "when", "each", "every", "via", "all",
    "any", "has", "have", "them", "they", "after", "before", "out",
];
