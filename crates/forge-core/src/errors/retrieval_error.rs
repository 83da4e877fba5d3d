/// Hybrid Retriever errors.
#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error("store {store} timed out after {after_ms}ms")]
    StoreTimeout { store: String, after_ms: u64 },

    #[error("store {store} failed: {reason}")]
    StoreFailed { store: String, reason: String },

    #[error("retrieval task failed: {reason}")]
    TaskFailed { reason: String },
}
