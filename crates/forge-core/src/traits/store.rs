//! Knowledge-store contracts.
//!
//! Every store answers `query`. The graph-pattern store additionally accepts
//! confidence `update`s and the correction-history store accepts `record`;
//! the engine touches stores through nothing else.

use async_trait::async_trait;

use crate::confidence::Confidence;
use crate::errors::ForgeResult;
use crate::models::{CandidateOrigin, Correction, Outcome, RetrievalCandidate, StoreQuery};

/// Read side shared by all four stores.
#[async_trait]
pub trait KnowledgeStore: Send + Sync {
    /// Human-readable store name used in logs and degradation events.
    fn name(&self) -> &str;

    /// Tier this store's candidates belong to.
    fn origin(&self) -> CandidateOrigin;

    /// Raw candidates for a query. Threshold filtering and ranking happen in
    /// the retriever, so stores return everything that matches the key.
    async fn query(&self, query: &StoreQuery) -> ForgeResult<Vec<RetrievalCandidate>>;
}

/// How a confidence write treats concurrent writers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Fail with `StoreError::VersionConflict` if the entry changed between
    /// the read and the write.
    CompareAndSwap,
    /// Write unconditionally on top of whatever is current.
    LastWriterWins,
}

/// A single EMA step applied to one graph-pattern entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfidenceUpdate {
    pub pattern_id: String,
    pub outcome: Outcome,
    pub alpha: f64,
    pub mode: WriteMode,
}

/// Graph-relationship store: patterns with a mutable confidence.
#[async_trait]
pub trait PatternStore: KnowledgeStore {
    /// Read-modify-write `new = alpha * outcome + (1 - alpha) * old`.
    /// Returns the confidence that was written.
    async fn update(&self, update: &ConfidenceUpdate) -> ForgeResult<Confidence>;
}

/// Correction-history store: append-only log keyed by fingerprint.
#[async_trait]
pub trait CorrectionStore: KnowledgeStore {
    /// Append a correction. Returns its sequence number (monotonic per store).
    async fn record(&self, correction: &Correction) -> ForgeResult<u64>;
}
