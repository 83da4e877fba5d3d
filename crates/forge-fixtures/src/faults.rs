use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use forge_core::errors::{ForgeResult, StoreError};
use forge_core::models::{CandidateOrigin, RetrievalCandidate, StoreQuery};
use forge_core::traits::{ConfidenceUpdate, KnowledgeStore, PatternStore, WriteMode};
use forge_core::Confidence;
use forge_storage::InMemoryPatternStore;

/// Store that is always down.
#[derive(Debug, Clone)]
pub struct UnreachableStore {
    name: String,
    origin: CandidateOrigin,
}

impl UnreachableStore {
    pub fn new(origin: CandidateOrigin) -> Self {
        Self {
            name: format!("{origin}-offline"),
            origin,
        }
    }
}

#[async_trait]
impl KnowledgeStore for UnreachableStore {
    fn name(&self) -> &str {
        &self.name
    }

    fn origin(&self) -> CandidateOrigin {
        self.origin
    }

    async fn query(&self, _query: &StoreQuery) -> ForgeResult<Vec<RetrievalCandidate>> {
        Err(StoreError::Unavailable {
            store: self.name.clone(),
            reason: "connection refused".into(),
        }
        .into())
    }
}

/// Wraps a store and delays every query.
pub struct SlowStore {
    inner: Arc<dyn KnowledgeStore>,
    delay: Duration,
}

impl SlowStore {
    pub fn new(inner: Arc<dyn KnowledgeStore>, delay: Duration) -> Self {
        Self { inner, delay }
    }
}

#[async_trait]
impl KnowledgeStore for SlowStore {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn origin(&self) -> CandidateOrigin {
        self.inner.origin()
    }

    async fn query(&self, query: &StoreQuery) -> ForgeResult<Vec<RetrievalCandidate>> {
        tokio::time::sleep(self.delay).await;
        self.inner.query(query).await
    }
}

/// Pattern store whose compare-and-swap writes lose to a phantom writer for
/// the first `conflicts` attempts. Last-writer-wins writes always land.
pub struct ContendedPatternStore {
    inner: Arc<InMemoryPatternStore>,
    conflicts: u32,
    cas_attempts: AtomicU32,
    lww_writes: AtomicU32,
}

impl ContendedPatternStore {
    pub fn new(inner: Arc<InMemoryPatternStore>, conflicts: u32) -> Self {
        Self {
            inner,
            conflicts,
            cas_attempts: AtomicU32::new(0),
            lww_writes: AtomicU32::new(0),
        }
    }

    pub fn cas_attempts(&self) -> u32 {
        self.cas_attempts.load(Ordering::SeqCst)
    }

    pub fn lww_writes(&self) -> u32 {
        self.lww_writes.load(Ordering::SeqCst)
    }

    pub fn inner(&self) -> &InMemoryPatternStore {
        &self.inner
    }
}

#[async_trait]
impl KnowledgeStore for ContendedPatternStore {
    fn name(&self) -> &str {
        "graph-patterns-contended"
    }

    fn origin(&self) -> CandidateOrigin {
        CandidateOrigin::GraphPattern
    }

    async fn query(&self, query: &StoreQuery) -> ForgeResult<Vec<RetrievalCandidate>> {
        self.inner.query(query).await
    }
}

#[async_trait]
impl PatternStore for ContendedPatternStore {
    async fn update(&self, update: &ConfidenceUpdate) -> ForgeResult<Confidence> {
        match update.mode {
            WriteMode::CompareAndSwap => {
                let attempt = self.cas_attempts.fetch_add(1, Ordering::SeqCst);
                if attempt < self.conflicts {
                    return Err(StoreError::VersionConflict {
                        pattern_id: update.pattern_id.clone(),
                        expected: u64::from(attempt),
                        found: u64::from(attempt) + 1,
                    }
                    .into());
                }
            }
            WriteMode::LastWriterWins => {
                self.lww_writes.fetch_add(1, Ordering::SeqCst);
            }
        }
        self.inner.update(update).await
    }
}
