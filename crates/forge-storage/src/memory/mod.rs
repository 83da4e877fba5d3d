//! In-memory knowledge stores backed by `DashMap`.
//!
//! Each store returns its candidates sorted (score descending, then a stable
//! key) so a fixed snapshot always answers a query identically.

pub mod correction_history;
pub mod graph_patterns;
pub mod ground_truth;
pub mod semantic;

pub use correction_history::InMemoryCorrectionStore;
pub use graph_patterns::{InMemoryPatternStore, PatternEntry};
pub use ground_truth::{Exemplar, InMemoryGroundTruthStore};
pub use semantic::{InMemorySemanticStore, SemanticEntry};

use std::cmp::Ordering;

use forge_core::models::RetrievalCandidate;

/// Sort by score descending, then by `key` ascending, then truncate.
pub(crate) fn sort_and_truncate<K: Ord>(
    mut scored: Vec<(K, RetrievalCandidate)>,
    limit: usize,
) -> Vec<RetrievalCandidate> {
    scored.sort_by(|(ka, a), (kb, b)| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| ka.cmp(kb))
    });
    scored.truncate(limit);
    scored.into_iter().map(|(_, c)| c).collect()
}
