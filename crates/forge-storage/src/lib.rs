//! # forge-storage
//!
//! The four knowledge stores behind the hybrid retriever:
//! correction history, ground truth, graph patterns, and semantic neighbors.
//! In-memory implementations back tests and single-process deployments;
//! `sqlite` persists the two mutable stores (corrections, patterns).

pub mod embedding;
pub mod memory;
pub mod sqlite;

pub use embedding::HashedTermEmbedder;
pub use memory::{
    Exemplar, InMemoryCorrectionStore, InMemoryGroundTruthStore, InMemoryPatternStore,
    InMemorySemanticStore, PatternEntry, SemanticEntry,
};
pub use sqlite::{SqliteCorrectionStore, SqliteKnowledgeStore, SqlitePatternStore};

use forge_core::errors::{ForgeError, StoreError};

/// Wrap an arbitrary backend message as a storage error.
pub(crate) fn to_store_err(message: impl Into<String>) -> ForgeError {
    StoreError::SqliteError {
        message: message.into(),
    }
    .into()
}

/// Keyword overlap (Jaccard) between two keyword lists, case-insensitive.
pub(crate) fn keyword_overlap(a: &[String], b: &[String]) -> f64 {
    use std::collections::HashSet;

    let a: HashSet<String> = a.iter().map(|k| k.to_lowercase()).collect();
    let b: HashSet<String> = b.iter().map(|k| k.to_lowercase()).collect();
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let shared = a.intersection(&b).count() as f64;
    let union = a.union(&b).count() as f64;
    shared / union
}
