//! # forge-retrieval
//!
//! Hybrid retriever over the four knowledge stores.
//!
//! Per intent: fan out to every store concurrently (each call bounded by the
//! store timeout), drop candidates below the tier thresholds, deduplicate by
//! content hash, rank by source tier then score, truncate to the cap.
//! A store that errors or times out contributes nothing.

pub mod fan_out;
pub mod filter;
pub mod merge;
pub mod retriever;

pub use merge::{merge_candidates, rank_order};
pub use retriever::{HybridRetriever, RequestKeys, Retrieval};
