//! Dedup by content hash, then tiered ranking.
//!
//! Order: source tier (1 first), score descending, confidence descending,
//! content hash ascending. The final key makes the order total, so equal
//! inputs always rank identically regardless of arrival order.

use std::cmp::Ordering;
use std::collections::HashMap;

use forge_core::models::RetrievalCandidate;

pub fn rank_order(a: &RetrievalCandidate, b: &RetrievalCandidate) -> Ordering {
    rank_order_hashed(a, &a.content_hash(), b, &b.content_hash())
}

fn rank_order_hashed(
    a: &RetrievalCandidate,
    a_hash: &str,
    b: &RetrievalCandidate,
    b_hash: &str,
) -> Ordering {
    a.origin
        .priority()
        .cmp(&b.origin.priority())
        .then_with(|| b.score.total_cmp(&a.score))
        .then_with(|| b.confidence.value().total_cmp(&a.confidence.value()))
        .then_with(|| a_hash.cmp(b_hash))
}

/// Deduplicate, rank, truncate to `cap`. Among duplicates the best-ranked
/// copy survives.
pub fn merge_candidates(candidates: Vec<RetrievalCandidate>, cap: usize) -> Vec<RetrievalCandidate> {
    let mut best: HashMap<String, RetrievalCandidate> = HashMap::with_capacity(candidates.len());
    for candidate in candidates {
        let hash = candidate.content_hash();
        match best.get(&hash) {
            Some(existing) if rank_order_hashed(existing, &hash, &candidate, &hash).is_le() => {}
            _ => {
                best.insert(hash, candidate);
            }
        }
    }

    let mut ranked: Vec<(String, RetrievalCandidate)> = best.into_iter().collect();
    ranked.sort_by(|(ha, a), (hb, b)| rank_order_hashed(a, ha, b, hb));
    ranked.truncate(cap);
    ranked.into_iter().map(|(_, c)| c).collect()
}
