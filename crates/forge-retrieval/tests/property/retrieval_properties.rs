//! Merge invariants: arrival order never changes the ranking, content hashes
//! are unique, tiers are non-decreasing, length never exceeds the cap.

use std::collections::HashSet;

use forge_core::models::{CandidateOrigin, IntentCategory, RetrievalCandidate};
use forge_core::Confidence;
use forge_retrieval::merge_candidates;
use proptest::prelude::*;
use serde_json::json;

fn arb_candidate() -> impl Strategy<Value = RetrievalCandidate> {
    (0usize..4, 0u8..12, 0.0f64..1.0, 0.0f64..1.0).prop_map(|(tier, key, score, conf)| {
        RetrievalCandidate::new(
            json!({ "key": key }),
            CandidateOrigin::ALL[tier],
            IntentCategory::Transform,
            (score * 100.0).round() / 100.0,
        )
        .with_confidence(Confidence::new(conf))
    })
}

proptest! {
    #[test]
    fn merge_is_order_independent(
        mut candidates in prop::collection::vec(arb_candidate(), 0..40),
        cap in 15usize..=20,
    ) {
        let forward = merge_candidates(candidates.clone(), cap);
        candidates.reverse();
        let backward = merge_candidates(candidates, cap);
        prop_assert_eq!(forward, backward);
    }

    #[test]
    fn merge_output_shape(
        candidates in prop::collection::vec(arb_candidate(), 0..40),
        cap in 15usize..=20,
    ) {
        let merged = merge_candidates(candidates, cap);
        prop_assert!(merged.len() <= cap);

        let hashes: HashSet<_> = merged.iter().map(|c| c.content_hash()).collect();
        prop_assert_eq!(hashes.len(), merged.len());

        for pair in merged.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            prop_assert!(a.origin.priority() <= b.origin.priority());
            if a.origin == b.origin {
                prop_assert!(a.score >= b.score);
            }
        }
    }
}
