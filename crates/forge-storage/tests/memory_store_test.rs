//! In-memory stores under concurrent writers, plus EMA properties.

use std::sync::Arc;

use forge_core::models::{IntentCategory, Outcome};
use forge_core::traits::{ConfidenceUpdate, PatternStore, WriteMode};
use forge_core::Confidence;
use forge_storage::{InMemoryPatternStore, PatternEntry};
use proptest::prelude::*;
use serde_json::json;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_last_writer_wins_counts_every_update() {
    let store = Arc::new(InMemoryPatternStore::new());
    store.insert(PatternEntry::new(
        "P",
        IntentCategory::Transform,
        vec![],
        json!({}),
        0.5,
    ));

    let mut handles = Vec::new();
    for i in 0..16 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            store
                .update(&ConfidenceUpdate {
                    pattern_id: "P".into(),
                    outcome: Outcome::from(i % 2 == 0),
                    alpha: 0.3,
                    mode: WriteMode::LastWriterWins,
                })
                .await
                .unwrap();
        }));
    }
    for h in handles {
        h.await.unwrap();
    }

    let entry = store.get("P").unwrap();
    assert_eq!(entry.version, 16);
    assert_eq!(entry.success_count, 8);
    assert_eq!(entry.failure_count, 8);
}

proptest! {
    #[test]
    fn ema_stays_in_unit_interval(old in 0.0f64..=1.0, success in any::<bool>(), alpha in 0.0f64..=1.0) {
        let outcome = Outcome::from(success).value();
        let new = Confidence::new(old).ema(outcome, alpha).value();
        prop_assert!((0.0..=1.0).contains(&new));
        // Moves toward the outcome, never past it.
        if success {
            prop_assert!(new >= old - 1e-12);
        } else {
            prop_assert!(new <= old + 1e-12);
        }
    }
}
