//! FeedbackQueue: acknowledgement, ordered draining, shutdown totals.

use std::sync::Arc;

use forge_core::config::LearningConfig;
use forge_core::errors::LearningError;
use forge_core::models::{Correction, IntentCategory, Outcome};
use forge_fixtures::ContendedPatternStore;
use forge_learning::{FeedbackQueue, FeedbackUpdater};
use forge_storage::{InMemoryCorrectionStore, InMemoryPatternStore, PatternEntry};
use serde_json::json;

fn updater(
    corrections: Arc<InMemoryCorrectionStore>,
    patterns: Arc<ContendedPatternStore>,
) -> Arc<FeedbackUpdater> {
    Arc::new(FeedbackUpdater::new(
        corrections,
        Some(patterns),
        &LearningConfig::default(),
    ))
}

fn contended(conflicts: u32) -> Arc<ContendedPatternStore> {
    let inner = InMemoryPatternStore::new();
    inner.insert(PatternEntry::new(
        "gp",
        IntentCategory::Transform,
        vec![],
        json!({}),
        0.5,
    ));
    Arc::new(ContendedPatternStore::new(Arc::new(inner), conflicts))
}

fn correction(n: u32, outcome: Outcome) -> Correction {
    Correction::new(
        format!("F-{n}"),
        IntentCategory::Transform,
        json!({ "n": n }),
        outcome,
    )
    .with_pattern_ref("gp")
}

#[tokio::test]
async fn submitted_events_are_applied_before_shutdown_returns() {
    let corrections = Arc::new(InMemoryCorrectionStore::new());
    let patterns = contended(0);
    let queue = FeedbackQueue::start(updater(corrections.clone(), patterns.clone()), 16);

    let mut ids = Vec::new();
    for n in 0..5 {
        ids.push(queue.submit(correction(n, Outcome::Success)).unwrap().event_id);
    }
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 5);

    let stats = queue.shutdown().await;
    assert_eq!(stats.processed, 5);
    assert_eq!(stats.failed, 0);
    assert_eq!(corrections.len(), 5);
    assert_eq!(patterns.inner().get("gp").unwrap().version, 5);
}

#[tokio::test]
async fn contention_is_counted_not_failed() {
    let corrections = Arc::new(InMemoryCorrectionStore::new());
    let patterns = contended(3);
    let queue = FeedbackQueue::start(updater(corrections, patterns.clone()), 4);

    queue.submit(correction(1, Outcome::Failure)).unwrap();
    let stats = queue.shutdown().await;
    assert_eq!(stats.processed, 1);
    assert_eq!(stats.lww_fallbacks, 1);
    assert_eq!(patterns.lww_writes(), 1);
}

#[tokio::test]
async fn invalid_correction_counts_as_failed() {
    let queue = FeedbackQueue::start(
        updater(Arc::new(InMemoryCorrectionStore::new()), contended(0)),
        4,
    );
    let mut bad = correction(1, Outcome::Success);
    bad.fingerprint.clear();
    queue.submit(bad).unwrap();
    queue.submit(correction(2, Outcome::Success)).unwrap();

    let stats = queue.shutdown().await;
    assert_eq!(stats.failed, 1);
    assert_eq!(stats.processed, 1);
}

#[tokio::test(flavor = "current_thread")]
async fn full_queue_rejects_without_blocking() {
    // The worker cannot run until this task yields, so the channel fills.
    let queue = FeedbackQueue::start(
        updater(Arc::new(InMemoryCorrectionStore::new()), contended(0)),
        2,
    );
    queue.submit(correction(1, Outcome::Success)).unwrap();
    queue.submit(correction(2, Outcome::Success)).unwrap();
    let err = queue.submit(correction(3, Outcome::Success)).unwrap_err();
    assert!(matches!(err, LearningError::QueueFull { capacity: 2 }));
    assert_eq!(queue.pending(), 2);

    let stats = queue.shutdown().await;
    assert_eq!(stats.processed, 2);
}
