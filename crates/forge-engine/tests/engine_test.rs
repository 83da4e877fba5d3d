//! Pipeline behaviour under failing models, failing stores, cancellation,
//! caller-supplied plans, and SQLite-backed stores.

use std::sync::Arc;
use std::time::Duration;

use forge_core::errors::{ForgeError, SynthesisError};
use forge_core::models::{
    CandidateOrigin, ComponentType, Correction, IntegrationIntent, IntentCategory, Outcome,
    Provenance, SynthesisRequest,
};
use forge_core::{CancellationToken, ForgeConfig};
use forge_engine::SynthesisEngine;
use forge_fixtures::{
    load_plan, ScriptedModel, ScriptedReply, SlowStore, StoreSnapshot, UnreachableStore,
};
use forge_storage::{InMemoryCorrectionStore, InMemoryPatternStore, PatternEntry};
use serde_json::json;

const TEXT: &str = "Every 5 minutes poll a directory /data/inbound, \
     then call an external service at https://api.partner.example/v1/orders";

fn failing_model() -> Arc<ScriptedModel> {
    Arc::new(ScriptedModel::new(vec![
        ScriptedReply::Fail("overloaded".into()),
        ScriptedReply::Text("not json".into()),
    ]))
}

#[tokio::test]
async fn model_failure_uses_keyword_fallback_plan() {
    let model = failing_model();
    let engine = SynthesisEngine::builder()
        .model(model.clone())
        .correction_store(Arc::new(InMemoryCorrectionStore::new()))
        .build()
        .unwrap();

    let output = engine
        .synthesize(&SynthesisRequest::new(TEXT, "F-1"), &CancellationToken::new())
        .await
        .unwrap();
    assert!(output.used_fallback_plan);
    assert_eq!(model.call_count(), 2);
    assert_eq!(output.graph.nodes.len(), 3);
    assert!(output
        .degradations
        .iter()
        .any(|d| d.fallback_used == "keyword-fallback"));
    assert_eq!(output.summary.template_count, 3);
}

#[tokio::test]
async fn unreachable_and_slow_stores_degrade_gracefully() {
    let stores = StoreSnapshot::load("baseline").seed().await;
    let mut config = ForgeConfig::default();
    config.retrieval.store_timeout_ms = 50;

    let engine = SynthesisEngine::builder()
        .config(config)
        .model(Arc::new(ScriptedModel::always(load_plan("plans/poll_then_call.json"))))
        .pattern_store(stores.patterns.clone())
        .store(Arc::new(UnreachableStore::new(CandidateOrigin::CorrectionHistory)))
        .store(Arc::new(SlowStore::new(
            stores.semantic.clone(),
            Duration::from_secs(5),
        )))
        .build()
        .unwrap();

    let output = engine
        .synthesize(&SynthesisRequest::new(TEXT, "F-1"), &CancellationToken::new())
        .await
        .unwrap();
    let skipped: Vec<_> = output
        .degradations
        .iter()
        .filter(|d| d.fallback_used == "omit-store")
        .collect();
    // One event per store per intent.
    assert_eq!(skipped.len(), 2 * 3);
    assert!(skipped.iter().all(|d| d.component.starts_with("retrieval/")));

    let invocation = output
        .graph
        .nodes
        .iter()
        .find(|n| n.component_type == ComponentType::Invocation)
        .unwrap();
    assert_eq!(invocation.provenance, Provenance::Retrieved);
}

#[tokio::test]
async fn cancelled_request_returns_no_graph() {
    let model = Arc::new(ScriptedModel::always(load_plan("plans/poll_then_call.json")));
    let engine = SynthesisEngine::builder().model(model.clone()).build().unwrap();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = engine
        .synthesize(&SynthesisRequest::new(TEXT, "F-1"), &cancel)
        .await
        .unwrap_err();
    assert!(matches!(err, ForgeError::Cancelled));
    assert_eq!(model.call_count(), 0);
}

#[tokio::test]
async fn cancel_during_retrieval_discards_request() {
    let stores = StoreSnapshot::load("baseline").seed().await;
    let engine = SynthesisEngine::builder()
        .model(Arc::new(ScriptedModel::always(load_plan("plans/poll_then_call.json"))))
        .store(Arc::new(SlowStore::new(
            stores.ground_truth.clone(),
            Duration::from_millis(200),
        )))
        .build()
        .unwrap();
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        trigger.cancel();
    });

    let err = engine
        .synthesize(&SynthesisRequest::new(TEXT, "F-1"), &cancel)
        .await
        .unwrap_err();
    assert!(matches!(err, ForgeError::Cancelled));
}

#[tokio::test]
async fn unknown_caller_intent_becomes_placeholder() {
    let engine = SynthesisEngine::builder()
        .model(failing_model())
        .build()
        .unwrap();
    let intents = vec![
        IntegrationIntent::new(IntentCategory::Trigger, vec![], "every hour", "F-2"),
        IntegrationIntent::new(IntentCategory::Unknown, vec![], "quantum teleport", "F-2"),
        IntegrationIntent::new(IntentCategory::Terminal, vec![], "stop", "F-2"),
    ];

    let output = engine
        .synthesize_intents(&intents, &SynthesisRequest::new("", "F-2"), &CancellationToken::new())
        .await
        .unwrap();
    let placeholder = output
        .graph
        .nodes
        .iter()
        .find(|n| n.component_type == ComponentType::Placeholder)
        .unwrap();
    assert_eq!(placeholder.provenance, Provenance::Template);
    assert!(output
        .degradations
        .iter()
        .any(|d| d.fallback_used == "placeholder-node"));
    assert!(!output.used_fallback_plan);
}

#[tokio::test]
async fn empty_plan_is_rejected() {
    let engine = SynthesisEngine::builder()
        .model(failing_model())
        .build()
        .unwrap();
    let err = engine
        .synthesize_intents(&[], &SynthesisRequest::new("", "F-3"), &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ForgeError::Synthesis(SynthesisError::EmptyPlan)));
}

#[test]
fn builder_requires_model_and_valid_config() {
    assert!(matches!(
        SynthesisEngine::builder().build(),
        Err(ForgeError::Config(_))
    ));

    let mut config = ForgeConfig::default();
    config.retrieval.candidate_cap = 40;
    assert!(SynthesisEngine::builder()
        .model(failing_model())
        .config(config)
        .build()
        .is_err());
}

#[tokio::test]
async fn engine_without_correction_store_has_no_feedback() {
    let engine = SynthesisEngine::builder()
        .model(failing_model())
        .pattern_store(Arc::new(InMemoryPatternStore::new()))
        .build()
        .unwrap();
    assert!(engine.feedback_updater().is_none());
    assert!(engine.feedback_queue().is_none());
}

#[tokio::test]
async fn sqlite_backed_feedback_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("forge.db");
    let plan = load_plan("plans/poll_then_call.json");

    {
        let engine = SynthesisEngine::builder()
            .model(Arc::new(ScriptedModel::always(plan.clone())))
            .sqlite(&path)
            .unwrap()
            .build()
            .unwrap();
        engine
            .feedback_updater()
            .unwrap()
            .apply(&Correction::new(
                "F-db",
                IntentCategory::Transform,
                json!({ "kind": "file-poll", "path": "{{path}}", "recursive": true }),
                Outcome::Success,
            ))
            .await
            .unwrap();
    }

    let engine = SynthesisEngine::builder()
        .model(Arc::new(ScriptedModel::always(plan)))
        .sqlite(&path)
        .unwrap()
        .build()
        .unwrap();
    let output = engine
        .synthesize(&SynthesisRequest::new(TEXT, "F-db"), &CancellationToken::new())
        .await
        .unwrap();
    let transform = output
        .graph
        .nodes
        .iter()
        .find(|n| n.component_type == ComponentType::Transform)
        .unwrap();
    assert_eq!(transform.provenance, Provenance::Corrected);
    assert_eq!(transform.config["path"], json!("/data/inbound"));
    assert_eq!(transform.config["recursive"], json!(true));
    assert_eq!(output.summary.corrected_count, 1);
}

#[tokio::test]
async fn pattern_entry_written_through_engine_updater() {
    let patterns = Arc::new(InMemoryPatternStore::new());
    patterns.insert(PatternEntry::new(
        "gp-x",
        IntentCategory::Transform,
        vec![],
        json!({}),
        0.9,
    ));
    let engine = SynthesisEngine::builder()
        .model(failing_model())
        .correction_store(Arc::new(InMemoryCorrectionStore::new()))
        .pattern_store(patterns.clone())
        .build()
        .unwrap();

    let report = engine
        .feedback_updater()
        .unwrap()
        .apply(
            &Correction::new("F-4", IntentCategory::Transform, json!({}), Outcome::Failure)
                .with_pattern_ref("gp-x"),
        )
        .await
        .unwrap();
    assert!((report.confidence.unwrap().value() - 0.63).abs() < 1e-9);
    assert_eq!(patterns.get("gp-x").unwrap().version, 1);
}

#[tokio::test]
async fn only_correction_and_ground_truth_reachable() {
    let stores = StoreSnapshot::load("baseline").seed().await;
    let engine = SynthesisEngine::builder()
        .model(Arc::new(ScriptedModel::always(load_plan("plans/poll_then_call.json"))))
        .correction_store(stores.corrections.clone())
        .ground_truth_store(stores.ground_truth.clone())
        .store(Arc::new(UnreachableStore::new(CandidateOrigin::GraphPattern)))
        .store(Arc::new(UnreachableStore::new(CandidateOrigin::SemanticNeighbor)))
        .build()
        .unwrap();

    let output = engine
        .synthesize(
            &SynthesisRequest::new(TEXT, "F-legacy-orders"),
            &CancellationToken::new(),
        )
        .await
        .unwrap();
    assert_eq!(output.graph.entry_nodes().len(), 1);
    assert_eq!(output.graph.terminal_nodes().len(), 1);
    let invocation = output
        .graph
        .nodes
        .iter()
        .find(|n| n.component_type == ComponentType::Invocation)
        .unwrap();
    assert_eq!(invocation.config["grounding"]["reference"], json!("gt-orders-post"));
    assert_eq!(invocation.config["method"], json!("POST"));
    assert!(output
        .degradations
        .iter()
        .all(|d| d.component.ends_with("-offline")));
}
