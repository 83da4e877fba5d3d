//! Any model plan over the vocabulary yields a valid, reproducible graph
//! against the baseline stores.

use std::sync::Arc;

use forge_core::models::{IntentCategory, SynthesisRequest};
use forge_core::CancellationToken;
use forge_engine::SynthesisEngine;
use forge_fixtures::{ScriptedModel, StoreSnapshot};
use proptest::prelude::*;
use serde_json::json;

const TEXTS: [&str; 4] = [
    "every 5 minutes",
    "poll a directory /data/inbound",
    "call https://api.partner.example/v1/orders",
    "if amount > 1000 route to approval",
];

fn arb_plan() -> impl Strategy<Value = String> {
    prop::collection::vec(
        (0usize..IntentCategory::VOCABULARY.len(), 0usize..TEXTS.len()),
        1..6,
    )
    .prop_map(|items| {
        let intents: Vec<_> = items
            .into_iter()
            .map(|(c, t)| {
                json!({
                    "category": IntentCategory::VOCABULARY[c].as_str(),
                    "keywords": [],
                    "text": TEXTS[t],
                })
            })
            .collect();
        json!({ "intents": intents }).to_string()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn every_plan_synthesizes_a_valid_graph(plan in arb_plan()) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let (first, second) = runtime.block_on(async {
            let stores = StoreSnapshot::load("baseline").seed().await;
            let engine = SynthesisEngine::builder()
                .model(Arc::new(ScriptedModel::always(plan.clone())))
                .correction_store(stores.corrections.clone())
                .ground_truth_store(stores.ground_truth.clone())
                .pattern_store(stores.patterns.clone())
                .semantic_store(stores.semantic.clone())
                .build()
                .unwrap();
            let request = SynthesisRequest::new("generated", "F-prop");
            let first = engine.synthesize(&request, &CancellationToken::new()).await.unwrap();
            let second = engine.synthesize(&request, &CancellationToken::new()).await.unwrap();
            (first, second)
        });

        prop_assert!(!first.used_fallback_plan);
        prop_assert!(first.issues.is_empty());
        prop_assert_eq!(first.graph.entry_nodes().len(), 1);
        prop_assert_eq!(first.graph.terminal_nodes().len(), 1);
        let summary = first.summary;
        prop_assert_eq!(
            summary.template_count + summary.retrieved_count + summary.corrected_count,
            first.graph.nodes.len()
        );
        prop_assert_eq!(first.graph.topology_signature(), second.graph.topology_signature());
        prop_assert_eq!(first.graph, second.graph);
    }
}
