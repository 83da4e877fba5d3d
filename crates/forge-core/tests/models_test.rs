use forge_core::models::*;
use forge_core::Confidence;
use proptest::prelude::*;
use serde_json::json;

fn node(id: &str, order: u32, provenance: Provenance) -> ComponentSpec {
    ComponentSpec {
        id: id.to_string(),
        component_type: ComponentType::Transform,
        name: id.to_string(),
        config: json!({}),
        provenance,
        order,
        intent_index: 0,
        correlation_id: None,
    }
}

#[test]
fn category_vocabulary_is_strict() {
    assert_eq!(
        IntentCategory::from_label("external-call"),
        Some(IntentCategory::ExternalCall)
    );
    assert_eq!(
        IntentCategory::from_label("Conditional_Branch"),
        Some(IntentCategory::ConditionalBranch)
    );
    assert_eq!(IntentCategory::from_label("unknown"), None);
    assert_eq!(IntentCategory::from_label("webhook"), None);
}

#[test]
fn category_serde_uses_kebab_case_and_catch_all() {
    let json = serde_json::to_string(&IntentCategory::ErrorHandler).unwrap();
    assert_eq!(json, "\"error-handler\"");
    let parsed: IntentCategory = serde_json::from_str("\"smoke-signal\"").unwrap();
    assert_eq!(parsed, IntentCategory::Unknown);
}

#[test]
fn origin_order_is_priority_order() {
    let mut origins = vec![
        CandidateOrigin::SemanticNeighbor,
        CandidateOrigin::CorrectionHistory,
        CandidateOrigin::GraphPattern,
        CandidateOrigin::GroundTruth,
    ];
    origins.sort();
    assert_eq!(origins, CandidateOrigin::ALL.to_vec());
    for (i, o) in CandidateOrigin::ALL.iter().enumerate() {
        assert_eq!(o.priority() as usize, i + 1);
    }
}

#[test]
fn content_hash_ignores_key_order() {
    let a = RetrievalCandidate::new(
        json!({"a": 1, "b": 2}),
        CandidateOrigin::GroundTruth,
        IntentCategory::Transform,
        1.0,
    );
    let b = RetrievalCandidate::new(
        json!({"b": 2, "a": 1}),
        CandidateOrigin::SemanticNeighbor,
        IntentCategory::Transform,
        0.1,
    );
    assert_eq!(a.content_hash(), b.content_hash());
}

#[test]
fn provenance_follows_origin() {
    assert_eq!(
        Provenance::from_origin(Some(CandidateOrigin::CorrectionHistory)),
        Provenance::Corrected
    );
    assert_eq!(
        Provenance::from_origin(Some(CandidateOrigin::SemanticNeighbor)),
        Provenance::Retrieved
    );
    assert_eq!(Provenance::from_origin(None), Provenance::Template);
}

#[test]
fn entry_and_terminal_detection() {
    let mut graph = FlowGraph::new();
    graph.nodes = vec![
        node("a", 0, Provenance::Template),
        node("b", 1, Provenance::Retrieved),
        node("c", 2, Provenance::Corrected),
    ];
    graph.edges = vec![
        Edge::new("e1", EdgeKind::Sequence, "a", "b"),
        Edge::new("e2", EdgeKind::Sequence, "b", "c"),
    ];
    assert_eq!(graph.entry_nodes(), vec!["a"]);
    assert_eq!(graph.terminal_nodes(), vec!["c"]);

    let summary = ProvenanceSummary::from_graph(&graph);
    assert_eq!(
        (summary.template_count, summary.retrieved_count, summary.corrected_count),
        (1, 1, 1)
    );

    graph.remove_node("b");
    assert!(graph.edges.is_empty());
    assert_eq!(graph.entry_nodes(), vec!["a", "c"]);
}

#[test]
fn store_query_merges_prior_reference() {
    let intent = IntegrationIntent::new(
        IntentCategory::Trigger,
        vec!["poll".into()],
        "poll a directory",
        "F1",
    );
    let q = StoreQuery::for_intent(&intent, 10)
        .with_prior_corrections(Some("F0"))
        .with_prior_corrections(Some("F1"));
    assert_eq!(q.fingerprints, vec!["F1".to_string(), "F0".to_string()]);
    assert!(q.matches_fingerprint("F0"));
    assert_eq!(q.text, "poll poll a directory");
}

proptest! {
    #[test]
    fn confidence_always_in_unit_range(v in -10.0f64..10.0, outcome in 0.0f64..=1.0, alpha in 0.01f64..=1.0) {
        let c = Confidence::new(v).ema(outcome, alpha);
        prop_assert!((0.0..=1.0).contains(&c.value()));
    }
}
