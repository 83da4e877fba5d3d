//! Expansion rules: single nodes, the external-call trio, branch arms with a
//! mandatory default, provenance, placeholder substitution.

use forge_core::models::{
    CandidateOrigin, ComponentType, IntegrationIntent, IntentCategory, Provenance,
    RetrievalCandidate,
};
use forge_synthesis::{ComponentSynthesizer, GroupShape, MAX_BRANCH_CONDITIONS};
use serde_json::json;

fn intent(category: IntentCategory, text: &str) -> IntegrationIntent {
    IntegrationIntent::new(category, vec!["poll".into()], text, "F")
}

fn candidate(origin: CandidateOrigin, category: IntentCategory, content: serde_json::Value) -> RetrievalCandidate {
    RetrievalCandidate::new(content, origin, category, 0.9).with_reference("ref-1")
}

#[test]
fn simple_intent_is_one_node_with_substituted_config() {
    let synth = ComponentSynthesizer::new();
    let candidates = vec![candidate(
        CandidateOrigin::GraphPattern,
        IntentCategory::Trigger,
        json!({"kind": "scheduler", "schedule": "{{schedule}}"}),
    )];
    let (group, degradation) = synth.synthesize(
        0,
        &intent(IntentCategory::Trigger, "every 5 minutes"),
        &candidates,
    );

    assert!(degradation.is_none());
    assert_eq!(group.nodes.len(), 1);
    let node = &group.nodes[0];
    assert_eq!(node.id, "i000.n00");
    assert_eq!(node.component_type, ComponentType::Trigger);
    assert_eq!(node.provenance, Provenance::Retrieved);
    assert_eq!(node.config["schedule"], json!("PT5M"));
    assert_eq!(node.config["grounding"]["reference"], json!("ref-1"));
}

#[test]
fn no_candidates_means_template_provenance() {
    let (group, _) = ComponentSynthesizer::new().synthesize(
        3,
        &intent(IntentCategory::Transform, "uppercase names"),
        &[],
    );
    assert_eq!(group.nodes[0].provenance, Provenance::Template);
    assert_eq!(group.nodes[0].config["script"], json!("uppercase names"));
    assert!(group.nodes[0].config.get("grounding").is_none());
}

#[test]
fn correction_candidate_means_corrected_provenance() {
    let candidates = vec![candidate(
        CandidateOrigin::CorrectionHistory,
        IntentCategory::ExternalCall,
        json!({"invocation": {"url": "https://fixed.example"}}),
    )];
    let (group, _) = ComponentSynthesizer::new().synthesize(
        1,
        &intent(IntentCategory::ExternalCall, "call the partner"),
        &candidates,
    );
    assert!(group
        .nodes
        .iter()
        .all(|n| n.provenance == Provenance::Corrected));
    assert_eq!(group.nodes[0].config["url"], json!("https://fixed.example"));
}

#[test]
fn external_call_expands_to_cross_referenced_trio() {
    let (group, _) = ComponentSynthesizer::new().synthesize(
        2,
        &intent(IntentCategory::ExternalCall, "post to https://api.example.com/orders"),
        &[],
    );
    assert_eq!(group.nodes.len(), 3);
    let types: Vec<_> = group.nodes.iter().map(|n| n.component_type).collect();
    assert_eq!(
        types,
        vec![ComponentType::Invocation, ComponentType::Channel, ComponentType::Endpoint]
    );
    assert!(group
        .nodes
        .iter()
        .all(|n| n.correlation_id.as_deref() == Some("corr-002")));

    let GroupShape::Trio { invocation, channel, endpoint } = &group.shape else {
        panic!("expected trio shape");
    };
    let channel_node = group.nodes.iter().find(|n| &n.id == channel).unwrap();
    assert_eq!(channel_node.config["source"], json!(invocation));
    assert_eq!(channel_node.config["target"], json!(endpoint));
    assert_eq!(group.nodes[0].config["target"], json!("https://api.example.com/orders"));
    assert_eq!(group.first(), invocation);
    assert_eq!(group.exits(), vec![endpoint.as_str()]);
}

#[test]
fn branch_has_explicit_arms_plus_default() {
    let (group, _) = ComponentSynthesizer::new().synthesize(
        1,
        &intent(
            IntentCategory::ConditionalBranch,
            "if amount > 1000 route to approval, if region is EU route to compliance",
        ),
        &[],
    );
    let GroupShape::Branch { decision, arms } = &group.shape else {
        panic!("expected branch shape");
    };
    assert_eq!(decision, "i001.n00");
    assert_eq!(arms.len(), 3);
    assert_eq!(arms[0].condition, "amount > 1000");
    assert_eq!(arms[1].condition, "region is EU");
    assert!(arms[2].is_default);
    assert_eq!(arms.iter().filter(|a| a.is_default).count(), 1);
    assert!(group.nodes[1..]
        .iter()
        .all(|n| n.component_type == ComponentType::Route));
}

#[test]
fn branch_without_conditions_still_has_default_arm() {
    let (group, _) = ComponentSynthesizer::new().synthesize(
        0,
        &intent(IntentCategory::ConditionalBranch, "route orders somewhere"),
        &[],
    );
    let GroupShape::Branch { arms, .. } = &group.shape else {
        panic!("expected branch shape");
    };
    assert_eq!(arms.len(), 1);
    assert!(arms[0].is_default);
}

#[test]
fn branch_conditions_fall_back_to_candidate() {
    let candidates = vec![candidate(
        CandidateOrigin::GroundTruth,
        IntentCategory::ConditionalBranch,
        json!({"kind": "choice", "conditions": ["status == 'new'", "otherwise"]}),
    )];
    let (group, _) = ComponentSynthesizer::new().synthesize(
        0,
        &intent(IntentCategory::ConditionalBranch, "route by status"),
        &candidates,
    );
    let GroupShape::Branch { arms, .. } = &group.shape else {
        panic!("expected branch shape");
    };
    let labels: Vec<_> = arms.iter().map(|a| a.condition.as_str()).collect();
    assert_eq!(labels, vec!["status == 'new'", "otherwise"]);
}

#[test]
fn oversized_branch_keeps_ids_and_orders_unique_and_sorted() {
    let conditions: Vec<String> = (0..120).map(|i| format!("amount > {i}")).collect();
    let candidates = vec![candidate(
        CandidateOrigin::GroundTruth,
        IntentCategory::ConditionalBranch,
        json!({"kind": "choice", "conditions": conditions}),
    )];
    let (group, _) = ComponentSynthesizer::new().synthesize(
        3,
        &intent(IntentCategory::ConditionalBranch, "route by amount"),
        &candidates,
    );
    let GroupShape::Branch { arms, .. } = &group.shape else {
        panic!("expected branch shape");
    };
    assert_eq!(arms.len(), MAX_BRANCH_CONDITIONS + 1);
    assert_eq!(arms[MAX_BRANCH_CONDITIONS - 1].condition, "amount > 97");
    assert!(arms.last().unwrap().is_default);

    let ids: Vec<_> = group.nodes.iter().map(|n| n.id.clone()).collect();
    let mut sorted = ids.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(sorted, ids);
    assert!(group
        .nodes
        .windows(2)
        .all(|pair| pair[0].order < pair[1].order));
    assert_eq!(ids.last().map(String::as_str), Some("i003.n99"));
}

#[test]
fn unknown_category_emits_template_placeholder() {
    let (group, degradation) = ComponentSynthesizer::new().synthesize(
        4,
        &intent(IntentCategory::Unknown, "teleport the files"),
        &[candidate(
            CandidateOrigin::GraphPattern,
            IntentCategory::Unknown,
            json!({"x": 1}),
        )],
    );
    assert_eq!(group.nodes.len(), 1);
    assert_eq!(group.nodes[0].component_type, ComponentType::Placeholder);
    assert_eq!(group.nodes[0].provenance, Provenance::Template);
    assert_eq!(degradation.unwrap().fallback_used, "placeholder-node");
}

#[test]
fn synthesize_all_rejects_empty_plan_and_is_deterministic() {
    let synth = ComponentSynthesizer::new();
    assert!(synth.synthesize_all(&[], &[]).is_err());

    let intents = vec![
        intent(IntentCategory::Trigger, "every 5 minutes"),
        intent(IntentCategory::ExternalCall, "call https://x.example"),
    ];
    let a = synth.synthesize_all(&intents, &[]).unwrap();
    let b = synth.synthesize_all(&intents, &[]).unwrap();
    assert_eq!(a.groups, b.groups);
    assert_eq!(a.node_count(), 4);
}
