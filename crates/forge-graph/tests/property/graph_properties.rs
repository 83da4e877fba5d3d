//! Any synthesized plan assembles into a graph the validator accepts as-is:
//! one entry, one terminal, every edge endpoint present, no repairs needed.

use forge_core::models::{IntegrationIntent, IntentCategory};
use forge_graph::{ConsistencyValidator, GraphAssembler};
use forge_synthesis::ComponentSynthesizer;
use proptest::prelude::*;

const TEXTS: [&str; 5] = [
    "every 10 minutes",
    "poll /data/in for new files",
    "call https://svc.example/api",
    "if total > 10 route to review, when urgent route to pager",
    "write the result",
];

fn arb_intent() -> impl Strategy<Value = IntegrationIntent> {
    (0usize..IntentCategory::VOCABULARY.len(), 0usize..TEXTS.len()).prop_map(|(c, t)| {
        IntegrationIntent::new(IntentCategory::VOCABULARY[c], vec![], TEXTS[t], "F-prop")
    })
}

proptest! {
    #[test]
    fn assembled_graphs_validate_cleanly(
        intents in prop::collection::vec(arb_intent(), 1..8),
    ) {
        let synthesis = ComponentSynthesizer::new().synthesize_all(&intents, &[]).unwrap();
        let graph = GraphAssembler::new().assemble(&synthesis.groups);
        prop_assert!(graph.nodes.len() >= synthesis.node_count());

        let report = ConsistencyValidator::new().validate(graph).unwrap();
        prop_assert!(report.issues.is_empty());
        prop_assert_eq!(report.graph.entry_nodes().len(), 1);
        prop_assert_eq!(report.graph.terminal_nodes().len(), 1);
        for edge in &report.graph.edges {
            prop_assert!(report.graph.contains_node(&edge.source_id));
            prop_assert!(report.graph.contains_node(&edge.target_id));
        }
        prop_assert_eq!(report.graph.layout.len(), report.graph.nodes.len());
    }

    #[test]
    fn synthesis_is_deterministic(
        intents in prop::collection::vec(arb_intent(), 1..8),
    ) {
        let build = || {
            let synthesis = ComponentSynthesizer::new().synthesize_all(&intents, &[]).unwrap();
            GraphAssembler::new().assemble(&synthesis.groups)
        };
        let (a, b) = (build(), build());
        prop_assert_eq!(a.topology_signature(), b.topology_signature());
        prop_assert_eq!(a, b);
    }
}
