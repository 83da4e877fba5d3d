//! Layered layout: rank = longest-path depth from the entry. Placement hint only.

use forge_core::models::FlowGraph;

use crate::index::FlowIndex;

/// Recompute `graph.layout`. Cleared when the graph is cyclic.
pub fn assign_layers(graph: &mut FlowGraph) {
    graph.layout = FlowIndex::from_graph(graph).depths().unwrap_or_default();
}
