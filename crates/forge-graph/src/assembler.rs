//! GraphAssembler: groups -> one connected flow graph.
//!
//! Each group is wired internally per its shape, then every exit of a group
//! is sequence-connected to the first node of the next group. Branch arms
//! therefore reconverge on whatever follows the branch; a trailing branch
//! gets a synthesized `merge` node to reconverge on.

use serde_json::json;
use tracing::debug;

use forge_core::models::{ComponentSpec, ComponentType, Edge, EdgeKind, FlowGraph, Provenance};
use forge_synthesis::ids::{node_id, order};
use forge_synthesis::{ComponentGroup, GroupShape};

use crate::layout;

#[derive(Debug, Default)]
struct EdgeSink {
    edges: Vec<Edge>,
}

impl EdgeSink {
    fn push(&mut self, kind: EdgeKind, source: &str, target: &str, label: Option<&str>) {
        let mut edge = Edge::new(format!("e{:04}", self.edges.len()), kind, source, target);
        edge.label = label.map(str::to_string);
        self.edges.push(edge);
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GraphAssembler;

impl GraphAssembler {
    pub fn new() -> Self {
        Self
    }

    pub fn assemble(&self, groups: &[ComponentGroup]) -> FlowGraph {
        let mut nodes: Vec<ComponentSpec> = groups.iter().flat_map(|g| g.nodes.clone()).collect();
        let mut sink = EdgeSink::default();

        for group in groups {
            wire_internal(group, &mut sink);
        }

        for pair in groups.windows(2) {
            let (current, next) = (&pair[0], &pair[1]);
            for exit in current.exits() {
                sink.push(EdgeKind::Sequence, exit, next.first(), None);
            }
        }

        if let Some(last) = groups.last().filter(|g| g.is_branch()) {
            let merge = merge_node(last);
            for exit in last.exits() {
                sink.push(EdgeKind::Sequence, exit, &merge.id, None);
            }
            nodes.push(merge);
        }

        let mut graph = FlowGraph {
            nodes,
            edges: sink.edges,
            layout: Default::default(),
        };
        layout::assign_layers(&mut graph);

        debug!(
            groups = groups.len(),
            nodes = graph.nodes.len(),
            edges = graph.edges.len(),
            "graph assembled"
        );
        graph
    }
}

fn wire_internal(group: &ComponentGroup, sink: &mut EdgeSink) {
    match &group.shape {
        GroupShape::Single { .. } => {}
        GroupShape::Trio {
            invocation,
            channel,
            endpoint,
        } => {
            sink.push(EdgeKind::Channel, invocation, channel, None);
            sink.push(EdgeKind::Channel, channel, endpoint, None);
        }
        GroupShape::Branch { decision, arms } => {
            for arm in arms {
                sink.push(EdgeKind::Sequence, decision, &arm.node, Some(&arm.condition));
            }
        }
    }
}

/// Reconvergence node appended after a trailing branch. Its id continues the
/// branch group's node numbering.
fn merge_node(branch: &ComponentGroup) -> ComponentSpec {
    let index = branch.nodes.len();
    ComponentSpec {
        id: node_id(branch.intent_index, index),
        component_type: ComponentType::Merge,
        name: ComponentType::Merge.as_str().to_string(),
        config: json!({ "kind": "merge", "inputs": branch.exits() }),
        provenance: Provenance::Template,
        order: order(branch.intent_index, index),
        intent_index: branch.intent_index,
        correlation_id: None,
    }
}
