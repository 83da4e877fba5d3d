//! Consistency validator and repairer.
//!
//! Runs in order: (a) dangling edges, (c) single-node repairs, (b) exactly
//! one entry and one terminal, (d) external-call trio wiring, then
//! acyclicity and entry-to-terminal coverage. Repairs are recorded as
//! issues with `repaired = true`; anything else fails the request.

use std::collections::{BTreeMap, HashSet};

use serde_json::Value;
use tracing::{debug, info, warn};

use forge_core::errors::SynthesisError;
use forge_core::models::{
    ComponentSpec, ComponentType, Edge, EdgeKind, FlowGraph, IssueKind, ValidationIssue,
};

use crate::index::FlowIndex;
use crate::layout;

/// Validated graph plus the repairs that made it valid.
#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub graph: FlowGraph,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn repaired_count(&self) -> usize {
        self.issues.iter().filter(|i| i.repaired).count()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ConsistencyValidator;

fn is_trio_member(node: &ComponentSpec) -> bool {
    matches!(
        node.component_type,
        ComponentType::Invocation | ComponentType::Channel | ComponentType::Endpoint
    )
}

impl ConsistencyValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(&self, mut graph: FlowGraph) -> Result<ValidationReport, SynthesisError> {
        if graph.nodes.is_empty() {
            return Err(SynthesisError::failed("graph has no nodes", vec![], vec![]));
        }
        let mut issues = Vec::new();

        drop_dangling_edges(&mut graph, &mut issues);
        drop_orphans(&mut graph, &mut issues);
        repair_extra_terminal(&mut graph, &mut issues);
        repair_extra_entry(&mut graph, &mut issues);

        for issue in &issues {
            info!(kind = ?issue.kind, nodes = ?issue.node_ids, detail = %issue.detail, "graph repaired");
        }
        check_entry_and_terminal(&graph)
            .and_then(|()| check_trios(&graph))
            .and_then(|()| check_paths(&graph))
            .inspect_err(|e| warn!(error = %e, "graph failed validation"))?;

        layout::assign_layers(&mut graph);
        info!(
            nodes = graph.nodes.len(),
            edges = graph.edges.len(),
            repairs = issues.len(),
            "graph validated"
        );
        Ok(ValidationReport { graph, issues })
    }
}

/// (a) Remove edges that reference a missing node.
fn drop_dangling_edges(graph: &mut FlowGraph, issues: &mut Vec<ValidationIssue>) {
    let ids: HashSet<String> = graph.nodes.iter().map(|n| n.id.clone()).collect();
    let (kept, dangling): (Vec<Edge>, Vec<Edge>) = std::mem::take(&mut graph.edges)
        .into_iter()
        .partition(|e| ids.contains(&e.source_id) && ids.contains(&e.target_id));
    graph.edges = kept;

    for edge in dangling {
        let present: Vec<String> = [&edge.source_id, &edge.target_id]
            .into_iter()
            .filter(|id| ids.contains(id.as_str()))
            .cloned()
            .collect();
        issues.push(ValidationIssue::repaired(
            IssueKind::DanglingEdge,
            present,
            format!(
                "dropped edge {} ({} -> {})",
                edge.id, edge.source_id, edge.target_id
            ),
        ));
    }
}

/// (c) A node with no edges at all is dropped, as long as something
/// connected remains.
fn drop_orphans(graph: &mut FlowGraph, issues: &mut Vec<ValidationIssue>) {
    if graph.edges.is_empty() {
        return;
    }
    let orphans: Vec<String> = graph
        .nodes
        .iter()
        .filter(|n| graph.in_degree(&n.id) == 0 && graph.out_degree(&n.id) == 0)
        .map(|n| n.id.clone())
        .collect();
    for id in orphans {
        graph.remove_node(&id);
        issues.push(ValidationIssue::repaired(
            IssueKind::OrphanNode,
            vec![id.clone()],
            format!("dropped orphan node {id}"),
        ));
    }
}

fn next_repair_id(graph: &FlowGraph) -> String {
    let taken: HashSet<&str> = graph.edges.iter().map(|e| e.id.as_str()).collect();
    (0..)
        .map(|n| format!("r{n:04}"))
        .find(|id| !taken.contains(id.as_str()))
        .unwrap_or_default()
}

/// Highest-order node first for terminals, lowest-order first for entries.
fn by_order<'a>(graph: &'a FlowGraph, ids: &[&'a str]) -> Vec<&'a ComponentSpec> {
    let mut nodes: Vec<&ComponentSpec> = ids.iter().filter_map(|id| graph.node(id)).collect();
    nodes.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));
    nodes
}

/// (c) A single non-terminal node missing its outgoing edge is connected to
/// the nearest later node that is not one of its ancestors. The designated
/// terminal is the highest-order dead end.
fn repair_extra_terminal(graph: &mut FlowGraph, issues: &mut Vec<ValidationIssue>) {
    let terminals = graph.terminal_nodes();
    if terminals.len() != 2 {
        return;
    }
    let ordered = by_order(graph, &terminals);
    let dead_end = ordered[0];
    if is_trio_member(dead_end) {
        return;
    }
    let ancestors = FlowIndex::from_graph(graph).ancestors(&dead_end.id);
    let target = graph
        .nodes
        .iter()
        .filter(|n| n.order > dead_end.order && !ancestors.contains(&n.id))
        .min_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));

    if let Some(target) = target {
        let (source, target) = (dead_end.id.clone(), target.id.clone());
        let edge = Edge::new(next_repair_id(graph), EdgeKind::Sequence, &source, &target);
        debug!(source = %source, target = %target, "synthesized missing outgoing edge");
        graph.edges.push(edge);
        issues.push(ValidationIssue::repaired(
            IssueKind::MissingOutgoing,
            vec![source.clone()],
            format!("added sequence edge {source} -> {target}"),
        ));
    }
}

/// (c) A single non-entry node missing its incoming edge is fed from the
/// nearest earlier node that is not one of its descendants. The designated
/// entry is the lowest-order source.
fn repair_extra_entry(graph: &mut FlowGraph, issues: &mut Vec<ValidationIssue>) {
    let entries = graph.entry_nodes();
    if entries.len() != 2 {
        return;
    }
    let ordered = by_order(graph, &entries);
    let stray = ordered[1];
    if is_trio_member(stray) {
        return;
    }
    let descendants = FlowIndex::from_graph(graph).descendants(&stray.id);
    let source = graph
        .nodes
        .iter()
        .filter(|n| n.order < stray.order && !descendants.contains(&n.id))
        .max_by(|a, b| a.order.cmp(&b.order).then_with(|| b.id.cmp(&a.id)));

    if let Some(source) = source {
        let (source, target) = (source.id.clone(), stray.id.clone());
        let edge = Edge::new(next_repair_id(graph), EdgeKind::Sequence, &source, &target);
        debug!(source = %source, target = %target, "synthesized missing incoming edge");
        graph.edges.push(edge);
        issues.push(ValidationIssue::repaired(
            IssueKind::MissingIncoming,
            vec![target.clone()],
            format!("added sequence edge {source} -> {target}"),
        ));
    }
}

/// (b) Exactly one entry and one terminal.
fn check_entry_and_terminal(graph: &FlowGraph) -> Result<(), SynthesisError> {
    let entries = graph.entry_nodes();
    if entries.len() != 1 {
        return Err(SynthesisError::failed(
            format!("expected exactly one entry node, found {}", entries.len()),
            entries.iter().map(|s| s.to_string()).collect(),
            vec![],
        ));
    }
    let terminals = graph.terminal_nodes();
    if terminals.len() != 1 {
        return Err(SynthesisError::failed(
            format!("expected exactly one terminal node, found {}", terminals.len()),
            terminals.iter().map(|s| s.to_string()).collect(),
            vec![],
        ));
    }
    Ok(())
}

/// (d) Every trio is complete, shares one correlation id, and is wired
/// invocation -channel-> channel -channel-> endpoint with nothing else
/// touching the channel node.
fn check_trios(graph: &FlowGraph) -> Result<(), SynthesisError> {
    let mut trios: BTreeMap<&str, Vec<&ComponentSpec>> = BTreeMap::new();
    for node in graph.nodes.iter().filter(|n| is_trio_member(n)) {
        let Some(correlation) = node.correlation_id.as_deref() else {
            return Err(SynthesisError::failed(
                format!("{} node has no correlation id", node.component_type),
                vec![node.id.clone()],
                vec![],
            ));
        };
        trios.entry(correlation).or_default().push(node);
    }

    for (correlation, members) in trios {
        check_trio(graph, correlation, &members)?;
    }
    Ok(())
}

fn check_trio(graph: &FlowGraph, correlation: &str, members: &[&ComponentSpec]) -> Result<(), SynthesisError> {
    let member_ids: Vec<String> = members.iter().map(|n| n.id.clone()).collect();
    let of_type = |t: ComponentType| {
        members
            .iter()
            .copied()
            .filter(move |n| n.component_type == t)
            .collect::<Vec<_>>()
    };
    let (invocations, channels, endpoints) = (
        of_type(ComponentType::Invocation),
        of_type(ComponentType::Channel),
        of_type(ComponentType::Endpoint),
    );
    if invocations.len() != 1 || channels.len() != 1 || endpoints.len() != 1 {
        return Err(SynthesisError::failed(
            format!(
                "trio {correlation} has {} invocation, {} channel, {} endpoint node(s)",
                invocations.len(),
                channels.len(),
                endpoints.len()
            ),
            member_ids,
            vec![],
        ));
    }
    let (invocation, channel, endpoint) = (invocations[0], channels[0], endpoints[0]);

    if members.iter().any(|n| n.intent_index != invocation.intent_index) {
        return Err(SynthesisError::failed(
            format!("trio {correlation} is split across intents"),
            member_ids,
            vec![],
        ));
    }

    let incoming: Vec<&Edge> = graph.incoming(&channel.id).collect();
    let outgoing: Vec<&Edge> = graph.outgoing(&channel.id).collect();
    let wired = incoming.len() == 1
        && outgoing.len() == 1
        && incoming[0].source_id == invocation.id
        && incoming[0].kind == EdgeKind::Channel
        && outgoing[0].target_id == endpoint.id
        && outgoing[0].kind == EdgeKind::Channel;
    let edge_ids = || {
        incoming
            .iter()
            .chain(outgoing.iter())
            .map(|e| e.id.clone())
            .collect::<Vec<_>>()
    };
    if !wired {
        return Err(SynthesisError::failed(
            format!("trio {correlation} is not wired invocation -> channel -> endpoint"),
            member_ids,
            edge_ids(),
        ));
    }

    let references = |key: &str, expected: &str| {
        channel.config.get(key).and_then(Value::as_str) == Some(expected)
    };
    if !references("source", &invocation.id) || !references("target", &endpoint.id) {
        return Err(SynthesisError::failed(
            format!("trio {correlation} channel config does not reference its invocation and endpoint"),
            member_ids,
            edge_ids(),
        ));
    }
    Ok(())
}

/// No cycles, and every node lies on an entry-to-terminal path.
fn check_paths(graph: &FlowGraph) -> Result<(), SynthesisError> {
    let index = FlowIndex::from_graph(graph);
    if let Some(cycle) = index.find_cycles().into_iter().next() {
        return Err(SynthesisError::failed("graph contains a cycle", cycle, vec![]));
    }

    let (Some(entry), Some(terminal)) = (
        graph.entry_nodes().first().copied(),
        graph.terminal_nodes().first().copied(),
    ) else {
        return Err(SynthesisError::failed("graph has no entry or terminal", vec![], vec![]));
    };
    let from_entry = index.descendants(entry);
    let to_terminal = index.ancestors(terminal);
    let stranded: Vec<String> = graph
        .nodes
        .iter()
        .filter(|n| !from_entry.contains(&n.id) || !to_terminal.contains(&n.id))
        .map(|n| n.id.clone())
        .collect();
    if !stranded.is_empty() {
        return Err(SynthesisError::failed(
            "nodes not on any entry-to-terminal path",
            stranded,
            vec![],
        ));
    }
    Ok(())
}
