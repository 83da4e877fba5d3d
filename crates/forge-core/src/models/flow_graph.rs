//! Arena-style workflow graph: nodes keyed by stable string ids plus an edge list.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use super::{ComponentSpec, Provenance};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    Sequence,
    Channel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub id: String,
    pub kind: EdgeKind,
    pub source_id: String,
    pub target_id: String,
    /// Branch condition for edges leaving a decision arm.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Edge {
    pub fn new(
        id: impl Into<String>,
        kind: EdgeKind,
        source_id: impl Into<String>,
        target_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            source_id: source_id.into(),
            target_id: target_id.into(),
            label: None,
        }
    }
}

/// A connected directed workflow graph.
///
/// Invariant once finalized: one entry (no incoming edge), one terminal (no
/// outgoing edge), every other node has at least one of each.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowGraph {
    pub nodes: Vec<ComponentSpec>,
    pub edges: Vec<Edge>,
    /// Node id → layer rank (topological depth). Placement hint only.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub layout: BTreeMap<String, usize>,
}

impl FlowGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, id: &str) -> Option<&ComponentSpec> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.iter().any(|n| n.id == id)
    }

    pub fn node_ids(&self) -> HashSet<&str> {
        self.nodes.iter().map(|n| n.id.as_str()).collect()
    }

    pub fn incoming<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| e.target_id == id)
    }

    pub fn outgoing<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| e.source_id == id)
    }

    pub fn in_degree(&self, id: &str) -> usize {
        self.incoming(id).count()
    }

    pub fn out_degree(&self, id: &str) -> usize {
        self.outgoing(id).count()
    }

    /// Nodes with no incoming edge, in node order.
    pub fn entry_nodes(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .filter(|n| self.in_degree(&n.id) == 0)
            .map(|n| n.id.as_str())
            .collect()
    }

    /// Nodes with no outgoing edge, in node order.
    pub fn terminal_nodes(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .filter(|n| self.out_degree(&n.id) == 0)
            .map(|n| n.id.as_str())
            .collect()
    }

    /// Remove a node and every edge touching it.
    pub fn remove_node(&mut self, id: &str) -> Option<ComponentSpec> {
        let pos = self.nodes.iter().position(|n| n.id == id)?;
        self.edges.retain(|e| e.source_id != id && e.target_id != id);
        self.layout.remove(id);
        Some(self.nodes.remove(pos))
    }

    /// Count nodes by provenance tag.
    pub fn provenance_counts(&self) -> (usize, usize, usize) {
        self.nodes
            .iter()
            .fold((0, 0, 0), |(t, r, c), n| match n.provenance {
                Provenance::Template => (t + 1, r, c),
                Provenance::Retrieved => (t, r + 1, c),
                Provenance::Corrected => (t, r, c + 1),
            })
    }

    /// Wiring expressed through node `order` instead of ids, sorted.
    /// Two graphs with equal signatures have identical topology regardless
    /// of how their ids were generated.
    pub fn topology_signature(&self) -> Vec<(u32, u32, EdgeKind)> {
        let order: BTreeMap<&str, u32> = self
            .nodes
            .iter()
            .map(|n| (n.id.as_str(), n.order))
            .collect();
        let mut sig: Vec<(u32, u32, EdgeKind)> = self
            .edges
            .iter()
            .filter_map(|e| {
                Some((
                    *order.get(e.source_id.as_str())?,
                    *order.get(e.target_id.as_str())?,
                    e.kind,
                ))
            })
            .collect();
        sig.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));
        sig
    }
}
