//! petgraph view over a `FlowGraph` for reachability, cycles, and ordering.
//! Edges whose endpoints are missing are not indexed.

use std::collections::{BTreeMap, HashMap, HashSet};

use petgraph::algo::{tarjan_scc, toposort};
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::visit::{Dfs, Reversed};
use petgraph::Direction;

use forge_core::models::{EdgeKind, FlowGraph};

pub struct FlowIndex {
    graph: StableDiGraph<String, EdgeKind>,
    by_id: HashMap<String, NodeIndex>,
}

impl FlowIndex {
    pub fn from_graph(flow: &FlowGraph) -> Self {
        let mut graph = StableDiGraph::with_capacity(flow.nodes.len(), flow.edges.len());
        let mut by_id = HashMap::with_capacity(flow.nodes.len());
        for node in &flow.nodes {
            let idx = graph.add_node(node.id.clone());
            by_id.insert(node.id.clone(), idx);
        }
        for edge in &flow.edges {
            if let (Some(&s), Some(&t)) = (by_id.get(&edge.source_id), by_id.get(&edge.target_id)) {
                graph.add_edge(s, t, edge.kind);
            }
        }
        Self { graph, by_id }
    }

    fn label(&self, idx: NodeIndex) -> Option<&str> {
        self.graph.node_weight(idx).map(String::as_str)
    }

    /// Every node reachable from `id`, including `id`.
    pub fn descendants(&self, id: &str) -> HashSet<String> {
        let Some(&start) = self.by_id.get(id) else {
            return HashSet::new();
        };
        let mut seen = HashSet::new();
        let mut dfs = Dfs::new(&self.graph, start);
        while let Some(n) = dfs.next(&self.graph) {
            if let Some(label) = self.label(n) {
                seen.insert(label.to_string());
            }
        }
        seen
    }

    /// Every node that can reach `id`, including `id`.
    pub fn ancestors(&self, id: &str) -> HashSet<String> {
        let Some(&start) = self.by_id.get(id) else {
            return HashSet::new();
        };
        let reversed = Reversed(&self.graph);
        let mut seen = HashSet::new();
        let mut dfs = Dfs::new(reversed, start);
        while let Some(n) = dfs.next(reversed) {
            if let Some(label) = self.label(n) {
                seen.insert(label.to_string());
            }
        }
        seen
    }

    pub fn has_path(&self, from: &str, to: &str) -> bool {
        self.descendants(from).contains(to)
    }

    /// Strongly connected components with more than one node, plus self-loops.
    pub fn find_cycles(&self) -> Vec<Vec<String>> {
        tarjan_scc(&self.graph)
            .into_iter()
            .filter(|scc| {
                scc.len() > 1
                    || scc
                        .first()
                        .is_some_and(|&n| self.graph.contains_edge(n, n))
            })
            .map(|scc| {
                let mut ids: Vec<String> = scc
                    .into_iter()
                    .filter_map(|n| self.label(n).map(str::to_string))
                    .collect();
                ids.sort();
                ids
            })
            .collect()
    }

    /// Longest-path depth of every node from the sources. `None` if cyclic.
    pub fn depths(&self) -> Option<BTreeMap<String, usize>> {
        let order = toposort(&self.graph, None).ok()?;
        let mut depth: HashMap<NodeIndex, usize> = HashMap::with_capacity(order.len());
        for &n in &order {
            let d = self
                .graph
                .neighbors_directed(n, Direction::Incoming)
                .filter_map(|p| depth.get(&p).map(|pd| pd + 1))
                .max()
                .unwrap_or(0);
            depth.insert(n, d);
        }
        Some(
            depth
                .into_iter()
                .filter_map(|(n, d)| self.label(n).map(|l| (l.to_string(), d)))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forge_core::models::{ComponentSpec, ComponentType, Edge, Provenance};
    use serde_json::json;

    fn node(id: &str) -> ComponentSpec {
        ComponentSpec {
            id: id.into(),
            component_type: ComponentType::Transform,
            name: id.into(),
            config: json!({}),
            provenance: Provenance::Template,
            order: 0,
            intent_index: 0,
            correlation_id: None,
        }
    }

    fn graph(ids: &[&str], edges: &[(&str, &str)]) -> FlowGraph {
        FlowGraph {
            nodes: ids.iter().map(|id| node(id)).collect(),
            edges: edges
                .iter()
                .enumerate()
                .map(|(i, (s, t))| Edge::new(format!("e{i}"), EdgeKind::Sequence, *s, *t))
                .collect(),
            layout: BTreeMap::new(),
        }
    }

    #[test]
    fn depths_use_longest_path() {
        let g = graph(&["a", "b", "c"], &[("a", "b"), ("b", "c"), ("a", "c")]);
        let depths = FlowIndex::from_graph(&g).depths().unwrap();
        assert_eq!(depths["a"], 0);
        assert_eq!(depths["b"], 1);
        assert_eq!(depths["c"], 2);
    }

    #[test]
    fn cycles_are_reported() {
        let g = graph(&["a", "b", "c"], &[("a", "b"), ("b", "a"), ("c", "c")]);
        let index = FlowIndex::from_graph(&g);
        let cycles = index.find_cycles();
        assert_eq!(cycles.len(), 2);
        assert!(index.depths().is_none());
    }

    #[test]
    fn dangling_edges_are_ignored() {
        let g = graph(&["a"], &[("a", "ghost")]);
        let index = FlowIndex::from_graph(&g);
        assert_eq!(index.descendants("a").len(), 1);
        assert!(index.ancestors("a").contains("a"));
    }
}
