use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueKind {
    /// An edge references a node id that does not exist.
    DanglingEdge,
    /// A node with no edges at all.
    OrphanNode,
    /// A non-entry node without incoming edges.
    MissingIncoming,
    /// A non-terminal node without outgoing edges.
    MissingOutgoing,
    /// Zero or several entry nodes.
    EntryCount,
    /// Zero or several terminal nodes.
    TerminalCount,
    /// An external-call trio is incomplete or mis-wired.
    BrokenTrio,
    /// The graph contains a cycle.
    Cycle,
    /// A node is not on any entry-to-terminal path.
    Unreachable,
}

/// Diagnostic produced by the validator. Per-request, logged then discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub kind: IssueKind,
    pub node_ids: Vec<String>,
    pub repaired: bool,
    pub detail: String,
}

impl ValidationIssue {
    pub fn repaired(kind: IssueKind, node_ids: Vec<String>, detail: impl Into<String>) -> Self {
        Self {
            kind,
            node_ids,
            repaired: true,
            detail: detail.into(),
        }
    }

    pub fn unrepaired(kind: IssueKind, node_ids: Vec<String>, detail: impl Into<String>) -> Self {
        Self {
            kind,
            node_ids,
            repaired: false,
            detail: detail.into(),
        }
    }
}
