//! The nodes emitted for one intent and how they connect internally.

use forge_core::models::{ComponentSpec, IntentCategory};

/// Internal wiring shape of a group. Ids refer to nodes in `ComponentGroup::nodes`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupShape {
    Single {
        node: String,
    },
    /// invocation -> channel -> endpoint, all sharing one correlation id.
    Trio {
        invocation: String,
        channel: String,
        endpoint: String,
    },
    /// decision -> each arm; the last arm is the default.
    Branch {
        decision: String,
        arms: Vec<BranchArm>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchArm {
    pub node: String,
    pub condition: String,
    pub is_default: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComponentGroup {
    pub intent_index: usize,
    pub category: IntentCategory,
    pub nodes: Vec<ComponentSpec>,
    pub shape: GroupShape,
}

impl ComponentGroup {
    /// Node that receives the edge from the previous group.
    pub fn first(&self) -> &str {
        match &self.shape {
            GroupShape::Single { node } => node,
            GroupShape::Trio { invocation, .. } => invocation,
            GroupShape::Branch { decision, .. } => decision,
        }
    }

    /// Nodes that connect onward to the next group.
    pub fn exits(&self) -> Vec<&str> {
        match &self.shape {
            GroupShape::Single { node } => vec![node.as_str()],
            GroupShape::Trio { endpoint, .. } => vec![endpoint.as_str()],
            GroupShape::Branch { arms, .. } => arms.iter().map(|a| a.node.as_str()).collect(),
        }
    }

    pub fn is_branch(&self) -> bool {
        matches!(self.shape, GroupShape::Branch { .. })
    }
}
