//! Deterministic, order-preserving identifiers.

/// Nodes per intent reserved in the global order space. Node indices stay
/// below this so `nNN` ids keep two digits and sort in emission order.
pub const ORDER_STRIDE: u32 = 100;

/// Largest node count one intent may expand into.
pub const MAX_NODES_PER_INTENT: usize = ORDER_STRIDE as usize;

pub fn node_id(intent_index: usize, node_index: usize) -> String {
    format!("i{intent_index:03}.n{node_index:02}")
}

pub fn correlation_id(intent_index: usize) -> String {
    format!("corr-{intent_index:03}")
}

/// Global emission order. Sorts intents first, then nodes within an intent.
pub fn order(intent_index: usize, node_index: usize) -> u32 {
    let intent = u32::try_from(intent_index).unwrap_or(u32::MAX / ORDER_STRIDE);
    let node = u32::try_from(node_index).unwrap_or(ORDER_STRIDE - 1);
    intent
        .saturating_mul(ORDER_STRIDE)
        .saturating_add(node.min(ORDER_STRIDE - 1))
}
