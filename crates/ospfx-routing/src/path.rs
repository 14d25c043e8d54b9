use serde::{Deserialize, Serialize};

use ospfx_core::{EdgeId, NodeId};

/// A concrete simple path through the topology.
///
/// `node_sequence.len() == edge_sequence.len() + 1`, no router repeats, and
/// `cost` is the sum of the costs of `edge_sequence`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Path {
    /// Identifier scoped to the result that produced this path.
    pub id: String,
    pub node_sequence: Vec<NodeId>,
    pub edge_sequence: Vec<EdgeId>,
    pub cost: u64,
}

impl Path {
    /// Number of links traversed.
    pub fn hop_count(&self) -> usize {
        self.edge_sequence.len()
    }

    pub fn contains_edge(&self, edge_id: &str) -> bool {
        self.edge_sequence.iter().any(|e| e == edge_id)
    }

    /// `A -> B -> C`
    pub fn describe(&self) -> String {
        self.node_sequence.join(" -> ")
    }
}
