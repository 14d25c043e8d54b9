/// Topology validation and configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    #[error("edge {edge_id} references unknown node {node_id}")]
    UnknownEndpoint { edge_id: String, node_id: String },

    #[error("edge {edge_id} has cost {cost}, expected 1..=65535")]
    InvalidCost { edge_id: String, cost: i64 },

    #[error("duplicate node id: {0}")]
    DuplicateNode(String),

    #[error("duplicate edge id: {0}")]
    DuplicateEdge(String),

    #[error("empty identifier in {0}")]
    EmptyIdentifier(&'static str),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
