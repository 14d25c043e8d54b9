use std::time::Duration;

use ospfx_core::CoreError;

/// Errors that can occur within the routing analysis layer.
///
/// An unreachable destination is not an error: it is reported as an
/// [`EcmpResult`](crate::EcmpResult) without paths.
#[derive(Debug, thiserror::Error)]
pub enum RoutingError {
    #[error("invalid topology: {0}")]
    Topology(#[from] CoreError),

    #[error("unknown node: {0}")]
    UnknownNode(String),

    #[error("unknown edge: {0}")]
    UnknownEdge(String),

    #[error("path enumeration from {from} to {to} exceeded {limit} steps")]
    EnumerationBudgetExceeded {
        from: String,
        to: String,
        limit: usize,
    },

    #[error("impact analysis would evaluate {pairs} router pairs, limit is {limit}")]
    TooManyPairs { pairs: usize, limit: usize },

    #[error("impact analysis exceeded its {limit:?} deadline after {processed} of {total} pairs")]
    Timeout {
        limit: Duration,
        processed: usize,
        total: usize,
    },

    #[error("impact analysis cancelled after {processed} pairs")]
    Cancelled { processed: usize },

    #[error("impact worker failed: {0}")]
    WorkerFailed(String),
}
