use serde::{Deserialize, Serialize};

use ospfx_core::{Edge, EdgeId, NodeId};

use crate::ecmp::{EcmpResult, EcmpSolver};
use crate::error::RoutingError;
use crate::graph::Topology;

/// The hypothetical edit applied to the baseline snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TopologyEdit {
    LinkFailure { edge_ids: Vec<EdgeId> },
    CostChange { edge_id: EdgeId, old_cost: i64, new_cost: i64 },
    EdgeAddition { edge_ids: Vec<EdgeId> },
}

/// How reachability between the two routers changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Connectivity {
    /// Reachable before and after.
    Unchanged,
    /// Reachable before, unreachable after.
    Lost,
    /// Unreachable before, reachable after.
    Restored,
    /// Unreachable before and after.
    Unreachable,
}

/// Before/after comparison of one query under a topology edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhatIfResult {
    pub source: NodeId,
    pub destination: NodeId,
    pub edit: TopologyEdit,
    pub baseline: EcmpResult,
    pub modified: EcmpResult,
    /// Baseline path ids whose router sequence is gone after the edit.
    pub affected_paths: Vec<String>,
    /// Modified path ids whose router sequence did not exist before.
    pub new_paths: Vec<String>,
    /// `modified - baseline`, only when both sides are reachable. Loss or
    /// restoration of reachability is reported through `connectivity`
    /// rather than as a cost of zero.
    pub cost_delta: Option<i64>,
    pub connectivity: Connectivity,
}

impl WhatIfResult {
    /// Returns `true` if the edit changes anything visible for this query.
    pub fn has_changes(&self) -> bool {
        !self.affected_paths.is_empty()
            || !self.new_paths.is_empty()
            || self.cost_delta.is_some_and(|d| d != 0)
            || matches!(self.connectivity, Connectivity::Lost | Connectivity::Restored)
    }
}

/// Applies a hypothetical edit to a snapshot and diffs the ECMP results.
#[derive(Debug, Clone, Default)]
pub struct WhatIfSimulator {
    solver: EcmpSolver,
}

impl WhatIfSimulator {
    pub fn new(solver: EcmpSolver) -> Self {
        Self { solver }
    }

    /// Recompute with the given links removed.
    pub fn simulate_link_failure(
        &self,
        source: &str,
        destination: &str,
        failed_edge_ids: &[EdgeId],
        topology: &Topology,
    ) -> Result<WhatIfResult, RoutingError> {
        let modified = topology.without_edges(failed_edge_ids)?;
        let edit = TopologyEdit::LinkFailure {
            edge_ids: failed_edge_ids.to_vec(),
        };
        self.compare(source, destination, edit, topology, &modified)
    }

    /// Recompute with one link's cost overridden.
    pub fn simulate_cost_change(
        &self,
        source: &str,
        destination: &str,
        edge_id: &str,
        new_cost: i64,
        topology: &Topology,
    ) -> Result<WhatIfResult, RoutingError> {
        let old_cost = topology
            .edge(edge_id)
            .map(|e| e.cost)
            .ok_or_else(|| RoutingError::UnknownEdge(edge_id.to_string()))?;
        let modified = topology.with_cost(edge_id, new_cost)?;
        let edit = TopologyEdit::CostChange {
            edge_id: edge_id.to_string(),
            old_cost,
            new_cost,
        };
        self.compare(source, destination, edit, topology, &modified)
    }

    /// Recompute with new links introduced.
    pub fn simulate_edge_addition(
        &self,
        source: &str,
        destination: &str,
        new_edges: Vec<Edge>,
        topology: &Topology,
    ) -> Result<WhatIfResult, RoutingError> {
        let edit = TopologyEdit::EdgeAddition {
            edge_ids: new_edges.iter().map(|e| e.id.clone()).collect(),
        };
        let modified = topology.with_edges(new_edges)?;
        self.compare(source, destination, edit, topology, &modified)
    }

    fn compare(
        &self,
        source: &str,
        destination: &str,
        edit: TopologyEdit,
        baseline_topology: &Topology,
        modified_topology: &Topology,
    ) -> Result<WhatIfResult, RoutingError> {
        let baseline = self.solver.solve(baseline_topology, source, destination)?;
        let modified = self.solver.solve(modified_topology, source, destination)?;

        let affected_paths = baseline
            .paths
            .iter()
            .filter(|p| modified.find_route(&p.node_sequence).is_none())
            .map(|p| p.id.clone())
            .collect();
        let new_paths = modified
            .paths
            .iter()
            .filter(|p| baseline.find_route(&p.node_sequence).is_none())
            .map(|p| p.id.clone())
            .collect();

        let (cost_delta, connectivity) = match (baseline.cost, modified.cost) {
            (Some(before), Some(after)) => {
                (Some(after as i64 - before as i64), Connectivity::Unchanged)
            }
            (Some(_), None) => (None, Connectivity::Lost),
            (None, Some(_)) => (None, Connectivity::Restored),
            (None, None) => (None, Connectivity::Unreachable),
        };

        tracing::debug!(
            from = source,
            to = destination,
            ?connectivity,
            ?cost_delta,
            "what-if comparison complete"
        );

        Ok(WhatIfResult {
            source: source.to_string(),
            destination: destination.to_string(),
            edit,
            baseline,
            modified,
            affected_paths,
            new_paths,
            cost_delta,
            connectivity,
        })
    }
}
