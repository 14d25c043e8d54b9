use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use ospfx_core::{EdgeId, NodeId};

use crate::error::RoutingError;
use crate::graph::Topology;

/// One tied predecessor of a node on some shortest path.
///
/// Orders by upstream router id, then link id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PredecessorArc {
    /// The upstream router.
    pub from: NodeId,
    /// The link taken from `from`.
    pub edge_id: EdgeId,
}

/// Shortest-path DAG from a source, recorded up to the goal.
#[derive(Debug, Clone)]
pub struct ShortestPathTree {
    pub source: NodeId,
    pub goal: NodeId,
    /// Total cost of every shortest path from `source` to `goal`.
    pub distance: u64,
    /// node id -> every arc that reaches it at its shortest distance, sorted
    /// so that the DAG does not depend on input order.
    pub predecessors: HashMap<NodeId, Vec<PredecessorArc>>,
}

impl ShortestPathTree {
    /// The tied predecessor arcs of a node. Empty for the source.
    pub fn arcs_into(&self, node: &str) -> &[PredecessorArc] {
        self.predecessors
            .get(node)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Terminal outcome of a shortest-path query.
#[derive(Debug, Clone)]
pub enum SpfOutcome {
    Reached(ShortestPathTree),
    /// The goal is unreachable from the source. A normal result.
    NotFound,
}

/// Frontier entry for the priority queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FrontierEntry {
    distance: u64,
    node: usize,
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap: invert so the smallest distance pops first.
        // Equal distances pop in node input order.
        other
            .distance
            .cmp(&self.distance)
            .then_with(|| other.node.cmp(&self.node))
    }
}

/// Dijkstra from `start` that keeps every tied predecessor.
///
/// When a relaxation matches the best known distance exactly, its arc is
/// appended to the node's predecessor list instead of replacing it, so the
/// resulting DAG holds all equal-cost shortest paths. The search stops as
/// soon as `goal` is settled.
pub fn shortest_paths(
    topology: &Topology,
    start: &str,
    goal: &str,
) -> Result<SpfOutcome, RoutingError> {
    let source = topology.index_of(start)?;
    let target = topology.index_of(goal)?;

    let n = topology.node_count();
    let mut dist: Vec<Option<u64>> = vec![None; n];
    let mut settled = vec![false; n];
    // node index -> (predecessor node index, edge index)
    let mut preds: Vec<Vec<(usize, usize)>> = vec![Vec::new(); n];
    let mut heap = BinaryHeap::new();

    dist[source] = Some(0);
    heap.push(FrontierEntry {
        distance: 0,
        node: source,
    });

    while let Some(FrontierEntry { distance, node }) = heap.pop() {
        if settled[node] {
            continue;
        }
        settled[node] = true;

        if node == target {
            break;
        }

        for &edge_idx in topology.outgoing_at(node) {
            let edge = topology.edge_at(edge_idx);
            let next = topology.index_of(&edge.to)?;
            if settled[next] {
                continue;
            }
            let candidate = distance + edge.weight();
            match dist[next] {
                Some(best) if candidate > best => {}
                Some(best) if candidate == best => {
                    preds[next].push((node, edge_idx));
                }
                _ => {
                    dist[next] = Some(candidate);
                    preds[next].clear();
                    preds[next].push((node, edge_idx));
                    heap.push(FrontierEntry {
                        distance: candidate,
                        node: next,
                    });
                }
            }
        }
    }

    let distance = match (settled[target], dist[target]) {
        (true, Some(d)) => d,
        _ => {
            tracing::debug!(from = start, to = goal, "no path");
            return Ok(SpfOutcome::NotFound);
        }
    };

    let predecessors = preds
        .into_iter()
        .enumerate()
        .filter(|(_, arcs)| !arcs.is_empty())
        .map(|(idx, arcs)| {
            let mut arcs: Vec<PredecessorArc> = arcs
                .into_iter()
                .map(|(from, edge_idx)| PredecessorArc {
                    from: topology.node_at(from).id.clone(),
                    edge_id: topology.edge_at(edge_idx).id.clone(),
                })
                .collect();
            arcs.sort();
            (topology.node_at(idx).id.clone(), arcs)
        })
        .collect();

    tracing::debug!(from = start, to = goal, distance, "shortest path found");

    Ok(SpfOutcome::Reached(ShortestPathTree {
        source: start.to_string(),
        goal: goal.to_string(),
        distance,
        predecessors,
    }))
}
