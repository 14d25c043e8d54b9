use ospfx_core::{EdgeId, EnumerationConfig, NodeId};

use crate::error::RoutingError;
use crate::graph::Topology;
use crate::path::Path;
use crate::spf::ShortestPathTree;

/// Bounds on a single enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnumerationLimits {
    /// Stop after this many complete paths.
    pub max_paths: usize,
    /// Fail after expanding this many stack frames.
    pub step_limit: usize,
}

impl Default for EnumerationLimits {
    fn default() -> Self {
        Self::from(&EnumerationConfig::default())
    }
}

impl From<&EnumerationConfig> for EnumerationLimits {
    fn from(config: &EnumerationConfig) -> Self {
        Self {
            max_paths: config.max_paths,
            step_limit: config.step_limit,
        }
    }
}

/// The bounded set of paths read out of a [`ShortestPathTree`].
#[derive(Debug, Clone)]
pub struct Enumeration {
    /// Paths sorted by node sequence, then edge sequence.
    pub paths: Vec<Path>,
    /// More equal-cost paths exist beyond `max_paths`.
    pub truncated: bool,
    /// Stack frames expanded.
    pub steps: usize,
}

/// A partial path being extended from the goal back toward the source.
struct Frame {
    /// Routers from the goal backwards.
    nodes: Vec<NodeId>,
    /// Links from the goal backwards.
    edges: Vec<EdgeId>,
}

/// Walk the predecessor DAG from the goal back to the source and collect up
/// to `max_paths` simple paths.
///
/// The walk uses an explicit stack. An arc whose upstream router is already
/// part of the partial path is skipped, which keeps every emitted path simple
/// even if the predecessor map were to contain a cycle. Arcs are followed in
/// their sorted order, so a truncated walk keeps the same paths however the
/// topology's input was ordered. Output is sorted and ids (`path-1`,
/// `path-2`, ...) are assigned in that order.
pub fn enumerate_paths(
    tree: &ShortestPathTree,
    topology: &Topology,
    limits: &EnumerationLimits,
) -> Result<Enumeration, RoutingError> {
    let mut found: Vec<(Vec<NodeId>, Vec<EdgeId>)> = Vec::new();
    let mut stack = vec![Frame {
        nodes: vec![tree.goal.clone()],
        edges: Vec::new(),
    }];
    let mut steps = 0usize;

    while let Some(frame) = stack.pop() {
        if found.len() >= limits.max_paths {
            // Put it back so the truncation check below sees it.
            stack.push(frame);
            break;
        }

        steps += 1;
        if steps > limits.step_limit {
            return Err(RoutingError::EnumerationBudgetExceeded {
                from: tree.source.clone(),
                to: tree.goal.clone(),
                limit: limits.step_limit,
            });
        }

        let head = match frame.nodes.last() {
            Some(head) => head,
            None => continue,
        };

        if *head == tree.source {
            let Frame {
                mut nodes,
                mut edges,
            } = frame;
            nodes.reverse();
            edges.reverse();
            found.push((nodes, edges));
            continue;
        }

        // Pushed in reverse so the first recorded arc is explored first.
        for arc in tree.arcs_into(head).iter().rev() {
            if frame.nodes.contains(&arc.from) {
                continue;
            }
            let mut nodes = frame.nodes.clone();
            nodes.push(arc.from.clone());
            let mut edges = frame.edges.clone();
            edges.push(arc.edge_id.clone());
            stack.push(Frame { nodes, edges });
        }
    }

    let truncated = !stack.is_empty();
    if truncated {
        tracing::debug!(
            from = %tree.source,
            to = %tree.goal,
            max_paths = limits.max_paths,
            "path enumeration truncated"
        );
    }

    found.sort();
    let paths = found
        .into_iter()
        .enumerate()
        .map(|(i, (node_sequence, edge_sequence))| {
            let cost = edge_sequence
                .iter()
                .map(|id| topology.edge(id).map(|e| e.weight()).unwrap_or(0))
                .sum();
            Path {
                id: format!("path-{}", i + 1),
                node_sequence,
                edge_sequence,
                cost,
            }
        })
        .collect();

    Ok(Enumeration {
        paths,
        truncated,
        steps,
    })
}
