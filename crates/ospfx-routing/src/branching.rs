use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use ospfx_core::NodeId;

use crate::path::Path;

/// A router where equal-cost paths split (divergence) or merge (convergence).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchPoint {
    pub node_id: NodeId,
    /// Number of distinct next hops (divergence) or previous hops (convergence).
    pub branch_count: usize,
    /// Ids of every path passing through the router.
    pub path_ids: Vec<String>,
}

/// Structural split and merge points of a path set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branching {
    pub divergence_points: Vec<BranchPoint>,
    pub convergence_points: Vec<BranchPoint>,
}

#[derive(Default)]
struct Occurrence<'a> {
    next_hops: BTreeSet<&'a str>,
    prev_hops: BTreeSet<&'a str>,
    path_ids: Vec<&'a str>,
}

/// Find where the given paths diverge and converge.
///
/// A router is a divergence point when the paths through it leave toward
/// more than one distinct next hop, and a convergence point when they arrive
/// from more than one distinct previous hop. Points are ordered by router id.
pub fn analyze(paths: &[Path]) -> Branching {
    if paths.len() < 2 {
        return Branching::default();
    }

    let mut seen: BTreeMap<&str, Occurrence<'_>> = BTreeMap::new();
    for path in paths {
        let hops = &path.node_sequence;
        for (i, node) in hops.iter().enumerate() {
            let entry = seen.entry(node.as_str()).or_default();
            if !entry.path_ids.contains(&path.id.as_str()) {
                entry.path_ids.push(path.id.as_str());
            }
            if let Some(next) = hops.get(i + 1) {
                entry.next_hops.insert(next.as_str());
            }
            if i > 0 {
                entry.prev_hops.insert(hops[i - 1].as_str());
            }
        }
    }

    let mut branching = Branching::default();
    for (node, occurrence) in seen {
        let path_ids: Vec<String> = occurrence.path_ids.iter().map(|s| s.to_string()).collect();
        if occurrence.next_hops.len() > 1 {
            branching.divergence_points.push(BranchPoint {
                node_id: node.to_string(),
                branch_count: occurrence.next_hops.len(),
                path_ids: path_ids.clone(),
            });
        }
        if occurrence.prev_hops.len() > 1 {
            branching.convergence_points.push(BranchPoint {
                node_id: node.to_string(),
                branch_count: occurrence.prev_hops.len(),
                path_ids,
            });
        }
    }
    branching
}
