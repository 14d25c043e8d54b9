use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use ospfx_core::{AnalysisConfig, NodeId};

use crate::branching::{self, BranchPoint};
use crate::cache::{CacheKey, RouteCache};
use crate::enumerate::{enumerate_paths, EnumerationLimits};
use crate::error::RoutingError;
use crate::graph::Topology;
use crate::path::Path;
use crate::spf::{shortest_paths, SpfOutcome};

/// All equal-cost shortest paths between two routers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EcmpResult {
    pub source: NodeId,
    pub destination: NodeId,
    /// Sorted by node sequence; empty when the destination is unreachable.
    pub paths: Vec<Path>,
    /// Shortest-path cost, `None` when unreachable.
    pub cost: Option<u64>,
    #[serde(rename = "isECMP")]
    pub is_ecmp: bool,
    pub divergence_points: Vec<BranchPoint>,
    pub convergence_points: Vec<BranchPoint>,
    /// Paths actually enumerated. Never exhaustive when `truncated` is set.
    pub path_count: usize,
    /// Enumeration stopped at the configured limit with paths left over.
    pub truncated: bool,
}

impl EcmpResult {
    /// The result for a destination with no path.
    pub fn unreachable(source: &str, destination: &str) -> Self {
        Self {
            source: source.to_string(),
            destination: destination.to_string(),
            paths: Vec::new(),
            cost: None,
            is_ecmp: false,
            divergence_points: Vec::new(),
            convergence_points: Vec::new(),
            path_count: 0,
            truncated: false,
        }
    }

    /// Assemble a result from already enumerated equal-cost paths.
    pub fn from_paths(source: &str, destination: &str, paths: Vec<Path>, truncated: bool) -> Self {
        if paths.is_empty() {
            return Self::unreachable(source, destination);
        }
        let analysis = branching::analyze(&paths);
        Self {
            source: source.to_string(),
            destination: destination.to_string(),
            cost: paths.first().map(|p| p.cost),
            is_ecmp: paths.len() > 1,
            divergence_points: analysis.divergence_points,
            convergence_points: analysis.convergence_points,
            path_count: paths.len(),
            truncated,
            paths,
        }
    }

    pub fn is_reachable(&self) -> bool {
        !self.paths.is_empty()
    }

    /// The first path in canonical order.
    pub fn primary_path(&self) -> Option<&Path> {
        self.paths.first()
    }

    /// Union of the links used by any of the paths.
    pub fn edge_set(&self) -> BTreeSet<&str> {
        self.paths
            .iter()
            .flat_map(|p| p.edge_sequence.iter().map(String::as_str))
            .collect()
    }

    /// Look up a path by node sequence.
    pub fn find_route(&self, node_sequence: &[NodeId]) -> Option<&Path> {
        self.paths.iter().find(|p| p.node_sequence == node_sequence)
    }
}

/// Computes [`EcmpResult`]s: SPF, then bounded enumeration, then branch
/// analysis. Optionally memoizes through a shared [`RouteCache`].
#[derive(Debug, Clone, Default)]
pub struct EcmpSolver {
    limits: EnumerationLimits,
    cache: Option<Arc<RouteCache>>,
}

impl EcmpSolver {
    pub fn new(limits: EnumerationLimits) -> Self {
        Self {
            limits,
            cache: None,
        }
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(EnumerationLimits::from(&config.enumeration))
    }

    /// Share a result cache with this solver.
    pub fn with_cache(mut self, cache: Arc<RouteCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn limits(&self) -> &EnumerationLimits {
        &self.limits
    }

    pub fn cache(&self) -> Option<&Arc<RouteCache>> {
        self.cache.as_ref()
    }

    /// Every equal-cost shortest path from `source` to `destination`, up to
    /// the configured `max_paths`.
    pub fn solve(
        &self,
        topology: &Topology,
        source: &str,
        destination: &str,
    ) -> Result<EcmpResult, RoutingError> {
        let key = self.cache.as_ref().map(|_| CacheKey {
            source: source.to_string(),
            destination: destination.to_string(),
            fingerprint: topology.fingerprint(),
            limits: self.limits,
        });
        if let (Some(cache), Some(key)) = (&self.cache, &key) {
            if let Some(hit) = cache.get(key) {
                return Ok(hit);
            }
        }

        let result = match shortest_paths(topology, source, destination)? {
            SpfOutcome::NotFound => EcmpResult::unreachable(source, destination),
            SpfOutcome::Reached(tree) => {
                let enumeration = enumerate_paths(&tree, topology, &self.limits)?;
                EcmpResult::from_paths(
                    source,
                    destination,
                    enumeration.paths,
                    enumeration.truncated,
                )
            }
        };

        if let (Some(cache), Some(key)) = (&self.cache, key) {
            cache.insert(key, result.clone());
        }
        Ok(result)
    }
}
