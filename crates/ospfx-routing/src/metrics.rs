use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use ospfx_core::{AnalysisConfig, ContinentTable, LatencyConfig, Proximity};

use crate::ecmp::EcmpResult;
use crate::error::RoutingError;
use crate::graph::Topology;
use crate::path::Path;

/// Derived per-path figures for reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathMetrics {
    pub path_id: String,
    pub hop_count: usize,
    pub total_cost: u64,
    /// Switching delay per hop plus site-to-site transition delays.
    pub estimated_latency_ms: u64,
    /// Bottleneck bandwidth in Mbps; `None` when no link declares a capacity.
    pub min_bandwidth_mbps: Option<u64>,
    /// Occurrences of this path's links across all other paths, duplicates
    /// included. A congestion-risk signal, not a set overlap.
    pub shared_link_count: usize,
    /// Countries along the path with consecutive repeats collapsed.
    pub countries_traversed: Vec<String>,
    /// Percentage (0-100) of this path's links used by no other path.
    pub diversity_score: f64,
}

/// Computes [`PathMetrics`] from a latency model and an injected
/// country to continent table.
#[derive(Debug, Clone, Default)]
pub struct MetricsCalculator {
    latency: LatencyConfig,
    regions: ContinentTable,
}

impl MetricsCalculator {
    pub fn new(latency: LatencyConfig, regions: ContinentTable) -> Self {
        Self { latency, regions }
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(config.latency.clone(), config.continent_table())
    }

    /// Transition delay between two adjacent sites.
    pub fn transition_delay(&self, a: Option<&str>, b: Option<&str>) -> u64 {
        match self.regions.proximity(a, b) {
            Proximity::SameCountry => self.latency.same_country_ms,
            Proximity::SameContinent => self.latency.same_continent_ms,
            Proximity::CrossContinent => self.latency.cross_continent_ms,
        }
    }

    /// Metrics for `path`, compared against `other_paths` for overlap.
    ///
    /// Fails if the path names a router or link absent from `topology`.
    pub fn metrics(
        &self,
        path: &Path,
        topology: &Topology,
        other_paths: &[Path],
    ) -> Result<PathMetrics, RoutingError> {
        let hop_count = path.hop_count();

        let mut countries = Vec::with_capacity(path.node_sequence.len());
        for id in &path.node_sequence {
            let node = topology
                .node(id)
                .ok_or_else(|| RoutingError::UnknownNode(id.clone()))?;
            countries.push(node.country.as_deref());
        }

        let mut total_cost = 0u64;
        let mut min_bandwidth: Option<u64> = None;
        for id in &path.edge_sequence {
            let edge = topology
                .edge(id)
                .ok_or_else(|| RoutingError::UnknownEdge(id.clone()))?;
            total_cost += edge.weight();
            if let Some(capacity) = edge.capacity {
                min_bandwidth = Some(min_bandwidth.map_or(capacity, |m| m.min(capacity)));
            }
        }

        let transitions: u64 = countries
            .windows(2)
            .map(|w| self.transition_delay(w[0], w[1]))
            .sum();
        let estimated_latency_ms = hop_count as u64 * self.latency.switching_delay_ms + transitions;

        let mut countries_traversed: Vec<String> = Vec::new();
        for country in countries.into_iter().flatten() {
            if countries_traversed.last().map(String::as_str) != Some(country) {
                countries_traversed.push(country.to_string());
            }
        }

        let mut usage: HashMap<&str, usize> = HashMap::new();
        for other in other_paths {
            for id in &other.edge_sequence {
                *usage.entry(id.as_str()).or_insert(0) += 1;
            }
        }
        let shared_link_count = path
            .edge_sequence
            .iter()
            .map(|id| usage.get(id.as_str()).copied().unwrap_or(0))
            .sum();

        let diversity_score = if other_paths.is_empty() || path.edge_sequence.is_empty() {
            100.0
        } else {
            let unique = path
                .edge_sequence
                .iter()
                .filter(|id| !usage.contains_key(id.as_str()))
                .count();
            unique as f64 * 100.0 / path.edge_sequence.len() as f64
        };

        Ok(PathMetrics {
            path_id: path.id.clone(),
            hop_count,
            total_cost,
            estimated_latency_ms,
            min_bandwidth_mbps: min_bandwidth,
            shared_link_count,
            countries_traversed,
            diversity_score,
        })
    }

    /// Metrics for every path of a result, each compared against the others.
    pub fn metrics_for_result(
        &self,
        result: &EcmpResult,
        topology: &Topology,
    ) -> Result<Vec<PathMetrics>, RoutingError> {
        result
            .paths
            .iter()
            .enumerate()
            .map(|(i, path)| {
                let others: Vec<Path> = result
                    .paths
                    .iter()
                    .enumerate()
                    .filter(|(j, _)| *j != i)
                    .map(|(_, p)| p.clone())
                    .collect();
                self.metrics(path, topology, &others)
            })
            .collect()
    }
}
