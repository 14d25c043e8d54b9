//! OSPFX Routing: multi-path shortest-path analysis over link-state topologies.
//!
//! This crate provides:
//! - [`Topology`]: an immutable, fingerprinted snapshot of routers and links.
//! - [`shortest_paths`]: a modified Dijkstra that keeps every tied predecessor.
//! - [`enumerate_paths`]: bounded, cycle-safe expansion of a shortest-path tree.
//! - [`EcmpSolver`] and [`EcmpResult`]: all equal-cost paths with divergence and convergence points.
//! - [`RouteCache`]: a concurrent result cache keyed by topology fingerprint.
//! - [`MetricsCalculator`]: per-path latency, bandwidth, and overlap figures.
//! - [`WhatIfSimulator`]: before/after comparison under a single topology edit.
//! - [`ImpactAnalyzer`] and [`spawn_impact_analysis`]: pairwise impact analysis on a worker task.

pub mod branching;
pub mod cache;
pub mod ecmp;
pub mod enumerate;
pub mod error;
pub mod graph;
pub mod impact;
pub mod metrics;
pub mod path;
pub mod spf;
pub mod what_if;

// Re-exports for convenience.
pub use branching::{BranchPoint, Branching};
pub use cache::{CacheKey, CacheStats, RouteCache};
pub use ecmp::{EcmpResult, EcmpSolver};
pub use enumerate::{enumerate_paths, Enumeration, EnumerationLimits};
pub use error::RoutingError;
pub use graph::{Fingerprint, Topology};
pub use impact::{
    classify, spawn_impact_analysis, ImpactAnalyzer, ImpactFailure, ImpactHandle, ImpactMessage,
    ImpactProgress, ImpactRecord, ImpactRequest, ImpactSummary, ImpactType,
};
pub use metrics::{MetricsCalculator, PathMetrics};
pub use path::Path;
pub use spf::{shortest_paths, PredecessorArc, ShortestPathTree, SpfOutcome};
pub use what_if::{Connectivity, TopologyEdit, WhatIfResult, WhatIfSimulator};
