//! Integration test: equal-cost path discovery and what-if simulation
//! across ospfx-core and ospfx-routing.

use std::collections::HashSet;

use ospfx_core::{AnalysisConfig, Edge, Node};
use ospfx_integration_tests::{chain, diamond, diamond_ladder};
use ospfx_routing::{
    Connectivity, EcmpResult, EcmpSolver, EnumerationLimits, MetricsCalculator, Topology,
    WhatIfSimulator,
};

fn assert_well_formed(result: &EcmpResult, topology: &Topology) {
    let cost = result.cost.expect("reachable");
    for path in &result.paths {
        let sum: u64 = path
            .edge_sequence
            .iter()
            .map(|id| topology.edge(id).expect("edge exists").weight())
            .sum();
        assert_eq!(sum, path.cost);
        assert_eq!(path.cost, cost);

        let unique: HashSet<&String> = path.node_sequence.iter().collect();
        assert_eq!(unique.len(), path.node_sequence.len(), "path repeats a router");
        assert_eq!(path.edge_sequence.len() + 1, path.node_sequence.len());
    }
}

// =========================================================================
// Path discovery
// =========================================================================

#[test]
fn test_diamond_two_equal_paths() {
    let topo = diamond();
    let result = EcmpSolver::default().solve(&topo, "A", "D").unwrap();

    let routes: Vec<_> = result.paths.iter().map(|p| p.node_sequence.clone()).collect();
    assert_eq!(routes, vec![vec!["A", "B", "D"], vec!["A", "C", "D"]]);
    assert_eq!(result.cost, Some(20));
    assert!(result.is_ecmp);

    assert_eq!(result.divergence_points.len(), 1);
    assert_eq!(result.divergence_points[0].node_id, "A");
    assert_eq!(result.divergence_points[0].branch_count, 2);
    assert_eq!(result.convergence_points.len(), 1);
    assert_eq!(result.convergence_points[0].node_id, "D");
    assert_eq!(result.convergence_points[0].branch_count, 2);

    assert_well_formed(&result, &topo);
}

#[test]
fn test_chain_single_path() {
    let topo = chain();
    let result = EcmpSolver::default().solve(&topo, "A", "C").unwrap();

    assert_eq!(result.path_count, 1);
    assert_eq!(result.paths[0].node_sequence, vec!["A", "B", "C"]);
    assert_eq!(result.cost, Some(10));
    assert!(!result.is_ecmp);
    assert!(result.divergence_points.is_empty());
    assert!(result.convergence_points.is_empty());
}

#[test]
fn test_ladder_enumerates_every_equal_path() {
    let topo = diamond_ladder(3);
    let result = EcmpSolver::default().solve(&topo, "N0", "N3").unwrap();

    assert_eq!(result.path_count, 8);
    assert_eq!(result.cost, Some(6));
    assert!(!result.truncated);
    assert_well_formed(&result, &topo);

    let div: Vec<_> = result.divergence_points.iter().map(|p| p.node_id.as_str()).collect();
    let conv: Vec<_> = result.convergence_points.iter().map(|p| p.node_id.as_str()).collect();
    assert_eq!(div, vec!["N0", "N1", "N2"]);
    assert_eq!(conv, vec!["N1", "N2", "N3"]);

    let distinct: HashSet<_> = result.paths.iter().map(|p| p.node_sequence.clone()).collect();
    assert_eq!(distinct.len(), 8);
}

#[test]
fn test_ladder_respects_max_paths() {
    let topo = diamond_ladder(5);
    let result = EcmpSolver::default().solve(&topo, "N0", "N5").unwrap();
    assert_eq!(result.path_count, 10);
    assert!(result.truncated);
    assert_well_formed(&result, &topo);

    let wide = EcmpSolver::new(EnumerationLimits {
        max_paths: 64,
        step_limit: 100_000,
    });
    let full = wide.solve(&topo, "N0", "N5").unwrap();
    assert_eq!(full.path_count, 32);
    assert!(!full.truncated);
}

#[test]
fn test_results_independent_of_input_order() {
    let forward = diamond();
    let mut edges = forward.edges().to_vec();
    edges.reverse();
    let mut nodes = forward.nodes().to_vec();
    nodes.reverse();
    let reversed = Topology::new(nodes, edges).unwrap();

    assert_eq!(forward.fingerprint(), reversed.fingerprint());
    let a = EcmpSolver::default().solve(&forward, "A", "D").unwrap();
    let b = EcmpSolver::default().solve(&reversed, "A", "D").unwrap();
    assert_eq!(a, b);

    let ladder = diamond_ladder(3);
    let mut edges = ladder.edges().to_vec();
    edges.reverse();
    let mut nodes = ladder.nodes().to_vec();
    nodes.reverse();
    let ladder_reversed = Topology::new(nodes, edges).unwrap();
    assert_eq!(ladder.fingerprint(), ladder_reversed.fingerprint());

    let narrow = EcmpSolver::new(EnumerationLimits {
        max_paths: 2,
        step_limit: 100_000,
    });
    let a = narrow.solve(&ladder, "N0", "N3").unwrap();
    let b = narrow.solve(&ladder_reversed, "N0", "N3").unwrap();
    assert!(a.truncated);
    assert_eq!(a, b);
}

#[test]
fn test_metrics_over_solved_paths() {
    let topo = Topology::new(
        vec![
            Node::new("ams", "Amsterdam").with_country("NL"),
            Node::new("fra", "Frankfurt").with_country("DE"),
            Node::new("par", "Paris").with_country("FR"),
            Node::new("nyc", "New York").with_country("US"),
        ],
        vec![
            Edge::new("ams-fra", "ams", "fra", 10).with_capacity(10_000),
            Edge::new("ams-par", "ams", "par", 10).with_capacity(1_000),
            Edge::new("fra-nyc", "fra", "nyc", 50).with_capacity(100_000),
            Edge::new("par-nyc", "par", "nyc", 50),
        ],
    )
    .unwrap();

    let config = AnalysisConfig::default();
    let result = EcmpSolver::from_config(&config).solve(&topo, "ams", "nyc").unwrap();
    let metrics = MetricsCalculator::from_config(&config)
        .metrics_for_result(&result, &topo)
        .unwrap();

    assert_eq!(metrics.len(), 2);
    for m in &metrics {
        assert_eq!(m.total_cost, 60);
        // 2 hops + same-continent 10ms + cross-continent 50ms
        assert_eq!(m.estimated_latency_ms, 2 + 10 + 50);
        assert_eq!(m.diversity_score, 100.0);
    }
    let via_fra = metrics.iter().find(|m| m.countries_traversed[1] == "DE").unwrap();
    assert_eq!(via_fra.min_bandwidth_mbps, Some(10_000));
}

// =========================================================================
// What-if simulation
// =========================================================================

#[test]
fn test_failure_of_one_diamond_link() {
    let result = WhatIfSimulator::default()
        .simulate_link_failure("A", "D", &["bd".to_string()], &diamond())
        .unwrap();

    assert_eq!(result.modified.path_count, 1);
    assert_eq!(result.modified.paths[0].node_sequence, vec!["A", "C", "D"]);
    assert_eq!(result.modified.cost, Some(20));

    let removed = result
        .baseline
        .find_route(&["A".to_string(), "B".to_string(), "D".to_string()])
        .unwrap();
    assert!(result.affected_paths.contains(&removed.id));
}

#[test]
fn test_cost_raise_reports_zero_delta() {
    let result = WhatIfSimulator::default()
        .simulate_cost_change("A", "D", "ac", 25, &diamond())
        .unwrap();

    assert_eq!(result.modified.path_count, 1);
    assert_eq!(result.modified.paths[0].node_sequence, vec!["A", "B", "D"]);
    assert_eq!(result.modified.cost, Some(20));
    assert_eq!(result.baseline.path_count, 2);
    assert_eq!(result.cost_delta, Some(0));
    assert_eq!(result.connectivity, Connectivity::Unchanged);
}

#[test]
fn test_partition_is_not_a_zero_delta() {
    let result = WhatIfSimulator::default()
        .simulate_link_failure("A", "C", &["ac".to_string()], &diamond())
        .unwrap();
    assert_eq!(result.connectivity, Connectivity::Lost);
    assert_eq!(result.cost_delta, None);

    let json = serde_json::to_value(&result).unwrap();
    assert!(json["costDelta"].is_null());
    assert_eq!(json["connectivity"], "lost");
}
