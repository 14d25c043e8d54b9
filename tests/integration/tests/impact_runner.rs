//! Integration test: bulk impact analysis on the worker task, driven the way
//! an interactive caller would drive it.

use std::sync::Arc;

use ospfx_core::{AnalysisConfig, Edge};
use ospfx_integration_tests::{diamond, diamond_edges, nodes};
use ospfx_routing::{
    spawn_impact_analysis, ImpactAnalyzer, ImpactHandle, ImpactMessage, ImpactRequest,
    ImpactSummary, ImpactType, RoutingError,
};

fn request(modified: Vec<Edge>) -> ImpactRequest {
    ImpactRequest {
        visible_nodes: nodes(&["A", "B", "C", "D"]),
        visible_routers: vec!["A".into(), "B".into(), "C".into(), "D".into()],
        current_edges: diamond_edges(),
        modified_edges: modified,
        ..Default::default()
    }
}

async fn collect(
    mut handle: ImpactHandle,
) -> (Vec<ImpactMessage>, Result<ImpactSummary, RoutingError>) {
    let mut messages = Vec::new();
    while let Some(msg) = handle.recv().await {
        messages.push(msg);
    }
    (messages, handle.join().await)
}

#[tokio::test]
async fn test_failure_run_end_to_end() {
    let mut config = AnalysisConfig::default();
    config.impact.batch_size = 3;
    let analyzer = Arc::new(ImpactAnalyzer::from_config(&config));

    let modified = diamond().without_edges(&["bd".to_string()]).unwrap();
    let (messages, result) =
        collect(spawn_impact_analysis(analyzer, request(modified.edges().to_vec()))).await;

    let summary = result.unwrap();
    assert_eq!(summary.total_pairs, 12);
    assert_eq!(summary.changes_count, summary.changes.len());
    assert!(summary
        .changes
        .iter()
        .all(|c| c.impact_type == ImpactType::Reroute));

    let progress: Vec<_> = messages
        .iter()
        .filter_map(|m| match m {
            ImpactMessage::Progress(p) => Some(p.processed),
            _ => None,
        })
        .collect();
    assert_eq!(progress, vec![3, 6, 9, 12]);
    assert!(matches!(messages.last(), Some(ImpactMessage::Complete(_))));
    assert_eq!(messages.iter().filter(|m| m.is_terminal()).count(), 1);
}

#[tokio::test]
async fn test_new_link_migration_end_to_end() {
    let analyzer = Arc::new(ImpactAnalyzer::from_config(&AnalysisConfig::default()));
    let modified = diamond()
        .with_edges(vec![Edge::new("bc", "B", "C", 1)])
        .unwrap();
    let mut req = request(modified.edges().to_vec());
    req.new_edge_ids.insert("bc".into());

    let (_, result) = collect(spawn_impact_analysis(analyzer, req)).await;
    let summary = result.unwrap();

    let bc = summary
        .changes
        .iter()
        .find(|c| c.src == "B" && c.dest == "C")
        .unwrap();
    assert_eq!(bc.impact_type, ImpactType::Migration);
    assert_eq!(bc.old_cost, None);
    assert_eq!(bc.new_cost, Some(1));

    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["changesCount"], summary.changes.len());
    assert!(json["completedAt"].is_string());
}

#[tokio::test]
async fn test_pair_cap_reports_failure() {
    let mut config = AnalysisConfig::default();
    config.impact.max_pairs = 4;
    let analyzer = Arc::new(ImpactAnalyzer::from_config(&config));

    let (messages, result) = collect(spawn_impact_analysis(analyzer, request(diamond_edges()))).await;
    assert_eq!(messages.len(), 1);
    match &messages[0] {
        ImpactMessage::Failed(f) => assert!(!f.error.is_empty()),
        other => panic!("expected FAILED, got {:?}", other),
    }
    assert!(matches!(result, Err(RoutingError::TooManyPairs { .. })));
}

#[tokio::test]
async fn test_shared_cache_is_hit_across_runs() {
    let analyzer = Arc::new(ImpactAnalyzer::from_config(&AnalysisConfig::default()));
    let cache = analyzer.solver().cache().cloned().expect("cache enabled by default");

    let (_, first) = collect(spawn_impact_analysis(analyzer.clone(), request(diamond_edges()))).await;
    first.unwrap();
    let misses = cache.stats().misses;

    let (_, second) = collect(spawn_impact_analysis(analyzer, request(diamond_edges()))).await;
    second.unwrap();
    assert_eq!(cache.stats().misses, misses);
    assert!(cache.stats().hits >= 24);
}
