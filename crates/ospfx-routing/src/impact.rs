//! Bulk before/after impact analysis across every ordered pair of visible
//! routers.
//!
//! [`ImpactAnalyzer::run`] is the synchronous core. [`spawn_impact_analysis`]
//! moves a request into a blocking worker task and talks to the caller only
//! through [`ImpactMessage`]s: zero or more `Progress` messages followed by
//! exactly one terminal `Complete` or `Failed`. A cancelled run sends no
//! terminal message.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use uuid::Uuid;

use ospfx_core::{AnalysisConfig, Edge, EdgeId, ImpactConfig, Node, NodeId};

use crate::cache::RouteCache;
use crate::ecmp::{EcmpResult, EcmpSolver};
use crate::error::RoutingError;
use crate::graph::{Fingerprint, Topology};

/// Capacity of the worker's outgoing message channel.
const MESSAGE_CHANNEL_CAPACITY: usize = 64;

/// Input to one impact analysis run. Copied into the worker at spawn time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactRequest {
    /// Routers making up the visible graph.
    pub visible_nodes: Vec<Node>,
    /// Routers whose ordered pairs are compared.
    pub visible_routers: Vec<NodeId>,
    /// Baseline links.
    pub current_edges: Vec<Edge>,
    /// Links after the hypothetical edit.
    pub modified_edges: Vec<Edge>,
    /// Ids of links introduced by the edit.
    #[serde(default)]
    pub new_edge_ids: BTreeSet<EdgeId>,
    /// Display names for routers, keyed by id.
    #[serde(default)]
    pub node_name_map: HashMap<NodeId, String>,
}

/// Classification of a changed router pair, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImpactType {
    /// The new route uses a newly introduced link.
    #[serde(rename = "MIGRATION")]
    Migration,
    /// The primary route uses a different set of links.
    #[serde(rename = "REROUTE")]
    Reroute,
    #[serde(rename = "lost_ecmp")]
    LostEcmp,
    #[serde(rename = "new_ecmp")]
    NewEcmp,
    #[serde(rename = "cost_increase")]
    CostIncrease,
    #[serde(rename = "cost_decrease")]
    CostDecrease,
}

/// One router pair whose route or cost changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactRecord {
    pub src: NodeId,
    pub dest: NodeId,
    pub src_name: String,
    pub dest_name: String,
    /// Primary baseline route; empty when unreachable.
    pub old_path: Vec<NodeId>,
    /// Primary modified route; empty when unreachable.
    pub new_path: Vec<NodeId>,
    pub old_cost: Option<u64>,
    pub new_cost: Option<u64>,
    pub path_changed: bool,
    #[serde(rename = "wasECMP")]
    pub was_ecmp: bool,
    #[serde(rename = "isECMP")]
    pub is_ecmp: bool,
    pub impact_type: ImpactType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactProgress {
    pub run_id: Uuid,
    pub processed: usize,
    pub total: usize,
    pub percent: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactSummary {
    pub run_id: Uuid,
    pub changes: Vec<ImpactRecord>,
    /// Wall-clock time of the run in milliseconds.
    #[serde(rename = "duration")]
    pub duration_ms: u64,
    pub total_pairs: usize,
    /// Always equal to `changes.len()`.
    pub changes_count: usize,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactFailure {
    pub run_id: Uuid,
    pub error: String,
}

/// Messages emitted by an impact worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImpactMessage {
    Progress(ImpactProgress),
    Complete(ImpactSummary),
    Failed(ImpactFailure),
}

impl ImpactMessage {
    pub fn run_id(&self) -> Uuid {
        match self {
            Self::Progress(p) => p.run_id,
            Self::Complete(s) => s.run_id,
            Self::Failed(f) => f.run_id,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Progress(_))
    }
}

/// Decide whether a pair changed and, if so, how.
///
/// A pair is unchanged when the cost and the union of links over all
/// equal-cost paths are identical. Otherwise the first matching rule wins:
/// migration onto a new link, a different primary route, lost ECMP, new
/// ECMP, then the sign of the cost difference. A changed pair with equal
/// cost and an unchanged primary route (only a secondary ECMP member moved)
/// is reported as a reroute.
pub fn classify(
    baseline: &EcmpResult,
    modified: &EcmpResult,
    new_edge_ids: &BTreeSet<EdgeId>,
) -> Option<ImpactType> {
    if baseline.cost == modified.cost && baseline.edge_set() == modified.edge_set() {
        return None;
    }

    if modified
        .paths
        .iter()
        .any(|p| new_edge_ids.iter().any(|id| p.contains_edge(id)))
    {
        return Some(ImpactType::Migration);
    }

    let old_edges = primary_edges(baseline);
    let new_edges = primary_edges(modified);
    let old_set: HashSet<&str> = old_edges.iter().copied().collect();
    if old_edges.len() != new_edges.len() || new_edges.iter().any(|id| !old_set.contains(id)) {
        return Some(ImpactType::Reroute);
    }

    if baseline.is_ecmp && !modified.is_ecmp {
        return Some(ImpactType::LostEcmp);
    }
    if !baseline.is_ecmp && modified.is_ecmp {
        return Some(ImpactType::NewEcmp);
    }

    match (baseline.cost, modified.cost) {
        (Some(before), Some(after)) if after > before => Some(ImpactType::CostIncrease),
        (Some(before), Some(after)) if after < before => Some(ImpactType::CostDecrease),
        _ => Some(ImpactType::Reroute),
    }
}

fn primary_edges(result: &EcmpResult) -> Vec<&str> {
    result
        .primary_path()
        .map(|p| p.edge_sequence.iter().map(String::as_str).collect())
        .unwrap_or_default()
}

fn primary_route(result: &EcmpResult) -> Vec<NodeId> {
    result
        .primary_path()
        .map(|p| p.node_sequence.clone())
        .unwrap_or_default()
}

fn percent(processed: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    ((processed * 100) / total).min(100) as u8
}

/// Runs impact analyses against a fixed solver and settings.
#[derive(Debug, Clone, Default)]
pub struct ImpactAnalyzer {
    solver: EcmpSolver,
    settings: ImpactConfig,
}

impl ImpactAnalyzer {
    pub fn new(solver: EcmpSolver, settings: ImpactConfig) -> Self {
        Self { solver, settings }
    }

    /// Build from configuration, sharing a route cache across runs unless
    /// `impact.cache_capacity` is zero.
    pub fn from_config(config: &AnalysisConfig) -> Self {
        let mut solver = EcmpSolver::from_config(config);
        if config.impact.cache_capacity > 0 {
            solver = solver.with_cache(Arc::new(RouteCache::new(config.impact.cache_capacity)));
        }
        Self::new(solver, config.impact.clone())
    }

    pub fn settings(&self) -> &ImpactConfig {
        &self.settings
    }

    pub fn solver(&self) -> &EcmpSolver {
        &self.solver
    }

    /// Compare baseline and modified routes for every ordered pair of
    /// visible routers.
    ///
    /// `is_cancelled` is polled before each pair. `on_progress` is called
    /// every `batch_size` pairs and after the last one; an error from it
    /// stops the run. Links with an endpoint outside `visible_nodes` are
    /// not part of the visible graph and are dropped.
    pub fn run<C, P>(
        &self,
        run_id: Uuid,
        request: &ImpactRequest,
        is_cancelled: C,
        mut on_progress: P,
    ) -> Result<ImpactSummary, RoutingError>
    where
        C: Fn() -> bool,
        P: FnMut(ImpactProgress) -> Result<(), RoutingError>,
    {
        let started = Instant::now();
        let deadline = self.settings.max_duration();
        let batch_size = self.settings.batch_size.max(1);

        let visible: HashSet<&str> = request.visible_nodes.iter().map(|n| n.id.as_str()).collect();
        let baseline = Topology::new(
            request.visible_nodes.clone(),
            visible_edges(&request.current_edges, &visible, "current"),
        )?;
        let modified = Topology::new(
            request.visible_nodes.clone(),
            visible_edges(&request.modified_edges, &visible, "modified"),
        )?;

        // The modified snapshot is specific to this run; the baseline is
        // worth keeping for the next one.
        let _release = ReleaseOnDrop {
            cache: self
                .solver
                .cache()
                .filter(|_| modified.fingerprint() != baseline.fingerprint())
                .map(Arc::as_ref),
            fingerprint: modified.fingerprint(),
        };

        let mut routers: Vec<&str> = Vec::with_capacity(request.visible_routers.len());
        let mut seen = HashSet::new();
        for id in &request.visible_routers {
            if !baseline.contains_node(id) {
                tracing::warn!(router = %id, "visible router not in visible node set, ignoring");
                continue;
            }
            if seen.insert(id.as_str()) {
                routers.push(id.as_str());
            }
        }

        let n = routers.len();
        let total = n * n.saturating_sub(1);
        if total > self.settings.max_pairs {
            return Err(RoutingError::TooManyPairs {
                pairs: total,
                limit: self.settings.max_pairs,
            });
        }

        tracing::info!(%run_id, routers = n, pairs = total, "impact analysis started");

        let name_of = |id: &str| {
            request
                .node_name_map
                .get(id)
                .cloned()
                .unwrap_or_else(|| id.to_string())
        };

        let mut changes = Vec::new();
        let mut processed = 0usize;
        for &src in &routers {
            for &dest in &routers {
                if src == dest {
                    continue;
                }
                if is_cancelled() {
                    tracing::info!(%run_id, processed, "impact analysis cancelled");
                    return Err(RoutingError::Cancelled { processed });
                }
                if started.elapsed() >= deadline {
                    tracing::warn!(%run_id, processed, total, "impact analysis deadline exceeded");
                    return Err(RoutingError::Timeout {
                        limit: deadline,
                        processed,
                        total,
                    });
                }

                let before = self.solver.solve(&baseline, src, dest)?;
                let after = self.solver.solve(&modified, src, dest)?;
                if let Some(impact_type) = classify(&before, &after, &request.new_edge_ids) {
                    let old_path = primary_route(&before);
                    let new_path = primary_route(&after);
                    changes.push(ImpactRecord {
                        src: src.to_string(),
                        dest: dest.to_string(),
                        src_name: name_of(src),
                        dest_name: name_of(dest),
                        path_changed: old_path != new_path,
                        old_path,
                        new_path,
                        old_cost: before.cost,
                        new_cost: after.cost,
                        was_ecmp: before.is_ecmp,
                        is_ecmp: after.is_ecmp,
                        impact_type,
                    });
                }

                processed += 1;
                if processed % batch_size == 0 || processed == total {
                    on_progress(ImpactProgress {
                        run_id,
                        processed,
                        total,
                        percent: percent(processed, total),
                    })?;
                }
            }
        }

        let duration = started.elapsed();
        tracing::info!(
            %run_id,
            pairs = total,
            changes = changes.len(),
            elapsed_ms = duration.as_millis() as u64,
            "impact analysis complete"
        );

        Ok(ImpactSummary {
            run_id,
            changes_count: changes.len(),
            changes,
            duration_ms: duration.as_millis() as u64,
            total_pairs: total,
            completed_at: Utc::now(),
        })
    }
}

/// Invalidates a snapshot's cached results when the run ends, whichever
/// way it ends.
struct ReleaseOnDrop<'a> {
    cache: Option<&'a RouteCache>,
    fingerprint: Fingerprint,
}

impl Drop for ReleaseOnDrop<'_> {
    fn drop(&mut self) {
        if let Some(cache) = self.cache {
            cache.invalidate(&self.fingerprint);
        }
    }
}

fn visible_edges(edges: &[Edge], visible: &HashSet<&str>, side: &str) -> Vec<Edge> {
    let kept: Vec<Edge> = edges
        .iter()
        .filter(|e| visible.contains(e.from.as_str()) && visible.contains(e.to.as_str()))
        .cloned()
        .collect();
    let dropped = edges.len() - kept.len();
    if dropped > 0 {
        tracing::warn!(side, dropped, "links leaving the visible node set ignored");
    }
    kept
}

/// Caller side of a running impact analysis.
pub struct ImpactHandle {
    run_id: Uuid,
    messages: mpsc::Receiver<ImpactMessage>,
    cancel_tx: watch::Sender<bool>,
    task: JoinHandle<Result<ImpactSummary, RoutingError>>,
}

impl ImpactHandle {
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Next message from the worker; `None` once the worker has finished.
    ///
    /// The channel is bounded: callers must keep receiving or the worker
    /// stalls.
    pub async fn recv(&mut self) -> Option<ImpactMessage> {
        self.messages.recv().await
    }

    /// Ask the worker to stop before its next pair.
    pub fn cancel(&self) {
        let _ = self.cancel_tx.send(true);
    }

    /// Drain remaining messages and wait for the worker's result.
    pub async fn join(mut self) -> Result<ImpactSummary, RoutingError> {
        while self.messages.recv().await.is_some() {}
        self.task
            .await
            .map_err(|e| RoutingError::WorkerFailed(e.to_string()))?
    }
}

/// Run an impact analysis on a blocking worker thread.
///
/// The request is moved into the worker. Must be called from within a
/// tokio runtime.
pub fn spawn_impact_analysis(analyzer: Arc<ImpactAnalyzer>, request: ImpactRequest) -> ImpactHandle {
    let run_id = Uuid::now_v7();
    let (tx, messages) = mpsc::channel(MESSAGE_CHANNEL_CAPACITY);
    let (cancel_tx, cancel_rx) = watch::channel(false);

    let task = tokio::task::spawn_blocking(move || {
        let progress_tx = tx.clone();
        let result = analyzer.run(
            run_id,
            &request,
            || *cancel_rx.borrow(),
            |progress| {
                let processed = progress.processed;
                progress_tx
                    .blocking_send(ImpactMessage::Progress(progress))
                    .map_err(|_| RoutingError::Cancelled { processed })
            },
        );

        match &result {
            Ok(summary) => {
                let _ = tx.blocking_send(ImpactMessage::Complete(summary.clone()));
            }
            Err(RoutingError::Cancelled { .. }) => {}
            Err(e) => {
                let _ = tx.blocking_send(ImpactMessage::Failed(ImpactFailure {
                    run_id,
                    error: e.to_string(),
                }));
            }
        }
        result
    });

    ImpactHandle {
        run_id,
        messages,
        cancel_tx,
        task,
    }
}
