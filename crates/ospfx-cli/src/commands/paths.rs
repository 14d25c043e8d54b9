//! `ospfx paths`: Every equal-cost shortest path between two routers.

use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use ospfx_core::AnalysisConfig;
use ospfx_routing::{EcmpResult, EcmpSolver, MetricsCalculator, PathMetrics};

use crate::topology::TopologyFile;

#[derive(Args, Debug)]
pub struct PathsArgs {
    /// Topology file (JSON).
    #[arg(short, long)]
    pub topology: PathBuf,

    /// Source router id.
    #[arg(long)]
    pub from: String,

    /// Destination router id.
    #[arg(long)]
    pub to: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PathsReport {
    result: EcmpResult,
    metrics: Vec<PathMetrics>,
}

pub fn run(args: &PathsArgs, config: &AnalysisConfig) -> anyhow::Result<()> {
    let topology = TopologyFile::load(&args.topology)?.to_topology()?;
    let result = EcmpSolver::from_config(config).solve(&topology, &args.from, &args.to)?;
    let metrics = MetricsCalculator::from_config(config).metrics_for_result(&result, &topology)?;

    if result.truncated {
        tracing::warn!(
            max_paths = config.enumeration.max_paths,
            "more equal-cost paths exist than were reported"
        );
    }
    for path in &result.paths {
        tracing::info!(id = %path.id, cost = path.cost, route = %path.describe(), "path");
    }

    let report = PathsReport { result, metrics };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
