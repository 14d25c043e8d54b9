//! `ospfx what-if`: One query before and after a topology edit.

use clap::Args;
use std::path::PathBuf;

use ospfx_core::AnalysisConfig;
use ospfx_routing::{EcmpSolver, WhatIfSimulator};

use super::{Edit, EditArgs};
use crate::topology::TopologyFile;

#[derive(Args, Debug)]
pub struct WhatIfArgs {
    /// Topology file (JSON).
    #[arg(short, long)]
    pub topology: PathBuf,

    /// Source router id.
    #[arg(long)]
    pub from: String,

    /// Destination router id.
    #[arg(long)]
    pub to: String,

    #[command(flatten)]
    pub edit: EditArgs,
}

pub fn run(args: &WhatIfArgs, config: &AnalysisConfig) -> anyhow::Result<()> {
    let topology = TopologyFile::load(&args.topology)?.to_topology()?;
    let simulator = WhatIfSimulator::new(EcmpSolver::from_config(config));

    let result = match args.edit.resolve()? {
        Edit::Fail(ids) => simulator.simulate_link_failure(&args.from, &args.to, &ids, &topology)?,
        Edit::Cost(o) => {
            simulator.simulate_cost_change(&args.from, &args.to, &o.edge_id, o.cost, &topology)?
        }
        Edit::Add(edges) => {
            simulator.simulate_edge_addition(&args.from, &args.to, edges, &topology)?
        }
    };

    if !result.has_changes() {
        tracing::info!(from = %args.from, to = %args.to, "edit does not affect this route");
    }
    tracing::info!(
        affected = result.affected_paths.len(),
        new = result.new_paths.len(),
        cost_delta = ?result.cost_delta,
        connectivity = ?result.connectivity,
        "what-if complete"
    );

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
