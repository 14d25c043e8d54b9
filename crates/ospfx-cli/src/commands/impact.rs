//! `ospfx impact`: Classify a topology edit's effect on every router pair.

use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

use ospfx_core::AnalysisConfig;
use ospfx_routing::{spawn_impact_analysis, ImpactAnalyzer, ImpactMessage, ImpactRequest, RoutingError};

use super::EditArgs;
use crate::topology::TopologyFile;

#[derive(Args, Debug)]
pub struct ImpactArgs {
    /// Topology file (JSON).
    #[arg(short, long)]
    pub topology: PathBuf,

    /// Routers to compare, comma separated (defaults to every router).
    #[arg(long, value_delimiter = ',')]
    pub routers: Vec<String>,

    #[command(flatten)]
    pub edit: EditArgs,
}

enum Event {
    Message(Option<ImpactMessage>),
    Interrupt,
}

pub async fn run(args: &ImpactArgs, config: &AnalysisConfig) -> anyhow::Result<()> {
    let file = TopologyFile::load(&args.topology)?;
    let baseline = file.to_topology()?;
    let (modified, new_edge_ids) = args.edit.resolve()?.apply(&baseline)?;

    let visible_routers = if args.routers.is_empty() {
        file.nodes.iter().map(|n| n.id.clone()).collect()
    } else {
        args.routers.clone()
    };
    let request = ImpactRequest {
        visible_nodes: file.nodes.clone(),
        visible_routers,
        current_edges: baseline.edges().to_vec(),
        modified_edges: modified.edges().to_vec(),
        new_edge_ids,
        node_name_map: file
            .nodes
            .iter()
            .filter(|n| !n.label.is_empty())
            .map(|n| (n.id.clone(), n.label.clone()))
            .collect(),
    };

    let analyzer = Arc::new(ImpactAnalyzer::from_config(config));
    let settings = analyzer.settings();
    tracing::debug!(
        batch_size = settings.batch_size,
        max_pairs = settings.max_pairs,
        max_duration_secs = settings.max_duration_secs,
        "impact settings"
    );
    let mut handle = spawn_impact_analysis(analyzer.clone(), request);
    tracing::info!(run_id = %handle.run_id(), "impact analysis spawned, press Ctrl-C to cancel");

    loop {
        let event = tokio::select! {
            msg = handle.recv() => Event::Message(msg),
            _ = tokio::signal::ctrl_c() => Event::Interrupt,
        };

        match event {
            Event::Interrupt => {
                tracing::warn!("received interrupt, cancelling impact analysis");
                handle.cancel();
            }
            Event::Message(None) => break,
            Event::Message(Some(ImpactMessage::Progress(p))) => {
                tracing::info!(
                    processed = p.processed,
                    total = p.total,
                    percent = p.percent,
                    "impact progress"
                );
            }
            Event::Message(Some(ImpactMessage::Complete(summary))) => {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            }
            Event::Message(Some(ImpactMessage::Failed(failure))) => {
                tracing::error!(run_id = %failure.run_id, error = %failure.error, "impact analysis failed");
            }
        }
    }

    match handle.join().await {
        Ok(summary) => {
            tracing::info!(
                pairs = summary.total_pairs,
                changes = summary.changes_count,
                duration_ms = summary.duration_ms,
                "impact analysis finished"
            );
            Ok(())
        }
        Err(RoutingError::Cancelled { processed }) => {
            tracing::warn!(processed, "impact analysis cancelled, results discarded");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
