pub mod impact;
pub mod init;
pub mod paths;
pub mod what_if;

use clap::Args;
use std::collections::BTreeSet;
use std::path::PathBuf;

use ospfx_core::{Edge, EdgeId};
use ospfx_routing::Topology;

use crate::topology::load_edges;

/// A single link cost override, written `EDGE=COST`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostOverride {
    pub edge_id: EdgeId,
    pub cost: i64,
}

pub fn parse_cost_override(s: &str) -> Result<CostOverride, String> {
    let (edge_id, cost) = s
        .split_once('=')
        .ok_or_else(|| format!("expected EDGE=COST, got '{}'", s))?;
    if edge_id.is_empty() {
        return Err(format!("missing link id in '{}'", s));
    }
    let cost = cost
        .trim()
        .parse::<i64>()
        .map_err(|e| format!("invalid cost in '{}': {}", s, e))?;
    Ok(CostOverride {
        edge_id: edge_id.trim().to_string(),
        cost,
    })
}

/// The hypothetical topology edit, exactly one of which must be given.
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct EditArgs {
    /// Links to fail, comma separated.
    #[arg(long, value_delimiter = ',')]
    pub fail: Vec<EdgeId>,

    /// Override one link's cost, as EDGE=COST.
    #[arg(long, value_parser = parse_cost_override)]
    pub cost: Option<CostOverride>,

    /// JSON file holding an array of links to add.
    #[arg(long)]
    pub add_edges: Option<PathBuf>,
}

/// A resolved edit, with any link file already read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    Fail(Vec<EdgeId>),
    Cost(CostOverride),
    Add(Vec<Edge>),
}

impl EditArgs {
    pub fn resolve(&self) -> anyhow::Result<Edit> {
        if let Some(cost) = &self.cost {
            return Ok(Edit::Cost(cost.clone()));
        }
        if let Some(path) = &self.add_edges {
            return Ok(Edit::Add(load_edges(path)?));
        }
        if self.fail.is_empty() {
            anyhow::bail!("no topology edit given");
        }
        Ok(Edit::Fail(self.fail.clone()))
    }
}

impl Edit {
    /// Apply to a snapshot, returning the edited snapshot and the ids of any
    /// introduced links.
    pub fn apply(&self, topology: &Topology) -> anyhow::Result<(Topology, BTreeSet<EdgeId>)> {
        match self {
            Edit::Fail(ids) => Ok((topology.without_edges(ids)?, BTreeSet::new())),
            Edit::Cost(o) => Ok((topology.with_cost(&o.edge_id, o.cost)?, BTreeSet::new())),
            Edit::Add(edges) => {
                let ids = edges.iter().map(|e| e.id.clone()).collect();
                Ok((topology.with_edges(edges.clone())?, ids))
            }
        }
    }
}
