//! JSON topology files: `{"nodes": [...], "edges": [...]}`.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

use ospfx_core::{Edge, Node};
use ospfx_routing::Topology;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopologyFile {
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl TopologyFile {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading topology {}", path.display()))?;
        let file: TopologyFile = serde_json::from_str(&contents)
            .with_context(|| format!("parsing topology {}", path.display()))?;
        tracing::debug!(
            path = %path.display(),
            nodes = file.nodes.len(),
            edges = file.edges.len(),
            "loaded topology file"
        );
        Ok(file)
    }

    /// Validate and index the file as a snapshot.
    pub fn to_topology(&self) -> anyhow::Result<Topology> {
        Ok(Topology::new(self.nodes.clone(), self.edges.clone())?)
    }
}

/// Load a JSON array of links, used for edge-addition edits.
pub fn load_edges(path: &Path) -> anyhow::Result<Vec<Edge>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading links {}", path.display()))?;
    let edges: Vec<Edge> = serde_json::from_str(&contents)
        .with_context(|| format!("parsing links {}", path.display()))?;
    Ok(edges)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_topology_document() {
        let text = r#"{
            "nodes": [
                {"id": "A", "label": "Amsterdam", "country": "NL"},
                {"id": "B"}
            ],
            "edges": [
                {"id": "ab", "from": "A", "to": "B", "cost": 10, "capacity": 1000}
            ]
        }"#;
        let file: TopologyFile = serde_json::from_str(text).unwrap();
        assert_eq!(file.nodes[0].country.as_deref(), Some("NL"));
        assert_eq!(file.nodes[1].label, "");
        assert_eq!(file.edges[0].capacity, Some(1000));

        let topo = file.to_topology().unwrap();
        assert_eq!(topo.edge_count(), 1);
    }

    #[test]
    fn test_invalid_topology_is_rejected() {
        let file = TopologyFile {
            nodes: vec![Node::new("A", "A")],
            edges: vec![Edge::new("ab", "A", "B", 10)],
        };
        assert!(file.to_topology().is_err());
    }
}
