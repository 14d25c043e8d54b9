use std::collections::{HashMap, HashSet};

use ospfx_core::{CoreError, Edge, EdgeId, Node, NodeId};

use crate::error::RoutingError;

/// Content hash identifying a topology snapshot.
pub type Fingerprint = blake3::Hash;

/// An immutable, validated snapshot of a link-state topology.
///
/// Edits never mutate a snapshot: [`Topology::without_edges`],
/// [`Topology::with_cost`] and [`Topology::with_edges`] each build a new one.
#[derive(Debug, Clone)]
pub struct Topology {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    /// node id -> index into `nodes`
    node_index: HashMap<NodeId, usize>,
    /// edge id -> index into `edges`
    edge_index: HashMap<EdgeId, usize>,
    /// node index -> indices of outgoing edges, in input order
    outgoing: Vec<Vec<usize>>,
    fingerprint: Fingerprint,
}

impl Topology {
    /// Build a snapshot from a node list and a directed edge list.
    ///
    /// Fails if any node or edge is malformed, if ids repeat, or if an edge
    /// references a node outside the node list. Parallel edges between the
    /// same pair of routers are kept.
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Result<Self, RoutingError> {
        let mut node_index = HashMap::with_capacity(nodes.len());
        for (idx, node) in nodes.iter().enumerate() {
            node.validate()?;
            if node_index.insert(node.id.clone(), idx).is_some() {
                return Err(CoreError::DuplicateNode(node.id.clone()).into());
            }
        }

        let mut edge_index = HashMap::with_capacity(edges.len());
        let mut outgoing = vec![Vec::new(); nodes.len()];
        for (idx, edge) in edges.iter().enumerate() {
            edge.validate()?;
            let from = *node_index
                .get(&edge.from)
                .ok_or_else(|| CoreError::UnknownEndpoint {
                    edge_id: edge.id.clone(),
                    node_id: edge.from.clone(),
                })?;
            if !node_index.contains_key(&edge.to) {
                return Err(CoreError::UnknownEndpoint {
                    edge_id: edge.id.clone(),
                    node_id: edge.to.clone(),
                }
                .into());
            }
            if edge_index.insert(edge.id.clone(), idx).is_some() {
                return Err(CoreError::DuplicateEdge(edge.id.clone()).into());
            }
            outgoing[from].push(idx);
        }

        let fingerprint = compute_fingerprint(&nodes, &edges);

        tracing::debug!(
            nodes = nodes.len(),
            edges = edges.len(),
            fingerprint = %fingerprint,
            "topology snapshot built"
        );

        Ok(Self {
            nodes,
            edges,
            node_index,
            edge_index,
            outgoing,
            fingerprint,
        })
    }

    /// All routers, in input order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// All directed links, in input order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Look up a router by id.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.node_index.get(id).map(|&idx| &self.nodes[idx])
    }

    /// Look up a link by id.
    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edge_index.get(id).map(|&idx| &self.edges[idx])
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    /// Content hash of the snapshot. Two snapshots with the same nodes and
    /// edges hash equal regardless of input order.
    pub fn fingerprint(&self) -> Fingerprint {
        self.fingerprint
    }

    pub(crate) fn index_of(&self, id: &str) -> Result<usize, RoutingError> {
        self.node_index
            .get(id)
            .copied()
            .ok_or_else(|| RoutingError::UnknownNode(id.to_string()))
    }

    pub(crate) fn node_at(&self, idx: usize) -> &Node {
        &self.nodes[idx]
    }

    pub(crate) fn edge_at(&self, idx: usize) -> &Edge {
        &self.edges[idx]
    }

    /// Indices of edges leaving the node at `idx`.
    pub(crate) fn outgoing_at(&self, idx: usize) -> &[usize] {
        &self.outgoing[idx]
    }

    /// A new snapshot with the given links removed.
    pub fn without_edges(&self, edge_ids: &[EdgeId]) -> Result<Self, RoutingError> {
        let removed: HashSet<&str> = edge_ids.iter().map(String::as_str).collect();
        for id in &removed {
            if !self.edge_index.contains_key(*id) {
                return Err(RoutingError::UnknownEdge(id.to_string()));
            }
        }
        let edges = self
            .edges
            .iter()
            .filter(|e| !removed.contains(e.id.as_str()))
            .cloned()
            .collect();
        Self::new(self.nodes.clone(), edges)
    }

    /// A new snapshot with one link's cost overridden.
    pub fn with_cost(&self, edge_id: &str, cost: i64) -> Result<Self, RoutingError> {
        let idx = *self
            .edge_index
            .get(edge_id)
            .ok_or_else(|| RoutingError::UnknownEdge(edge_id.to_string()))?;
        let mut edges = self.edges.clone();
        edges[idx].cost = cost;
        Self::new(self.nodes.clone(), edges)
    }

    /// A new snapshot with extra links appended.
    pub fn with_edges(&self, extra: Vec<Edge>) -> Result<Self, RoutingError> {
        let mut edges = self.edges.clone();
        edges.extend(extra);
        Self::new(self.nodes.clone(), edges)
    }
}

fn compute_fingerprint(nodes: &[Node], edges: &[Edge]) -> Fingerprint {
    let mut node_refs: Vec<&Node> = nodes.iter().collect();
    node_refs.sort_by(|a, b| a.id.cmp(&b.id));
    let mut edge_refs: Vec<&Edge> = edges.iter().collect();
    edge_refs.sort_by(|a, b| a.id.cmp(&b.id));

    let mut hasher = blake3::Hasher::new();
    hasher.update(b"ospfx-topology-v1");
    for node in node_refs {
        hasher.update(b"N");
        hash_field(&mut hasher, node.id.as_bytes());
        hash_field(&mut hasher, node.label.as_bytes());
        hash_field(&mut hasher, node.country.as_deref().unwrap_or("").as_bytes());
    }
    for edge in edge_refs {
        hasher.update(b"E");
        hash_field(&mut hasher, edge.id.as_bytes());
        hash_field(&mut hasher, edge.from.as_bytes());
        hash_field(&mut hasher, edge.to.as_bytes());
        hasher.update(&edge.cost.to_le_bytes());
        hasher.update(&edge.capacity.unwrap_or(0).to_le_bytes());
        hasher.update(&[edge.capacity.is_some() as u8]);
    }
    hasher.finalize()
}

/// Length-prefixed so that adjacent fields cannot run into each other.
fn hash_field(hasher: &mut blake3::Hasher, bytes: &[u8]) {
    hasher.update(&(bytes.len() as u64).to_le_bytes());
    hasher.update(bytes);
}
