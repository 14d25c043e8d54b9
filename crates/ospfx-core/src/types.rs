use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CoreError;

/// Router identifier, unique within a topology snapshot.
pub type NodeId = String;

/// Link identifier, unique within a topology snapshot.
pub type EdgeId = String;

/// Smallest cost a link may carry.
pub const MIN_COST: i64 = 1;

/// Largest cost a link may carry (16-bit OSPF interface metric).
pub const MAX_COST: i64 = 65_535;

/// A router in the link-state topology.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Stable identity of the router.
    pub id: NodeId,
    /// Human readable label (hostname, site name).
    #[serde(default)]
    pub label: String,
    /// ISO 3166 alpha-2 country code of the router's site, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl Node {
    /// Create a node without a country.
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            country: None,
        }
    }

    /// Attach a country code.
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    /// Validate that the node carries a usable identifier.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.id.is_empty() {
            return Err(CoreError::EmptyIdentifier("node id"));
        }
        Ok(())
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.label.is_empty() {
            write!(f, "{}", self.id)
        } else {
            write!(f, "{} ({})", self.label, self.id)
        }
    }
}

/// A directed link between two routers.
///
/// A bidirectional link is two independent `Edge` records, possibly with
/// different costs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    /// Stable identity of the link.
    pub id: EdgeId,
    /// Originating router.
    pub from: NodeId,
    /// Terminating router.
    pub to: NodeId,
    /// Interface cost. Signed so that malformed input survives deserialization
    /// and is rejected by [`Edge::validate`] instead.
    pub cost: i64,
    /// Bandwidth in Mbps. `None` means unconstrained.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u64>,
}

impl Edge {
    /// Create an edge without a capacity.
    pub fn new(
        id: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
        cost: i64,
    ) -> Self {
        Self {
            id: id.into(),
            from: from.into(),
            to: to.into(),
            cost,
            capacity: None,
        }
    }

    /// Attach a bandwidth in Mbps.
    pub fn with_capacity(mut self, capacity_mbps: u64) -> Self {
        self.capacity = Some(capacity_mbps);
        self
    }

    /// The cost as an unsigned weight. Only meaningful after validation.
    pub fn weight(&self) -> u64 {
        self.cost.max(0) as u64
    }

    /// Validate identifiers and the cost range. Endpoint existence is checked
    /// by the graph builder, which knows the node set.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.id.is_empty() {
            return Err(CoreError::EmptyIdentifier("edge id"));
        }
        if self.from.is_empty() || self.to.is_empty() {
            return Err(CoreError::EmptyIdentifier("edge endpoint"));
        }
        if !(MIN_COST..=MAX_COST).contains(&self.cost) {
            return Err(CoreError::InvalidCost {
                edge_id: self.id.clone(),
                cost: self.cost,
            });
        }
        Ok(())
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} -> {} ({})", self.id, self.from, self.to, self.cost)
    }
}
