//! OSPFX Core: topology types and analysis configuration.
//!
//! This crate provides:
//! - [`Node`] and [`Edge`]: the immutable link-state topology snapshot.
//! - [`AnalysisConfig`]: enumeration, latency, impact, and logging settings.
//! - [`ContinentTable`]: the injected country to continent lookup.

pub mod config;
pub mod error;
pub mod regions;
pub mod types;

pub use config::{AnalysisConfig, EnumerationConfig, ImpactConfig, LatencyConfig, LoggingConfig};
pub use error::CoreError;
pub use regions::{ContinentTable, Proximity};
pub use types::{Edge, EdgeId, Node, NodeId, MAX_COST, MIN_COST};
