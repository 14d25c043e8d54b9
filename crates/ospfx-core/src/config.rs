use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

use crate::error::CoreError;
use crate::regions::ContinentTable;

/// Analysis engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AnalysisConfig {
    /// Path enumeration limits.
    #[serde(default)]
    pub enumeration: EnumerationConfig,

    /// Latency estimation constants.
    #[serde(default)]
    pub latency: LatencyConfig,

    /// Bulk impact analysis settings.
    #[serde(default)]
    pub impact: ImpactConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Country code to continent overrides, layered over the built-in table.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub regions: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnumerationConfig {
    /// Maximum number of equal-cost paths reported per query.
    #[serde(default = "default_max_paths")]
    pub max_paths: usize,
    /// Maximum number of stack frames the enumerator may expand per query.
    #[serde(default = "default_step_limit")]
    pub step_limit: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatencyConfig {
    /// Per-hop switching delay.
    #[serde(default = "default_switching_delay")]
    pub switching_delay_ms: u64,
    /// Transition delay between two sites in the same country.
    #[serde(default = "default_same_country")]
    pub same_country_ms: u64,
    /// Transition delay between two countries on the same continent.
    #[serde(default = "default_same_continent")]
    pub same_continent_ms: u64,
    /// Transition delay between continents (or unknown locations).
    #[serde(default = "default_cross_continent")]
    pub cross_continent_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImpactConfig {
    /// Number of router pairs processed between progress messages.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Largest number of ordered pairs a single run may evaluate.
    #[serde(default = "default_max_pairs")]
    pub max_pairs: usize,
    /// Wall-clock budget for a single run, in seconds.
    #[serde(default = "default_max_duration_secs")]
    pub max_duration_secs: u64,
    /// Number of cached shortest-path results kept across runs. 0 disables caching.
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (text, json).
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_max_paths() -> usize {
    10
}
fn default_step_limit() -> usize {
    100_000
}
fn default_switching_delay() -> u64 {
    1
}
fn default_same_country() -> u64 {
    2
}
fn default_same_continent() -> u64 {
    10
}
fn default_cross_continent() -> u64 {
    50
}
fn default_batch_size() -> usize {
    50
}
fn default_max_pairs() -> usize {
    250_000
}
fn default_max_duration_secs() -> u64 {
    300
}
fn default_cache_capacity() -> usize {
    4096
}
fn default_log_level() -> String {
    "info".into()
}
fn default_log_format() -> String {
    "text".into()
}

impl Default for EnumerationConfig {
    fn default() -> Self {
        Self {
            max_paths: default_max_paths(),
            step_limit: default_step_limit(),
        }
    }
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self {
            switching_delay_ms: default_switching_delay(),
            same_country_ms: default_same_country(),
            same_continent_ms: default_same_continent(),
            cross_continent_ms: default_cross_continent(),
        }
    }
}

impl Default for ImpactConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            max_pairs: default_max_pairs(),
            max_duration_secs: default_max_duration_secs(),
            cache_capacity: default_cache_capacity(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl ImpactConfig {
    /// The run deadline as a `Duration`.
    pub fn max_duration(&self) -> Duration {
        Duration::from_secs(self.max_duration_secs)
    }
}

impl AnalysisConfig {
    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.enumeration.max_paths == 0 {
            return Err(CoreError::InvalidConfig(
                "enumeration.max_paths must be at least 1".into(),
            ));
        }
        if self.enumeration.step_limit < self.enumeration.max_paths {
            return Err(CoreError::InvalidConfig(format!(
                "enumeration.step_limit ({}) must not be below max_paths ({})",
                self.enumeration.step_limit, self.enumeration.max_paths
            )));
        }
        if self.impact.batch_size == 0 {
            return Err(CoreError::InvalidConfig(
                "impact.batch_size must be at least 1".into(),
            ));
        }
        if self.impact.max_duration_secs == 0 {
            return Err(CoreError::InvalidConfig(
                "impact.max_duration_secs must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// The built-in continent table with the configured overrides applied.
    pub fn continent_table(&self) -> ContinentTable {
        let mut table = ContinentTable::default();
        for (country, continent) in &self.regions {
            table.insert(country, continent);
        }
        if !self.regions.is_empty() {
            tracing::debug!(overrides = self.regions.len(), "applied region overrides");
        }
        table
    }
}
