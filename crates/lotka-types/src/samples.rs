//! Per-year observations delivered by the simulation producer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Population counts for one simulated year.
///
/// Species counts sit next to `year` on the wire:
///
/// ```json
/// {"year": 2024, "rabbits": 110, "wolves": 22}
/// ```
///
/// A species that a sample does not mention reads as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearSample {
    /// Simulated calendar year.
    pub year: i32,
    /// Population count per species key.
    #[serde(flatten)]
    pub populations: BTreeMap<String, f64>,
}

impl YearSample {
    /// Create a sample for `year` with no populations recorded yet.
    pub const fn new(year: i32) -> Self {
        Self {
            year,
            populations: BTreeMap::new(),
        }
    }

    /// Builder-style setter for one species count.
    #[must_use]
    pub fn with(mut self, species: impl Into<String>, count: f64) -> Self {
        self.populations.insert(species.into(), count);
        self
    }

    /// Count for `species`, or `0.0` when the sample does not carry it.
    pub fn population(&self, species: &str) -> f64 {
        self.populations.get(species).copied().unwrap_or(0.0)
    }
}

/// Producer-side performance measurement for one simulated year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct PerformanceSample {
    /// Simulated calendar year.
    pub year: i32,
    /// Wall-clock seconds spent computing this year.
    pub time_per_year: f64,
    /// Producer memory usage in megabytes.
    pub memory_usage: f64,
    /// CPU cores the producer used, when it reports them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cores: Option<u32>,
}
