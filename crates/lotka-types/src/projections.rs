//! Derived statistics and chart-ready projections.
//!
//! None of these are stored by the session; they are recomputed from the
//! sample sequence on demand. Percentages are [`Decimal`]s carried at two
//! decimal places and serialized as strings (`"-18.18"`, `"0.00"`).

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Summary statistics for one species over the whole sample sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct SpeciesStatistics {
    /// Species key.
    pub species: String,
    /// Display label.
    pub label: String,
    /// Percentage change from the first to the last sample.
    #[ts(as = "String")]
    pub growth: Decimal,
    /// Smallest count seen.
    pub min: f64,
    /// Largest count seen.
    pub max: f64,
    /// Mean of the year-over-year percentage changes.
    #[ts(as = "String")]
    pub avg_growth: Decimal,
    /// Count in the last sample.
    pub current: f64,
}

/// Statistics for the whole session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct SessionStatistics {
    /// Number of year samples the statistics cover.
    pub sample_count: u32,
    /// Year of the first sample.
    pub first_year: i32,
    /// Year of the last sample.
    pub last_year: i32,
    /// One entry per tracked species, in species-set order.
    pub species: Vec<SpeciesStatistics>,
}

impl SessionStatistics {
    /// Statistics for the species with the given key.
    pub fn species(&self, key: &str) -> Option<&SpeciesStatistics> {
        self.species.iter().find(|s| s.species == key)
    }
}

/// One slice of the population pie chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PieSlice {
    /// Species display label.
    pub name: String,
    /// Population in the latest sample.
    pub value: f64,
}

/// One row of the population time series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PopulationRow {
    /// Simulated year.
    pub year: i32,
    /// Count per tracked species; species missing from the sample read as zero.
    pub populations: BTreeMap<String, f64>,
    /// Predators per prey, two decimal places; zero when there is no prey.
    #[ts(as = "String")]
    pub ratio: Decimal,
}

/// One point of the predator/prey phase-space trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PhasePoint {
    /// Simulated year.
    pub year: i32,
    /// Total prey population.
    pub prey: f64,
    /// Total predator population.
    pub predators: f64,
}
