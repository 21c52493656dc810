//! Run parameters handed to the producer when a simulation starts.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Parameters of one Lotka-Volterra run.
///
/// ```text
/// dPrey/dt     = alpha * Prey - beta * Prey * Predators
/// dPredator/dt = delta * Prey * Predators - gamma * Predators
/// ```
///
/// Initial populations are keyed by species so any configured species set
/// can be started. Counts are signed on the wire; rejecting non-positive
/// ones is left to validation so callers get a proper validation error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SimulationParameters {
    /// First simulated year.
    #[serde(default = "default_start_year")]
    pub start_year: i32,
    /// Last simulated year. Must be greater than `start_year`.
    #[serde(default = "default_end_year")]
    pub end_year: i32,
    /// Initial population per species key.
    #[serde(default = "default_initial_populations")]
    pub initial_populations: BTreeMap<String, i64>,
    /// Prey growth rate.
    #[serde(default = "default_alpha")]
    pub alpha: f64,
    /// Predation rate.
    #[serde(default = "default_beta")]
    pub beta: f64,
    /// Predator death rate.
    #[serde(default = "default_gamma")]
    pub gamma: f64,
    /// Predator reproduction rate.
    #[serde(default = "default_delta")]
    pub delta: f64,
}

impl SimulationParameters {
    /// Initial population for `species`, zero when not configured.
    pub fn initial_population(&self, species: &str) -> i64 {
        self.initial_populations.get(species).copied().unwrap_or(0)
    }

    /// The four rates in `alpha, beta, gamma, delta` order.
    pub const fn rates(&self) -> [f64; 4] {
        [self.alpha, self.beta, self.gamma, self.delta]
    }
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            start_year: default_start_year(),
            end_year: default_end_year(),
            initial_populations: default_initial_populations(),
            alpha: default_alpha(),
            beta: default_beta(),
            gamma: default_gamma(),
            delta: default_delta(),
        }
    }
}

const fn default_start_year() -> i32 {
    2023
}

const fn default_end_year() -> i32 {
    2033
}

fn default_initial_populations() -> BTreeMap<String, i64> {
    BTreeMap::from([("rabbits".to_owned(), 100), ("wolves".to_owned(), 20)])
}

const fn default_alpha() -> f64 {
    0.1
}

const fn default_beta() -> f64 {
    0.01
}

const fn default_gamma() -> f64 {
    0.05
}

const fn default_delta() -> f64 {
    0.001
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_classic_run() {
        let params = SimulationParameters::default();
        assert_eq!(params.start_year, 2023);
        assert_eq!(params.end_year, 2033);
        assert_eq!(params.initial_population("rabbits"), 100);
        assert_eq!(params.initial_population("wolves"), 20);
        assert_eq!(params.initial_population("foxes"), 0);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let json = r#"{"start_year":2000,"end_year":2010,"alpha":0.2}"#;
        let params: SimulationParameters =
            serde_json::from_str(json).unwrap_or_default();
        assert_eq!(params.start_year, 2000);
        assert!((params.alpha - 0.2).abs() < f64::EPSILON);
        assert!((params.delta - 0.001).abs() < f64::EPSILON);
        assert_eq!(params.initial_population("rabbits"), 100);
    }

    #[test]
    fn negative_populations_still_deserialize() {
        let json = r#"{"initial_populations":{"rabbits":-5,"wolves":20}}"#;
        let params: Option<SimulationParameters> = serde_json::from_str(json).ok();
        assert_eq!(params.map(|p| p.initial_population("rabbits")), Some(-5));
    }
}
