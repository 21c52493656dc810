//! Chart-ready projections of the year-sample sequence.

use std::collections::BTreeMap;

use lotka_types::{PhasePoint, PieSlice, PopulationRow, SpeciesRole, SpeciesSet, YearSample};

use crate::statistics::{fixed, fixed_zero};

/// Pie slices for the latest sample, one per tracked species.
///
/// Empty when there are no samples.
pub fn pie_projection(samples: &[YearSample], species: &SpeciesSet) -> Vec<PieSlice> {
    let Some(last) = samples.last() else {
        return Vec::new();
    };

    species
        .iter()
        .map(|s| PieSlice {
            name: s.label.clone(),
            value: last.population(&s.key),
        })
        .collect()
}

/// One row per sample with every tracked species and the predator/prey ratio.
pub fn population_series(samples: &[YearSample], species: &SpeciesSet) -> Vec<PopulationRow> {
    samples
        .iter()
        .map(|sample| {
            let populations: BTreeMap<String, f64> = species
                .iter()
                .map(|s| (s.key.clone(), sample.population(&s.key)))
                .collect();
            let prey = role_total(sample, species, SpeciesRole::Prey);
            let predators = role_total(sample, species, SpeciesRole::Predator);
            let ratio = if prey > 0.0 {
                fixed(predators / prey)
            } else {
                fixed_zero()
            };
            PopulationRow {
                year: sample.year,
                populations,
                ratio,
            }
        })
        .collect()
}

/// Prey total against predator total, year by year.
pub fn phase_trajectory(samples: &[YearSample], species: &SpeciesSet) -> Vec<PhasePoint> {
    samples
        .iter()
        .map(|sample| PhasePoint {
            year: sample.year,
            prey: role_total(sample, species, SpeciesRole::Prey),
            predators: role_total(sample, species, SpeciesRole::Predator),
        })
        .collect()
}

fn role_total(sample: &YearSample, species: &SpeciesSet, role: SpeciesRole) -> f64 {
    species
        .with_role(role)
        .map(|s| sample.population(&s.key))
        .sum()
}
