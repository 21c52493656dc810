//! Run-start checks for simulation parameters.
//!
//! [`validate`] is the gate the caller runs before resetting a session.
//! [`advisories`] flags parameter combinations that are legal but will
//! likely produce a degenerate run.

use std::collections::BTreeSet;
use std::fmt;

use lotka_types::{SimulationParameters, SpeciesRole, SpeciesSet};

use crate::error::ValidationError;

/// Check that a run may start with `params` over `species`.
///
/// Checks run in a fixed order and the first failure is returned:
/// species set shape, year range, initial populations, rates.
///
/// # Errors
///
/// Returns the first [`ValidationError`] found.
pub fn validate(params: &SimulationParameters, species: &SpeciesSet) -> Result<(), ValidationError> {
    if species.is_empty() {
        return Err(ValidationError::NoSpecies);
    }

    let mut seen = BTreeSet::new();
    for s in species {
        if !seen.insert(s.key.as_str()) {
            return Err(ValidationError::DuplicateSpecies { key: s.key.clone() });
        }
    }

    if params.end_year <= params.start_year {
        return Err(ValidationError::EndBeforeStart);
    }

    if let Some(s) = species
        .iter()
        .find(|s| params.initial_population(&s.key) <= 0)
    {
        return Err(ValidationError::NonPositivePopulation {
            species: s.key.clone(),
        });
    }

    if params
        .rates()
        .iter()
        .any(|&rate| rate.is_nan() || rate <= 0.0)
    {
        return Err(ValidationError::NonPositiveRate);
    }

    Ok(())
}

/// A legal but suspicious parameter combination.
#[derive(Debug, Clone, PartialEq)]
pub enum Advisory {
    /// Predation outweighs prey growth from the first step.
    PreyCollapse {
        /// Prey growth rate.
        alpha: f64,
        /// Predation rate.
        beta: f64,
        /// Initial predator total.
        predators: i64,
    },
    /// Predator reproduction cannot keep up with predator deaths.
    PredatorDecline {
        /// Predator death rate.
        gamma: f64,
        /// Predator reproduction rate.
        delta: f64,
        /// Initial prey total.
        prey: i64,
    },
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PreyCollapse {
                alpha,
                beta,
                predators,
            } => write!(
                f,
                "with alpha={alpha}, beta={beta} and {predators} initial predators the prey population may collapse immediately"
            ),
            Self::PredatorDecline { gamma, delta, prey } => write!(
                f,
                "with gamma={gamma}, delta={delta} and {prey} initial prey the predator population may decline immediately"
            ),
        }
    }
}

/// Flag parameter combinations that will likely collapse one side early.
///
/// - prey collapse when `beta * predators >= alpha`
/// - predator decline when `delta * prey <= gamma`
///
/// Totals are summed over every species holding the role.
pub fn advisories(params: &SimulationParameters, species: &SpeciesSet) -> Vec<Advisory> {
    let prey = initial_total(params, species, SpeciesRole::Prey);
    let predators = initial_total(params, species, SpeciesRole::Predator);
    let mut found = Vec::new();

    if as_f64(predators) * params.beta >= params.alpha {
        found.push(Advisory::PreyCollapse {
            alpha: params.alpha,
            beta: params.beta,
            predators,
        });
    }
    if as_f64(prey) * params.delta <= params.gamma {
        found.push(Advisory::PredatorDecline {
            gamma: params.gamma,
            delta: params.delta,
            prey,
        });
    }

    found
}

fn initial_total(params: &SimulationParameters, species: &SpeciesSet, role: SpeciesRole) -> i64 {
    species
        .with_role(role)
        .map(|s| params.initial_population(&s.key))
        .fold(0_i64, i64::saturating_add)
}

#[allow(clippy::cast_precision_loss)]
fn as_f64(count: i64) -> f64 {
    count as f64
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use lotka_types::Species;

    use super::*;

    #[test]
    fn defaults_are_valid() {
        let params = SimulationParameters::default();
        assert_eq!(validate(&params, &SpeciesSet::default()), Ok(()));
    }

    #[test]
    fn end_year_must_follow_start_year() {
        let params = SimulationParameters {
            end_year: 2023,
            ..SimulationParameters::default()
        };
        let err = validate(&params, &SpeciesSet::default());
        assert_eq!(err, Err(ValidationError::EndBeforeStart));
        assert_eq!(
            err.err().map(|e| e.to_string()).as_deref(),
            Some("End year must be greater than start year")
        );
    }

    #[test]
    fn every_species_needs_a_population() {
        let params = SimulationParameters::default();
        let err = validate(&params, &SpeciesSet::with_foxes());
        assert_eq!(
            err,
            Err(ValidationError::NonPositivePopulation {
                species: "foxes".to_owned()
            })
        );
        assert_eq!(
            err.err().map(|e| e.to_string()).as_deref(),
            Some("Initial populations must be greater than zero")
        );
    }

    #[test]
    fn negative_population_is_rejected() {
        let params = SimulationParameters {
            initial_populations: BTreeMap::from([
                ("rabbits".to_owned(), -5),
                ("wolves".to_owned(), 20),
            ]),
            ..SimulationParameters::default()
        };
        assert_eq!(
            validate(&params, &SpeciesSet::default()),
            Err(ValidationError::NonPositivePopulation {
                species: "rabbits".to_owned()
            })
        );
    }

    #[test]
    fn rates_must_be_positive() {
        for bad in [0.0, -0.1, f64::NAN] {
            let params = SimulationParameters {
                gamma: bad,
                ..SimulationParameters::default()
            };
            assert_eq!(
                validate(&params, &SpeciesSet::default()),
                Err(ValidationError::NonPositiveRate)
            );
        }
    }

    #[test]
    fn year_range_is_checked_before_populations() {
        let params = SimulationParameters {
            end_year: 1,
            start_year: 2,
            initial_populations: BTreeMap::new(),
            alpha: 0.0,
            ..SimulationParameters::default()
        };
        assert_eq!(
            validate(&params, &SpeciesSet::default()),
            Err(ValidationError::EndBeforeStart)
        );
    }

    #[test]
    fn species_set_must_be_non_empty_and_unique() {
        let params = SimulationParameters::default();
        assert_eq!(
            validate(&params, &SpeciesSet::new(Vec::new())),
            Err(ValidationError::NoSpecies)
        );

        let twice = SpeciesSet::new(vec![
            Species::new("rabbits", "Rabbits", SpeciesRole::Prey),
            Species::new("rabbits", "Hares", SpeciesRole::Prey),
        ]);
        assert_eq!(
            validate(&params, &twice),
            Err(ValidationError::DuplicateSpecies {
                key: "rabbits".to_owned()
            })
        );
    }

    #[test]
    fn default_parameters_warn_about_prey_collapse() {
        // beta * 20 wolves = 0.2 >= alpha 0.1; delta * 100 rabbits = 0.1 > gamma 0.05
        let found = advisories(&SimulationParameters::default(), &SpeciesSet::default());
        assert_eq!(found.len(), 1);
        assert!(matches!(found.first(), Some(Advisory::PreyCollapse { predators: 20, .. })));
    }

    #[test]
    fn balanced_parameters_have_no_advisories() {
        let params = SimulationParameters {
            alpha: 1.0,
            beta: 0.01,
            gamma: 0.05,
            delta: 0.001,
            ..SimulationParameters::default()
        };
        assert!(advisories(&params, &SpeciesSet::default()).is_empty());
    }

    #[test]
    fn predator_decline_when_prey_too_scarce() {
        let params = SimulationParameters {
            alpha: 1.0,
            initial_populations: BTreeMap::from([
                ("rabbits".to_owned(), 10),
                ("wolves".to_owned(), 20),
            ]),
            ..SimulationParameters::default()
        };
        let found = advisories(&params, &SpeciesSet::default());
        assert_eq!(
            found,
            vec![Advisory::PredatorDecline {
                gamma: 0.05,
                delta: 0.001,
                prey: 10
            }]
        );
        assert!(found
            .first()
            .is_some_and(|a| a.to_string().contains("predator population may decline")));
    }
}
