//! Summary statistics over a year-sample sequence.
//!
//! Pure functions of the sample slice and the species set. Percentages
//! follow the dashboard's conventions:
//!
//! - growth is `(last - first) / first * 100`, or zero when the first
//!   count is zero
//! - average growth is the mean of the year-over-year changes
//!   `(curr - prev) / prev * 100`, taken only over pairs with `prev > 0`,
//!   and zero when no such pair exists
//!
//! Both are rounded half away from zero to two decimal places.

use lotka_types::{SessionStatistics, Species, SpeciesSet, SpeciesStatistics, YearSample};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places carried by percentages and ratios.
pub const FIXED_SCALE: u32 = 2;

/// Compute statistics for every tracked species.
///
/// Returns `None` when there are no samples.
pub fn compute_statistics(samples: &[YearSample], species: &SpeciesSet) -> Option<SessionStatistics> {
    let first = samples.first()?;
    let last = samples.last()?;

    Some(SessionStatistics {
        sample_count: u32::try_from(samples.len()).unwrap_or(u32::MAX),
        first_year: first.year,
        last_year: last.year,
        species: species
            .iter()
            .map(|s| species_statistics(samples, first, last, s))
            .collect(),
    })
}

fn species_statistics(
    samples: &[YearSample],
    first: &YearSample,
    last: &YearSample,
    species: &Species,
) -> SpeciesStatistics {
    let key = species.key.as_str();
    let start = first.population(key);
    let current = last.population(key);

    let growth = if start > 0.0 {
        fixed((current - start) / start * 100.0)
    } else {
        fixed_zero()
    };

    let (min, max) = samples
        .iter()
        .map(|s| s.population(key))
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });

    SpeciesStatistics {
        species: species.key.clone(),
        label: species.label.clone(),
        growth,
        min,
        max,
        avg_growth: average_growth(samples, key),
        current,
    }
}

/// Mean year-over-year percentage change for one species.
fn average_growth(samples: &[YearSample], key: &str) -> Decimal {
    let (sum, count) = samples
        .windows(2)
        .filter_map(|pair| match pair {
            [prev, curr] => {
                let before = prev.population(key);
                (before > 0.0).then(|| (curr.population(key) - before) / before * 100.0)
            }
            _ => None,
        })
        .fold((0.0_f64, 0_u32), |(sum, count), rate| {
            (sum + rate, count.saturating_add(1))
        });

    if count == 0 {
        fixed_zero()
    } else {
        fixed(sum / f64::from(count))
    }
}

/// Round `value` half away from zero to [`FIXED_SCALE`] places.
///
/// Non-finite or out-of-range values collapse to zero.
pub fn fixed(value: f64) -> Decimal {
    Decimal::from_f64(value).map_or_else(fixed_zero, |d| {
        let mut rounded = d.round_dp_with_strategy(FIXED_SCALE, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(FIXED_SCALE);
        rounded
    })
}

/// Zero carried at [`FIXED_SCALE`] places (`0.00`).
pub const fn fixed_zero() -> Decimal {
    Decimal::from_parts(0, 0, 0, false, FIXED_SCALE)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample(year: i32, rabbits: f64, wolves: f64) -> YearSample {
        YearSample::new(year)
            .with("rabbits", rabbits)
            .with("wolves", wolves)
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn empty_sequence_has_no_statistics() {
        assert!(compute_statistics(&[], &SpeciesSet::default()).is_none());
    }

    #[test]
    fn growth_from_first_to_last() {
        let samples = [sample(2024, 110.0, 22.0), sample(2033, 90.0, 30.0)];
        let stats = compute_statistics(&samples, &SpeciesSet::default()).unwrap();

        let rabbits = stats.species("rabbits").unwrap();
        assert_eq!(rabbits.growth, Decimal::new(-1818, 2));
        assert_eq!(rabbits.growth.to_string(), "-18.18");

        let wolves = stats.species("wolves").unwrap();
        assert_eq!(wolves.growth.to_string(), "36.36");
    }

    #[test]
    fn min_max_and_current() {
        let samples = [
            sample(1, 50.0, 5.0),
            sample(2, 80.0, 3.0),
            sample(3, 20.0, 9.0),
            sample(4, 60.0, 4.0),
        ];
        let stats = compute_statistics(&samples, &SpeciesSet::default()).unwrap();
        let rabbits = stats.species("rabbits").unwrap();
        assert!(close(rabbits.min, 20.0));
        assert!(close(rabbits.max, 80.0));
        assert!(close(rabbits.current, 60.0));
        assert_eq!(stats.sample_count, 4);
        assert_eq!(stats.first_year, 1);
        assert_eq!(stats.last_year, 4);
    }

    #[test]
    fn average_growth_skips_pairs_from_zero() {
        // 0 -> 10 is skipped, 10 -> 20 is +100%, 20 -> 10 is -50%.
        let samples = [
            sample(1, 0.0, 1.0),
            sample(2, 10.0, 1.0),
            sample(3, 20.0, 1.0),
            sample(4, 10.0, 1.0),
        ];
        let stats = compute_statistics(&samples, &SpeciesSet::default()).unwrap();
        assert_eq!(stats.species("rabbits").unwrap().avg_growth.to_string(), "25.00");
        assert_eq!(stats.species("wolves").unwrap().avg_growth.to_string(), "0.00");
    }

    #[test]
    fn single_sample_average_growth_is_zero_string() {
        let stats = compute_statistics(&[sample(2024, 110.0, 22.0)], &SpeciesSet::default()).unwrap();
        let rabbits = stats.species("rabbits").unwrap();
        assert_eq!(rabbits.avg_growth.to_string(), "0.00");
        assert_eq!(rabbits.growth.to_string(), "0.00");
    }

    #[test]
    fn zero_first_sample_reports_zero_growth() {
        let samples = [sample(1, 0.0, 0.0), sample(2, 40.0, 7.0)];
        let stats = compute_statistics(&samples, &SpeciesSet::default()).unwrap();
        for species in &stats.species {
            assert_eq!(species.growth, Decimal::ZERO);
            assert_eq!(species.avg_growth, Decimal::ZERO);
        }
    }

    #[test]
    fn untracked_species_in_samples_are_ignored() {
        let samples = [sample(1, 10.0, 2.0).with("foxes", 4.0)];
        let stats = compute_statistics(&samples, &SpeciesSet::default()).unwrap();
        assert_eq!(stats.species.len(), 2);
        assert!(stats.species("foxes").is_none());
    }

    #[test]
    fn fixed_rounds_half_away_from_zero() {
        assert_eq!(fixed(1.005_000_1).to_string(), "1.01");
        assert_eq!(fixed(-2.5).to_string(), "-2.50");
        assert_eq!(fixed(7.0).to_string(), "7.00");
        assert_eq!(fixed(f64::NAN).to_string(), "0.00");
    }
}
