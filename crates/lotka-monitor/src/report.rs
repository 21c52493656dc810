//! End-of-replay summary.

use lotka_core::SimulationSessionAggregator;
use lotka_observer::IngestReport;
use lotka_types::{SessionPhase, SpeciesStatistics};
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::source::ReplayStats;

/// What the monitor logs once the event source is exhausted.
#[derive(Debug, Clone, PartialEq)]
pub struct FinalReport {
    /// Phase the session ended in.
    pub phase: SessionPhase,
    /// Accepted year samples.
    pub samples: usize,
    /// Events the worker applied.
    pub applied: u64,
    /// Year samples dropped for ordering.
    pub dropped: u64,
    /// Source lines that did not parse.
    pub malformed: u64,
    /// Final report location.
    pub pdf_url: Option<String>,
    /// Producer failure, if any.
    pub error: Option<String>,
    /// One line per species.
    pub species: Vec<SpeciesLine>,
}

/// Condensed per-species statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesLine {
    /// Display label.
    pub label: String,
    /// Growth first to last, percent.
    pub growth: Decimal,
    /// Mean year-over-year growth, percent.
    pub avg_growth: Decimal,
    /// Latest count.
    pub current: f64,
}

impl From<&SpeciesStatistics> for SpeciesLine {
    fn from(stats: &SpeciesStatistics) -> Self {
        Self {
            label: stats.label.clone(),
            growth: stats.growth,
            avg_growth: stats.avg_growth,
            current: stats.current,
        }
    }
}

impl FinalReport {
    /// Summarize the session and the replay counters.
    pub fn build(
        session: &SimulationSessionAggregator,
        ingest: IngestReport,
        replay: ReplayStats,
    ) -> Self {
        let state = session.state();
        let species = session
            .compute_statistics()
            .map(|stats| stats.species.iter().map(SpeciesLine::from).collect())
            .unwrap_or_default();
        Self {
            phase: state.phase,
            samples: state.samples.len(),
            applied: ingest.applied,
            dropped: ingest.dropped,
            malformed: replay.malformed,
            pdf_url: state.pdf_url.clone(),
            error: state.error.clone(),
            species,
        }
    }

    /// Emit the report through `tracing`.
    pub fn log(&self) {
        info!(
            phase = ?self.phase,
            samples = self.samples,
            applied = self.applied,
            dropped = self.dropped,
            malformed = self.malformed,
            pdf_url = self.pdf_url.as_deref().unwrap_or("-"),
            "Replay finished"
        );
        if let Some(error) = &self.error {
            warn!(error, "Producer reported a failure");
        }
        if !self.phase.is_terminal() {
            warn!("Event source ended before a terminal event");
        }
        for line in &self.species {
            info!(
                species = line.label,
                growth = %line.growth,
                avg_growth = %line.avg_growth,
                current = line.current,
                "Species summary"
            );
        }
    }
}
