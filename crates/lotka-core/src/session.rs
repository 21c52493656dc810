//! Per-run session state and the aggregator that owns it.
//!
//! [`SimulationSessionAggregator`] is created once per consumer and lives
//! across runs. `reset` starts a fresh run; `mark_complete` and
//! `mark_error` end it. Between those, samples are appended in arrival
//! order and statistics are recomputed on demand.
//!
//! The aggregator is synchronous and single-owner. Callers that receive
//! events from several tasks must serialize them before they get here.

use chrono::{DateTime, Utc};
use lotka_types::{
    Completion, PerformanceSample, PhasePoint, PieSlice, PopulationRow, SessionEvent, SessionId,
    SessionPhase, SessionStatistics, SpeciesSet, YearSample,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::SessionError;
use crate::projection;
use crate::statistics;

/// Everything the presentation layer reads about the current run.
///
/// Only the aggregator mutates this; readers get it by shared reference.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    /// Identifier of the current run, `None` before the first reset.
    pub session_id: Option<SessionId>,
    /// Lifecycle phase.
    pub phase: SessionPhase,
    /// First simulated year of the run.
    pub start_year: i32,
    /// Last simulated year of the run.
    pub end_year: i32,
    /// Year of the latest accepted sample.
    pub current_year: Option<i32>,
    /// Percentage of the year range covered, `0.0..=100.0`.
    pub progress: f64,
    /// Accepted year samples in strictly increasing year order.
    pub samples: Vec<YearSample>,
    /// Performance samples in arrival order.
    pub performance: Vec<PerformanceSample>,
    /// Latest report location, interim or final.
    pub pdf_url: Option<String>,
    /// Producer failure message, verbatim.
    pub error: Option<String>,
    /// Producer wall-clock time for the whole run, in seconds.
    pub execution_time: Option<f64>,
    /// CPU cores the producer reported.
    pub cores_used: Option<u32>,
    /// When the run was reset.
    pub started_at: Option<DateTime<Utc>>,
    /// When the run first reached a terminal phase.
    pub finished_at: Option<DateTime<Utc>>,
}

impl SessionState {
    /// Whether events are still expected for this run.
    pub const fn running(&self) -> bool {
        self.phase.is_running()
    }

    /// Year of the last accepted sample.
    pub fn last_year(&self) -> Option<i32> {
        self.samples.last().map(|s| s.year)
    }
}

/// Accumulates one run's events and answers statistics queries.
#[derive(Debug, Clone, Default)]
pub struct SimulationSessionAggregator {
    species: SpeciesSet,
    state: SessionState,
}

impl SimulationSessionAggregator {
    /// Create an idle aggregator tracking the given species.
    pub fn new(species: SpeciesSet) -> Self {
        Self {
            species,
            state: SessionState::default(),
        }
    }

    /// The tracked species.
    pub const fn species(&self) -> &SpeciesSet {
        &self.species
    }

    /// Read-only view of the session state.
    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Start a fresh run over `[start_year, end_year]`.
    ///
    /// Clears both sample sequences and every run result, and enters
    /// [`SessionPhase::Running`]. The bounds are not validated here.
    pub fn reset(&mut self, start_year: i32, end_year: i32) {
        let session_id = SessionId::new();
        self.state = SessionState {
            session_id: Some(session_id),
            phase: SessionPhase::Running,
            start_year,
            end_year,
            started_at: Some(Utc::now()),
            ..SessionState::default()
        };
        info!(%session_id, start_year, end_year, "session reset");
    }

    /// Record the end of a successful run. Idempotent.
    ///
    /// A missing `cores_used` keeps the count already learned from
    /// performance samples.
    pub fn mark_complete(
        &mut self,
        pdf_url: impl Into<String>,
        execution_time: Option<f64>,
        cores_used: Option<u32>,
    ) {
        let pdf_url = pdf_url.into();
        self.state.phase = SessionPhase::Completed;
        self.state.execution_time = execution_time;
        if cores_used.is_some() {
            self.state.cores_used = cores_used;
        }
        self.state.finished_at.get_or_insert_with(Utc::now);
        info!(
            pdf_url,
            execution_time,
            cores_used = self.state.cores_used,
            samples = self.state.samples.len(),
            "session complete"
        );
        self.state.pdf_url = Some(pdf_url);
    }

    /// Record a producer failure.
    ///
    /// Samples already ingested stay readable, and later samples are still
    /// accepted.
    pub fn mark_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        self.state.phase = SessionPhase::Errored;
        self.state.finished_at.get_or_insert_with(Utc::now);
        info!(error = message, samples = self.state.samples.len(), "session errored");
        self.state.error = Some(message);
    }

    /// Record that an interim report covering years up to `upto_year` exists.
    pub fn mark_pdf_updated(&mut self, pdf_url: impl Into<String>, upto_year: i32) {
        let pdf_url = pdf_url.into();
        debug!(pdf_url, upto_year, "interim report available");
        self.state.pdf_url = Some(pdf_url);
    }

    // -----------------------------------------------------------------------
    // Ingestion
    // -----------------------------------------------------------------------

    /// Append a year sample and recompute progress.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::OutOfOrder`] when `sample.year` is not
    /// strictly after the last accepted year. The sample is dropped and
    /// the state is left untouched.
    pub fn ingest_year_sample(&mut self, sample: YearSample) -> Result<(), SessionError> {
        if let Some(last_year) = self.state.last_year()
            && sample.year <= last_year
        {
            return Err(SessionError::OutOfOrder {
                year: sample.year,
                last_year,
            });
        }

        self.state.progress = progress(sample.year, self.state.start_year, self.state.end_year);
        self.state.current_year = Some(sample.year);
        debug!(
            year = sample.year,
            progress = self.state.progress,
            "year sample ingested"
        );
        self.state.samples.push(sample);
        Ok(())
    }

    /// Append a performance sample. Never fails.
    pub fn ingest_performance_sample(&mut self, sample: PerformanceSample) {
        if sample.cores.is_some() {
            self.state.cores_used = sample.cores;
        }
        debug!(year = sample.year, time_per_year = sample.time_per_year, "performance sample ingested");
        self.state.performance.push(sample);
    }

    /// Dispatch one producer event to the matching operation.
    ///
    /// # Errors
    ///
    /// Propagates [`SessionError::OutOfOrder`] from year samples.
    pub fn apply(&mut self, event: SessionEvent) -> Result<(), SessionError> {
        match event {
            SessionEvent::Year(sample) => self.ingest_year_sample(sample)?,
            SessionEvent::Performance(sample) => self.ingest_performance_sample(sample),
            SessionEvent::PdfUpdated(update) => {
                self.mark_pdf_updated(update.pdf_url, update.upto_year);
            }
            SessionEvent::Completion(Completion {
                pdf_url,
                execution_time,
                cores_used,
            }) => self.mark_complete(pdf_url, execution_time, cores_used),
            SessionEvent::Error(failure) => self.mark_error(failure.message),
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Per-species statistics, or `None` when no samples were accepted.
    pub fn compute_statistics(&self) -> Option<SessionStatistics> {
        statistics::compute_statistics(&self.state.samples, &self.species)
    }

    /// Latest population per species for a pie chart.
    pub fn compute_pie_projection(&self) -> Vec<PieSlice> {
        projection::pie_projection(&self.state.samples, &self.species)
    }

    /// Population time series with the predator/prey ratio.
    pub fn compute_population_series(&self) -> Vec<PopulationRow> {
        projection::population_series(&self.state.samples, &self.species)
    }

    /// Prey against predator totals for a phase-space plot.
    pub fn compute_phase_trajectory(&self) -> Vec<PhasePoint> {
        projection::phase_trajectory(&self.state.samples, &self.species)
    }

    /// Performance samples in arrival order.
    pub fn performance_series(&self) -> &[PerformanceSample] {
        &self.state.performance
    }
}

/// Share of `[start, end]` covered by `year`, clamped to `0..=100`.
///
/// A degenerate range counts as done once `year` reaches `end`.
fn progress(year: i32, start: i32, end: i32) -> f64 {
    if end <= start {
        return if year >= end { 100.0 } else { 0.0 };
    }
    let elapsed = f64::from(year) - f64::from(start);
    let span = f64::from(end) - f64::from(start);
    (100.0 * elapsed / span).clamp(0.0, 100.0)
}
