//! Inbound messages from the simulation producer.
//!
//! The producer's event callbacks are modelled as one tagged enum,
//! [`SessionEvent`], so a single dispatch function can drive the session
//! and tests can replay a run without any transport.
//!
//! Wire format (adjacently tagged):
//!
//! ```json
//! {"event": "year_update", "data": {"year": 2024, "rabbits": 110, "wolves": 22}}
//! {"event": "pdf_ready", "data": {"pdfUrl": "http://host/report.pdf", "executionTime": 1.2, "coresUsed": 8}}
//! ```

use serde::{Deserialize, Serialize};

use crate::samples::{PerformanceSample, YearSample};

/// One message from the producer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum SessionEvent {
    /// Population totals for one simulated year.
    #[serde(rename = "year_update")]
    Year(YearSample),
    /// Performance measurement for one simulated year.
    #[serde(rename = "performance_update")]
    Performance(PerformanceSample),
    /// An interim report covering the run so far was written.
    PdfUpdated(PdfUpdate),
    /// The run finished and the final report is ready.
    #[serde(rename = "pdf_ready")]
    Completion(Completion),
    /// The producer gave up on the run.
    Error(UpstreamFailure),
}

impl SessionEvent {
    /// Short name used in log fields.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Year(_) => "year_update",
            Self::Performance(_) => "performance_update",
            Self::PdfUpdated(_) => "pdf_updated",
            Self::Completion(_) => "pdf_ready",
            Self::Error(_) => "error",
        }
    }

    /// Whether this event ends the run.
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completion(_) | Self::Error(_))
    }
}

/// Payload of [`SessionEvent::PdfUpdated`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfUpdate {
    /// Where the interim report can be downloaded.
    pub pdf_url: String,
    /// Last simulated year included in the report.
    #[serde(alias = "upto_year")]
    pub upto_year: i32,
}

/// Payload of [`SessionEvent::Completion`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Completion {
    /// Where the final report can be downloaded.
    pub pdf_url: String,
    /// Total producer wall-clock time in seconds.
    #[serde(default)]
    pub execution_time: Option<f64>,
    /// CPU cores the producer used.
    #[serde(default, alias = "cores")]
    pub cores_used: Option<u32>,
}

/// Payload of [`SessionEvent::Error`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpstreamFailure {
    /// Producer-supplied message, kept verbatim.
    pub message: String,
}
