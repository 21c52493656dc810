//! Enumeration types for the Lotka population monitor.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Lifecycle phase of one simulation session.
///
/// ```text
/// Idle --reset--> Running --mark_complete--> Completed
///                    \
///                     --mark_error--> Errored
/// ```
///
/// `reset` always enters [`Running`](Self::Running), from any phase.
/// [`Errored`](Self::Errored) is sticky until the next reset.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[ts(export, export_to = "bindings/")]
pub enum SessionPhase {
    /// No run has been started yet.
    #[default]
    Idle,
    /// A run is in progress and events are expected.
    Running,
    /// The producer reported a finished run.
    Completed,
    /// The producer reported a failure.
    Errored,
}

impl SessionPhase {
    /// Whether the producer is still expected to deliver events.
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }

    /// Whether the run has reached a terminal phase.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Errored)
    }
}

/// Ecological role of a tracked species.
///
/// Roles drive the predator/prey ratio and the phase-space projection.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum SpeciesRole {
    /// Grows on its own, is eaten by predators.
    Prey,
    /// Feeds on prey.
    Predator,
}
