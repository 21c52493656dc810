//! Shared type definitions for the Lotka population monitor.
//!
//! Every crate in the workspace speaks these types. The presentation-facing
//! ones derive [`ts_rs::TS`] so the browser dashboard can import generated
//! `TypeScript` bindings.
//!
//! # Modules
//!
//! - [`ids`] -- Per-run session identifier
//! - [`enums`] -- Session phase and species role
//! - [`species`] -- Tracked species and the configurable species set
//! - [`samples`] -- Year and performance samples from the producer
//! - [`events`] -- Inbound producer messages
//! - [`parameters`] -- Run parameters
//! - [`projections`] -- Statistics and chart projections

pub mod enums;
pub mod events;
pub mod ids;
pub mod parameters;
pub mod projections;
pub mod samples;
pub mod species;

// Re-export all public types at crate root for convenience.
pub use enums::{SessionPhase, SpeciesRole};
pub use events::{Completion, PdfUpdate, SessionEvent, UpstreamFailure};
pub use ids::SessionId;
pub use parameters::SimulationParameters;
pub use projections::{PhasePoint, PieSlice, PopulationRow, SessionStatistics, SpeciesStatistics};
pub use samples::{PerformanceSample, YearSample};
pub use species::{Species, SpeciesSet};
