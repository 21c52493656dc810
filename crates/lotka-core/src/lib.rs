//! Session aggregation for the Lotka population monitor.
//!
//! The producer streams one population sample per simulated year, plus
//! performance samples and a single terminal event. This crate turns that
//! stream into session state and derived views:
//!
//! - [`session`] -- [`SimulationSessionAggregator`], the per-run state owner
//! - [`statistics`] -- growth, extremes and average growth per species
//! - [`projection`] -- pie, population series and phase-space projections
//! - [`validation`] -- run-start checks and parameter advisories
//! - [`config`] -- YAML configuration with environment overrides
//! - [`error`] -- session and validation errors
//!
//! Everything here is synchronous and transport-agnostic.

pub mod config;
pub mod error;
pub mod projection;
pub mod session;
pub mod statistics;
pub mod validation;

pub use config::{ConfigError, MonitorConfig};
pub use error::{SessionError, ValidationError};
pub use session::{SessionState, SimulationSessionAggregator};
pub use validation::{advisories, validate, Advisory};
