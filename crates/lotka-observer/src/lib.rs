//! Observer API server for the Lotka population monitor.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **`WebSocket` endpoint** (`/ws/session`) streaming a
//!   [`SessionBroadcast`] after every applied command
//! - **REST endpoints** for the session summary, statistics and chart
//!   projections
//! - **Write endpoints** to start a run and to push producer events
//! - **Minimal HTML status page** (`GET /`)
//!
//! # Architecture
//!
//! The session aggregator is synchronous and single-owner. The observer
//! keeps it behind a `tokio::sync::RwLock` and routes every mutation
//! through one ingest worker fed by an `mpsc` queue
//! ([`ingest::SessionCommand`]). HTTP handlers only take the read lock.

pub mod error;
pub mod handlers;
pub mod ingest;
pub mod router;
pub mod server;
pub mod startup;
pub mod state;
pub mod ws;

pub use error::ObserverError;
pub use ingest::{spawn_ingest_worker, IngestReport, SessionCommand};
pub use router::build_router;
pub use server::{serve, ServerConfig, ServerError};
pub use startup::{spawn_observer, ObserverHandle, StartupError};
pub use state::{AppState, SessionBroadcast};
