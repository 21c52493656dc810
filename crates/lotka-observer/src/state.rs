//! Shared application state for the Observer API server.
//!
//! [`AppState`] holds the session aggregator behind a read-write lock, the
//! broadcast channel for session snapshots, and the sending side of the
//! ingest queue. HTTP handlers only ever take the read lock; the ingest
//! worker is the single writer.

use std::sync::Arc;

use lotka_core::SimulationSessionAggregator;
use lotka_types::{PieSlice, SessionId, SessionPhase, SessionStatistics, SpeciesSet};
use tokio::sync::{broadcast, mpsc, RwLock};

use crate::error::ObserverError;
use crate::ingest::SessionCommand;

/// Capacity of the broadcast channel for session snapshots.
///
/// If a subscriber falls behind by more than this many messages it will
/// receive a [`broadcast::error::RecvError::Lagged`] and skip to the
/// newest message.
const BROADCAST_CAPACITY: usize = 256;

/// Capacity of the ingest command queue.
///
/// Producers wait when the worker is this far behind.
pub const INGEST_QUEUE_CAPACITY: usize = 1024;

/// JSON-serializable session snapshot pushed over the `WebSocket`.
///
/// Carries what a dashboard redraws after every event: phase, progress,
/// statistics and the pie projection. Full series are fetched over REST.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionBroadcast {
    /// Identifier of the current run.
    pub session_id: Option<SessionId>,
    /// Lifecycle phase.
    pub phase: SessionPhase,
    /// Whether events are still expected.
    pub running: bool,
    /// Year of the latest accepted sample.
    pub current_year: Option<i32>,
    /// Percentage of the year range covered.
    pub progress: f64,
    /// Number of accepted year samples.
    pub samples: usize,
    /// Statistics, absent until the first sample.
    pub statistics: Option<SessionStatistics>,
    /// Latest population per species.
    pub pie: Vec<PieSlice>,
    /// Latest report location.
    pub pdf_url: Option<String>,
    /// Producer failure message.
    pub error: Option<String>,
}

impl SessionBroadcast {
    /// Project the current session into a broadcast frame.
    pub fn from_session(session: &SimulationSessionAggregator) -> Self {
        let state = session.state();
        Self {
            session_id: state.session_id,
            phase: state.phase,
            running: state.running(),
            current_year: state.current_year,
            progress: state.progress,
            samples: state.samples.len(),
            statistics: session.compute_statistics(),
            pie: session.compute_pie_projection(),
            pdf_url: state.pdf_url.clone(),
            error: state.error.clone(),
        }
    }
}

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Broadcast sender for session snapshots.
    pub tx: broadcast::Sender<SessionBroadcast>,
    /// The session aggregator (written only by the ingest worker).
    pub session: Arc<RwLock<SimulationSessionAggregator>>,
    /// Sender side of the ingest queue.
    pub commands: mpsc::Sender<SessionCommand>,
}

impl AppState {
    /// Create application state for an idle session tracking `species`.
    ///
    /// Returns the receiving side of the ingest queue, which must be handed
    /// to [`spawn_ingest_worker`](crate::ingest::spawn_ingest_worker).
    pub fn new(species: SpeciesSet) -> (Self, mpsc::Receiver<SessionCommand>) {
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        let (commands, rx) = mpsc::channel(INGEST_QUEUE_CAPACITY);
        let state = Self {
            tx,
            session: Arc::new(RwLock::new(SimulationSessionAggregator::new(species))),
            commands,
        };
        (state, rx)
    }

    /// Subscribe to the session broadcast channel.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionBroadcast> {
        self.tx.subscribe()
    }

    /// Queue a command for the ingest worker.
    ///
    /// # Errors
    ///
    /// Returns [`ObserverError::QueueClosed`] if the worker has stopped.
    pub async fn enqueue(&self, command: SessionCommand) -> Result<(), ObserverError> {
        self.commands
            .send(command)
            .await
            .map_err(|_closed| ObserverError::QueueClosed)
    }

    /// Snapshot the current session without waiting for the next broadcast.
    pub async fn snapshot(&self) -> SessionBroadcast {
        let session = self.session.read().await;
        SessionBroadcast::from_session(&session)
    }
}
