//! Single-consumer ingest queue.
//!
//! Every mutation of the session goes through [`SessionCommand`]s consumed
//! by one worker task, so producers (the replayed event source, `POST`
//! handlers) never touch the aggregator directly. After each command the
//! worker broadcasts a fresh [`SessionBroadcast`].

use std::sync::Arc;

use lotka_core::{SessionError, SimulationSessionAggregator};
use lotka_types::{SessionEvent, SimulationParameters};
use tokio::sync::{broadcast, mpsc, oneshot, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::state::{AppState, SessionBroadcast};

/// A command for the ingest worker.
#[derive(Debug)]
pub enum SessionCommand {
    /// Begin a new run with the given parameters.
    Start(SimulationParameters),
    /// Apply one producer event to the current run.
    Event(SessionEvent),
    /// Reply with the counters once every earlier command has been applied.
    Flush(oneshot::Sender<IngestReport>),
}

/// Counters for the current run, as seen by the ingest worker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct IngestReport {
    /// Events applied to the session.
    pub applied: u64,
    /// Year samples dropped for arriving out of order.
    pub dropped: u64,
}

/// Spawn the ingest worker on a background Tokio task.
///
/// The worker keeps only the session and the broadcast sender, so the task
/// ends once every [`AppState`] clone (and with it every command sender)
/// is dropped.
pub fn spawn_ingest_worker(
    state: &AppState,
    commands: mpsc::Receiver<SessionCommand>,
) -> JoinHandle<IngestReport> {
    tokio::spawn(run_ingest(
        Arc::clone(&state.session),
        state.tx.clone(),
        commands,
    ))
}

/// Consume commands until the queue closes, returning the final counters.
pub async fn run_ingest(
    session: Arc<RwLock<SimulationSessionAggregator>>,
    tx: broadcast::Sender<SessionBroadcast>,
    mut commands: mpsc::Receiver<SessionCommand>,
) -> IngestReport {
    let mut report = IngestReport::default();

    while let Some(command) = commands.recv().await {
        let snapshot = {
            let mut session = session.write().await;
            match command {
                SessionCommand::Start(params) => {
                    session.reset(params.start_year, params.end_year);
                    report = IngestReport::default();
                }
                SessionCommand::Event(event) => {
                    let kind = event.kind();
                    match session.apply(event) {
                        Ok(()) => {
                            report.applied = report.applied.saturating_add(1);
                            debug!(kind, "event applied");
                        }
                        Err(err @ SessionError::OutOfOrder { .. }) => {
                            report.dropped = report.dropped.saturating_add(1);
                            warn!(error = %err, "dropping year sample");
                        }
                    }
                }
                SessionCommand::Flush(reply) => {
                    // The receiver may have given up waiting.
                    let _ = reply.send(report);
                    continue;
                }
            }
            SessionBroadcast::from_session(&session)
        };
        // Zero receivers is normal when no WebSocket client is connected.
        let _ = tx.send(snapshot);
    }

    info!(
        applied = report.applied,
        dropped = report.dropped,
        "ingest queue closed"
    );
    report
}
