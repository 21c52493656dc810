//! Observer startup helper for embedding in the monitor binary.
//!
//! [`spawn_observer`] binds the listener eagerly, so a port that is
//! already taken fails startup instead of a background task, then serves
//! the Observer API on its own Tokio task.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::server::{ServerConfig, ServerError};
use crate::state::AppState;

/// Errors that can occur when spawning the Observer server.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// The server failed to bind or start.
    #[error("server start error: {0}")]
    Server(#[from] ServerError),
}

/// A running Observer server.
#[derive(Debug)]
pub struct ObserverHandle {
    /// Address the listener is bound to (useful with port `0`).
    pub addr: SocketAddr,
    /// The serving task.
    pub task: JoinHandle<()>,
}

/// Bind the configured address and serve the Observer API in the
/// background.
///
/// # Errors
///
/// Returns [`StartupError::Server`] if the address does not parse or
/// cannot be bound.
pub async fn spawn_observer(
    config: &ServerConfig,
    state: Arc<AppState>,
) -> Result<ObserverHandle, StartupError> {
    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| ServerError::Bind(format!("bind failed on {addr}: {e}")))?;
    let addr = listener
        .local_addr()
        .map_err(|e| ServerError::Bind(format!("no local address: {e}")))?;

    let task = tokio::spawn(async move {
        if let Err(e) = crate::server::serve(listener, state).await {
            tracing::error!(error = %e, "Observer server exited with error");
        }
    });

    tracing::info!(%addr, "Observer server spawned on background task");

    Ok(ObserverHandle { addr, task })
}
