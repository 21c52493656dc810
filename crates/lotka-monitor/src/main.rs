//! Monitor binary for the Lotka population simulator.
//!
//! Wires the session aggregator, the ingest worker and the Observer API
//! together, then replays a producer event stream into the session.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `lotka-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Validate the run parameters and log advisories
//! 4. Create the shared state and spawn the ingest worker
//! 5. Start the Observer API server
//! 6. Start the run
//! 7. Replay the event source
//! 8. Log the final report
//! 9. Keep serving until Ctrl-C when `source.linger` is set

mod error;
mod report;
mod source;

use std::path::Path;
use std::sync::Arc;

use lotka_core::config::LogFormat;
use lotka_core::MonitorConfig;
use lotka_observer::{AppState, IngestReport, ServerConfig, SessionCommand};
use tokio::sync::oneshot;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::MonitorError;
use crate::report::FinalReport;

/// Application entry point for the monitor.
///
/// # Errors
///
/// Returns an error if configuration, validation, the observer or the
/// event source fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let config = load_config()?;

    // 2. Initialize structured logging.
    init_tracing(&config);
    info!(
        start_year = config.simulation.start_year,
        end_year = config.simulation.end_year,
        species = config.species.len(),
        source = config.source.path,
        "lotka-monitor starting"
    );

    // 3. Validate run parameters.
    lotka_core::validate(&config.simulation, &config.species).map_err(MonitorError::from)?;
    for advisory in lotka_core::advisories(&config.simulation, &config.species) {
        warn!(%advisory, "Run parameter advisory");
    }

    // 4. Shared state and ingest worker.
    let (app_state, commands) = AppState::new(config.species);
    let worker = lotka_observer::spawn_ingest_worker(&app_state, commands);
    info!("Ingest worker started");

    // 5. Observer API server.
    let server_config = ServerConfig::from(&config.observer);
    let observer = lotka_observer::spawn_observer(&server_config, Arc::new(app_state.clone()))
        .await
        .map_err(MonitorError::from)?;
    info!(addr = %observer.addr, "Observer API server started");

    // 6. Start the run.
    app_state
        .enqueue(SessionCommand::Start(config.simulation))
        .await
        .map_err(MonitorError::from)?;

    // 7. Replay the event source.
    let reader = source::open(&config.source).await?;
    let replay = source::replay(reader, &config.source.path, &app_state).await?;
    info!(
        lines = replay.lines,
        queued = replay.queued,
        malformed = replay.malformed,
        "Event source exhausted"
    );

    // 8. Final report.
    let ingest = flush(&app_state).await?;
    let report = {
        let session = app_state.session.read().await;
        FinalReport::build(&session, ingest, replay)
    };
    report.log();

    // 9. Linger.
    if config.source.linger {
        info!(addr = %observer.addr, "Serving final session until Ctrl-C");
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C");
        }
    }

    observer.task.abort();
    drop(app_state);
    worker.abort();
    info!("lotka-monitor shutdown complete");

    Ok(())
}

/// Initialize the global subscriber.
///
/// `RUST_LOG` wins over `logging.level`.
fn init_tracing(config: &MonitorConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init(),
    }
}

/// Wait until the ingest worker has applied everything queued so far.
async fn flush(state: &AppState) -> Result<IngestReport, MonitorError> {
    let (tx, rx) = oneshot::channel();
    state.enqueue(SessionCommand::Flush(tx)).await?;
    rx.await.map_err(|e| MonitorError::Ingest {
        message: e.to_string(),
    })
}

/// Load the monitor configuration from `lotka-config.yaml`.
///
/// Looks for the config file relative to the current working directory.
/// A missing file means defaults (plus environment overrides).
fn load_config() -> Result<MonitorConfig, MonitorError> {
    let config_path = Path::new("lotka-config.yaml");
    if config_path.exists() {
        Ok(MonitorConfig::from_file(config_path)?)
    } else {
        Ok(MonitorConfig::parse("")?)
    }
}
