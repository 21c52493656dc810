//! JSON-lines event source.
//!
//! Each non-blank line is one adjacently tagged [`SessionEvent`], e.g.
//! `{"event":"year_update","data":{"year":2024,"rabbits":110,"wolves":22}}`.
//! Malformed lines are logged and skipped; they never stop the replay.

use lotka_core::config::SourceConfig;
use lotka_observer::{AppState, SessionCommand};
use lotka_types::SessionEvent;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

use crate::error::MonitorError;

/// Line counters for one replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayStats {
    /// Lines read, blank ones included.
    pub lines: u64,
    /// Events handed to the ingest queue.
    pub queued: u64,
    /// Lines that did not parse as an event.
    pub malformed: u64,
}

/// Parse one line. Blank lines yield `Ok(None)`.
///
/// # Errors
///
/// Returns the JSON error for a line that is not a valid event.
pub fn parse_line(line: &str) -> Result<Option<SessionEvent>, serde_json::Error> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    serde_json::from_str(line).map(Some)
}

/// Open the configured source as a buffered async reader.
///
/// # Errors
///
/// Returns [`MonitorError::Source`] if the file cannot be opened.
pub async fn open(
    config: &SourceConfig,
) -> Result<Box<dyn AsyncBufRead + Unpin + Send>, MonitorError> {
    if config.is_stdin() {
        info!("Reading events from stdin");
        return Ok(Box::new(BufReader::new(tokio::io::stdin())));
    }

    let file = tokio::fs::File::open(&config.path)
        .await
        .map_err(|source| MonitorError::Source {
            path: config.path.clone(),
            source,
        })?;
    info!(path = config.path, "Reading events from file");
    Ok(Box::new(BufReader::new(file)))
}

/// Feed every event in `reader` to the ingest queue, in order.
///
/// # Errors
///
/// Returns [`MonitorError::Source`] on a read failure and
/// [`MonitorError::Ingest`] if the ingest worker has stopped.
pub async fn replay<R>(reader: R, path: &str, state: &AppState) -> Result<ReplayStats, MonitorError>
where
    R: AsyncBufRead + Unpin,
{
    let mut stats = ReplayStats::default();
    let mut lines = reader.lines();

    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|source| MonitorError::Source {
            path: path.to_owned(),
            source,
        })?
    {
        stats.lines = stats.lines.saturating_add(1);
        match parse_line(&line) {
            Ok(Some(event)) => {
                debug!(line = stats.lines, kind = event.kind(), "event read");
                state.enqueue(SessionCommand::Event(event)).await?;
                stats.queued = stats.queued.saturating_add(1);
            }
            Ok(None) => {}
            Err(e) => {
                stats.malformed = stats.malformed.saturating_add(1);
                warn!(line = stats.lines, error = %e, "skipping malformed event line");
            }
        }
    }

    Ok(stats)
}
