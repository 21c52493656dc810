//! REST API endpoint handlers for the Observer server.
//!
//! Read handlers take the session read lock only. Write handlers never
//! touch the session; they queue a [`SessionCommand`] for the ingest
//! worker and answer `202 Accepted`.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Minimal HTML status page |
//! | `GET` | `/api/session` | Session summary |
//! | `GET` | `/api/statistics` | Per-species statistics (404 before the first sample) |
//! | `GET` | `/api/pie` | Latest population per species |
//! | `GET` | `/api/population` | Population series with predator/prey ratio |
//! | `GET` | `/api/phase` | Prey against predator totals |
//! | `GET` | `/api/performance` | Performance samples |
//! | `POST` | `/api/session/start` | Validate parameters and start a run |
//! | `POST` | `/api/events` | Queue one producer event |

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use axum::Json;
use chrono::{DateTime, Utc};
use lotka_types::{SessionEvent, SessionId, SessionPhase, SimulationParameters};
use tracing::info;

use crate::error::ObserverError;
use crate::ingest::SessionCommand;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response structs
// ---------------------------------------------------------------------------

/// Body of `GET /api/session`.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    /// Identifier of the current run.
    pub session_id: Option<SessionId>,
    /// Lifecycle phase.
    pub phase: SessionPhase,
    /// Whether events are still expected.
    pub running: bool,
    /// First simulated year.
    pub start_year: i32,
    /// Last simulated year.
    pub end_year: i32,
    /// Year of the latest accepted sample.
    pub current_year: Option<i32>,
    /// Percentage of the year range covered.
    pub progress: f64,
    /// Number of accepted year samples.
    pub year_samples: usize,
    /// Number of performance samples.
    pub performance_samples: usize,
    /// Latest report location.
    pub pdf_url: Option<String>,
    /// Producer failure message.
    pub error: Option<String>,
    /// Producer wall-clock time, in seconds.
    pub execution_time: Option<f64>,
    /// CPU cores the producer reported.
    pub cores_used: Option<u32>,
    /// When the run started.
    pub started_at: Option<DateTime<Utc>>,
    /// When the run finished.
    pub finished_at: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// GET / -- minimal HTML status page
// ---------------------------------------------------------------------------

/// Serve a minimal HTML page showing the session status and API links.
pub async fn index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let session = state.session.read().await;
    let current = session.state();
    let phase = format!("{:?}", current.phase);
    let year = current
        .current_year
        .map_or_else(|| String::from("-"), |y| y.to_string());
    let progress = format!("{:.1}%", current.progress);
    let samples = current.samples.len();
    let species = session
        .species()
        .iter()
        .map(|s| format!("{} ({:?})", s.label, s.role))
        .collect::<Vec<_>>()
        .join(", ");
    drop(session);

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>Lotka Observer</title>
    <style>
        body {{
            background: #0d1117;
            color: #c9d1d9;
            font-family: 'Cascadia Code', 'Fira Code', 'Consolas', monospace;
            padding: 2rem;
            max-width: 800px;
            margin: 0 auto;
        }}
        h1 {{ color: #58a6ff; margin-bottom: 0.25rem; }}
        .subtitle {{ color: #8b949e; margin-top: 0; }}
        .metric {{
            display: inline-block;
            background: #161b22;
            border: 1px solid #30363d;
            border-radius: 6px;
            padding: 1rem 1.5rem;
            margin: 0.5rem 0.5rem 0.5rem 0;
            min-width: 120px;
        }}
        .metric .label {{ color: #8b949e; font-size: 0.85rem; }}
        .metric .value {{ color: #58a6ff; font-size: 1.5rem; font-weight: bold; }}
        a {{ color: #58a6ff; text-decoration: none; }}
        ul {{ list-style: none; padding: 0; }}
        li {{ padding: 0.3rem 0; }}
        hr {{ border: none; border-top: 1px solid #30363d; margin: 1.5rem 0; }}
    </style>
</head>
<body>
    <h1>Lotka Observer</h1>
    <p class="subtitle">Tracking {species}</p>

    <div>
        <div class="metric">
            <div class="label">Phase</div>
            <div class="value">{phase}</div>
        </div>
        <div class="metric">
            <div class="label">Year</div>
            <div class="value">{year}</div>
        </div>
        <div class="metric">
            <div class="label">Progress</div>
            <div class="value">{progress}</div>
        </div>
        <div class="metric">
            <div class="label">Samples</div>
            <div class="value">{samples}</div>
        </div>
    </div>

    <hr>

    <h2>API Endpoints</h2>
    <ul>
        <li><a href="/api/session">/api/session</a> -- Session summary</li>
        <li><a href="/api/statistics">/api/statistics</a> -- Per-species statistics</li>
        <li><a href="/api/pie">/api/pie</a> -- Latest population per species</li>
        <li><a href="/api/population">/api/population</a> -- Population series</li>
        <li><a href="/api/phase">/api/phase</a> -- Phase-space trajectory</li>
        <li><a href="/api/performance">/api/performance</a> -- Performance samples</li>
    </ul>

    <h2>WebSocket</h2>
    <ul>
        <li><code>ws://host:port/ws/session</code> -- Live session snapshots</li>
    </ul>
</body>
</html>"#
    ))
}

// ---------------------------------------------------------------------------
// GET /api/session
// ---------------------------------------------------------------------------

/// Return the session summary without the sample sequences.
pub async fn get_session(State(state): State<Arc<AppState>>) -> Json<SessionSummary> {
    let session = state.session.read().await;
    let s = session.state();
    Json(SessionSummary {
        session_id: s.session_id,
        phase: s.phase,
        running: s.running(),
        start_year: s.start_year,
        end_year: s.end_year,
        current_year: s.current_year,
        progress: s.progress,
        year_samples: s.samples.len(),
        performance_samples: s.performance.len(),
        pdf_url: s.pdf_url.clone(),
        error: s.error.clone(),
        execution_time: s.execution_time,
        cores_used: s.cores_used,
        started_at: s.started_at,
        finished_at: s.finished_at,
    })
}

// ---------------------------------------------------------------------------
// GET /api/statistics
// ---------------------------------------------------------------------------

/// Return per-species statistics.
///
/// # Errors
///
/// Returns [`ObserverError::NotFound`] until the first year sample arrives.
pub async fn get_statistics(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ObserverError> {
    let session = state.session.read().await;
    let statistics = session
        .compute_statistics()
        .ok_or_else(|| ObserverError::NotFound(String::from("no samples yet")))?;
    Ok(Json(serde_json::to_value(statistics)?))
}

// ---------------------------------------------------------------------------
// Projections
// ---------------------------------------------------------------------------

/// Return the latest population per species.
pub async fn get_pie(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let slices = state.session.read().await.compute_pie_projection();
    Json(serde_json::json!({
        "count": slices.len(),
        "slices": slices,
    }))
}

/// Return one row per sample with the predator/prey ratio.
pub async fn get_population(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let rows = state.session.read().await.compute_population_series();
    Json(serde_json::json!({
        "count": rows.len(),
        "rows": rows,
    }))
}

/// Return prey against predator totals per sample.
pub async fn get_phase(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let points = state.session.read().await.compute_phase_trajectory();
    Json(serde_json::json!({
        "count": points.len(),
        "points": points,
    }))
}

/// Return performance samples in arrival order.
pub async fn get_performance(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let session = state.session.read().await;
    let samples = session.performance_series();
    Json(serde_json::json!({
        "count": samples.len(),
        "samples": samples,
    }))
}

// ---------------------------------------------------------------------------
// POST /api/session/start
// ---------------------------------------------------------------------------

/// Validate run parameters and queue a new run.
///
/// # Errors
///
/// Returns [`ObserverError::Validation`] (400) when the parameters are
/// rejected, and [`ObserverError::QueueClosed`] when the worker is gone.
pub async fn start_session(
    State(state): State<Arc<AppState>>,
    Json(params): Json<SimulationParameters>,
) -> Result<impl IntoResponse, ObserverError> {
    {
        let session = state.session.read().await;
        lotka_core::validate(&params, session.species())?;
        for advisory in lotka_core::advisories(&params, session.species()) {
            tracing::warn!(%advisory, "run parameter advisory");
        }
    }

    info!(
        start_year = params.start_year,
        end_year = params.end_year,
        "run start requested"
    );
    let body = serde_json::json!({
        "accepted": true,
        "startYear": params.start_year,
        "endYear": params.end_year,
    });
    state.enqueue(SessionCommand::Start(params)).await?;
    Ok((StatusCode::ACCEPTED, Json(body)))
}

// ---------------------------------------------------------------------------
// POST /api/events
// ---------------------------------------------------------------------------

/// Queue one producer event for the ingest worker.
///
/// # Errors
///
/// Returns [`ObserverError::QueueClosed`] when the worker is gone.
pub async fn post_event(
    State(state): State<Arc<AppState>>,
    Json(event): Json<SessionEvent>,
) -> Result<impl IntoResponse, ObserverError> {
    let kind = event.kind();
    state.enqueue(SessionCommand::Event(event)).await?;
    Ok((
        StatusCode::ACCEPTED,
        Json(serde_json::json!({ "accepted": kind })),
    ))
}
