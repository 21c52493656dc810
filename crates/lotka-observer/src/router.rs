//! Axum router construction for the Observer API.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;
use crate::ws;

/// Build the complete Axum router for the Observer server.
///
/// The router includes:
/// - `GET /` -- minimal HTML status page
/// - `GET /ws/session` -- `WebSocket` session snapshot stream
/// - `GET /api/session` -- session summary
/// - `GET /api/statistics` -- per-species statistics
/// - `GET /api/pie`, `/api/population`, `/api/phase`, `/api/performance`
///   -- chart projections
/// - `POST /api/session/start` -- start a run
/// - `POST /api/events` -- queue a producer event
///
/// CORS allows any origin so a dashboard served elsewhere can connect.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::index))
        .route("/ws/session", get(ws::ws_session))
        .route("/api/session", get(handlers::get_session))
        .route("/api/session/start", post(handlers::start_session))
        .route("/api/statistics", get(handlers::get_statistics))
        .route("/api/pie", get(handlers::get_pie))
        .route("/api/population", get(handlers::get_population))
        .route("/api/phase", get(handlers::get_phase))
        .route("/api/performance", get(handlers::get_performance))
        .route("/api/events", post(handlers::post_event))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
