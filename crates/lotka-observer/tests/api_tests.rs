//! Integration tests for the Observer API endpoints.
//!
//! Tests use Axum's `Router` directly via `tower::ServiceExt` without
//! starting a TCP server. Writes go through a real ingest worker; each
//! test flushes the queue before reading.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use lotka_observer::ingest::{spawn_ingest_worker, IngestReport, SessionCommand};
use lotka_observer::router::build_router;
use lotka_observer::state::AppState;
use lotka_types::{SessionEvent, SimulationParameters, SpeciesSet, YearSample};
use serde_json::{json, Value};
use tokio::sync::oneshot;
use tower::ServiceExt;

fn make_test_state(species: SpeciesSet) -> AppState {
    let (state, rx) = AppState::new(species);
    spawn_ingest_worker(&state, rx);
    state
}

async fn flush(state: &AppState) -> IngestReport {
    let (tx, rx) = oneshot::channel();
    state.enqueue(SessionCommand::Flush(tx)).await.unwrap();
    rx.await.unwrap()
}

/// Start a 2023-2033 run and ingest three rabbit/wolf samples.
async fn make_running_state() -> AppState {
    let state = make_test_state(SpeciesSet::default());
    state
        .enqueue(SessionCommand::Start(SimulationParameters::default()))
        .await
        .unwrap();
    for (year, rabbits, wolves) in [(2023, 110.0, 20.0), (2024, 100.0, 22.0), (2025, 90.0, 25.0)] {
        let sample = YearSample::new(year)
            .with("rabbits", rabbits)
            .with("wolves", wolves);
        state
            .enqueue(SessionCommand::Event(SessionEvent::Year(sample)))
            .await
            .unwrap();
    }
    flush(&state).await;
    state
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn get_json(state: &AppState, path: &str) -> (StatusCode, Value) {
    let router = build_router(Arc::new(state.clone()));
    let response = router
        .oneshot(Request::get(path).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

async fn post_json(state: &AppState, path: &str, body: &Value) -> (StatusCode, Value) {
    let router = build_router(Arc::new(state.clone()));
    let response = router
        .oneshot(
            Request::post(path)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

// =========================================================================
// Tests
// =========================================================================

#[tokio::test]
async fn test_index_returns_html() {
    let state = make_running_state().await;
    let router = build_router(Arc::new(state));

    let response = router
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(content_type.contains("text/html"));
}

#[tokio::test]
async fn test_idle_session() {
    let state = make_test_state(SpeciesSet::default());
    let (status, json) = get_json(&state, "/api/session").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["phase"], "Idle");
    assert_eq!(json["running"], false);
    assert_eq!(json["yearSamples"], 0);
    assert!(json["sessionId"].is_null());
}

#[tokio::test]
async fn test_running_session_summary() {
    let state = make_running_state().await;
    let (status, json) = get_json(&state, "/api/session").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["phase"], "Running");
    assert_eq!(json["running"], true);
    assert_eq!(json["startYear"], 2023);
    assert_eq!(json["endYear"], 2033);
    assert_eq!(json["currentYear"], 2025);
    assert_eq!(json["progress"], 20.0);
    assert_eq!(json["yearSamples"], 3);
    assert!(json["sessionId"].is_string());
    assert!(json["startedAt"].is_string());
}

#[tokio::test]
async fn test_statistics_not_found_before_samples() {
    let state = make_test_state(SpeciesSet::default());
    let (status, json) = get_json(&state, "/api/statistics").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["status"], 404);
}

#[tokio::test]
async fn test_statistics() {
    let state = make_running_state().await;
    let (status, json) = get_json(&state, "/api/statistics").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["sampleCount"], 3);
    assert_eq!(json["firstYear"], 2023);
    assert_eq!(json["lastYear"], 2025);

    let rabbits = &json["species"][0];
    assert_eq!(rabbits["species"], "rabbits");
    assert_eq!(rabbits["growth"], "-18.18");
    assert_eq!(rabbits["min"], 90.0);
    assert_eq!(rabbits["max"], 110.0);
    assert_eq!(rabbits["current"], 90.0);

    let wolves = &json["species"][1];
    assert_eq!(wolves["growth"], "25.00");
}

#[tokio::test]
async fn test_pie() {
    let state = make_running_state().await;
    let (status, json) = get_json(&state, "/api/pie").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["count"], 2);
    assert_eq!(json["slices"][0]["name"], "Rabbits");
    assert_eq!(json["slices"][0]["value"], 90.0);
    assert_eq!(json["slices"][1]["name"], "Wolves");
    assert_eq!(json["slices"][1]["value"], 25.0);
}

#[tokio::test]
async fn test_population_and_phase() {
    let state = make_running_state().await;

    let (status, json) = get_json(&state, "/api/population").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["count"], 3);
    assert_eq!(json["rows"][0]["year"], 2023);
    assert_eq!(json["rows"][0]["ratio"], "0.18");

    let (status, json) = get_json(&state, "/api/phase").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["count"], 3);
    assert_eq!(json["points"][2]["prey"], 90.0);
    assert_eq!(json["points"][2]["predators"], 25.0);
}

#[tokio::test]
async fn test_post_events() {
    let state = make_test_state(SpeciesSet::default());
    let (status, _) = post_json(
        &state,
        "/api/session/start",
        &json!({ "start_year": 2023, "end_year": 2033 }),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);

    let events = [
        json!({"event": "year_update", "data": {"year": 2023, "rabbits": 100, "wolves": 20}}),
        json!({"event": "performance_update", "data": {"year": 2023, "timePerYear": 0.02, "memoryUsage": 48.5, "cores": 8}}),
        json!({"event": "year_update", "data": {"year": 2023, "rabbits": 100, "wolves": 20}}),
        json!({"event": "pdf_ready", "data": {"pdfUrl": "http://host/static/report.pdf", "executionTime": 1.7}}),
    ];
    for event in &events {
        let (status, _) = post_json(&state, "/api/events", event).await;
        assert_eq!(status, StatusCode::ACCEPTED);
    }
    let report = flush(&state).await;
    assert_eq!(report, IngestReport { applied: 3, dropped: 1 });

    let (_, json) = get_json(&state, "/api/session").await;
    assert_eq!(json["phase"], "Completed");
    assert_eq!(json["running"], false);
    assert_eq!(json["pdfUrl"], "http://host/static/report.pdf");
    assert_eq!(json["executionTime"], 1.7);
    assert_eq!(json["coresUsed"], 8);
    assert_eq!(json["yearSamples"], 1);

    let (_, json) = get_json(&state, "/api/performance").await;
    assert_eq!(json["count"], 1);
    assert_eq!(json["samples"][0]["timePerYear"], 0.02);
}

#[tokio::test]
async fn test_upstream_error_is_kept_verbatim() {
    let state = make_running_state().await;
    let (status, _) = post_json(
        &state,
        "/api/events",
        &json!({"event": "error", "data": {"message": "Simulation failed: boom"}}),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    flush(&state).await;

    let (_, json) = get_json(&state, "/api/session").await;
    assert_eq!(json["phase"], "Errored");
    assert_eq!(json["error"], "Simulation failed: boom");
    assert_eq!(json["yearSamples"], 3);

    let (status, _) = get_json(&state, "/api/statistics").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_start_rejects_invalid_parameters() {
    let state = make_test_state(SpeciesSet::default());
    let (status, json) = post_json(
        &state,
        "/api/session/start",
        &json!({ "start_year": 2030, "end_year": 2020 }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "End year must be greater than start year");
    assert_eq!(json["status"], 400);

    flush(&state).await;
    let (_, json) = get_json(&state, "/api/session").await;
    assert_eq!(json["phase"], "Idle");
}

#[tokio::test]
async fn test_start_requires_every_species_population() {
    let state = make_test_state(SpeciesSet::with_foxes());
    let (status, json) = post_json(
        &state,
        "/api/session/start",
        &json!({ "initial_populations": { "rabbits": 100, "wolves": 20 } }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Initial populations must be greater than zero");
}

#[tokio::test]
async fn test_start_rejects_negative_population() {
    let state = make_test_state(SpeciesSet::default());
    let (status, json) = post_json(
        &state,
        "/api/session/start",
        &json!({ "initial_populations": { "rabbits": -5, "wolves": 20 } }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Initial populations must be greater than zero");
    assert_eq!(json["status"], 400);
}

#[tokio::test]
async fn test_malformed_event_is_rejected() {
    let state = make_test_state(SpeciesSet::default());
    let (status, _) = post_json(&state, "/api/events", &json!({"event": "nope"})).await;
    assert!(status.is_client_error());
}
