//! Shared test utilities and fixtures
//!
//! A mock matcher server plus helpers for driving an [`App`] against it.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pairdeck_backend::HttpBackend;
use pairdeck_engine::{App, AppSettings};

/// Wire record for one candidate, in the shape the matcher returns.
pub fn candidate_json(id: &str, confidence: f64) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "endpoint_a": {
            "source_id": "cam-1",
            "track_id": format!("{id}-a"),
            "first_seen": "2024-05-01T10:00:00Z",
            "last_seen": "2024-05-01T10:00:12Z",
            "classification": { "label": "car", "score": 0.97 }
        },
        "endpoint_b": {
            "source_id": "cam-2",
            "track_id": format!("{id}-b"),
            "first_seen": "2024-05-01T10:01:30Z",
            "last_seen": "2024-05-01T10:01:41Z"
        },
        "confidence": confidence,
        "match_method": "reid",
        "entity_type": "vehicle"
    })
}

/// Start a matcher mock serving `records` from the queue route.
///
/// Crop routes answer with a small body so prefetches settle quietly.
pub async fn start_matcher(records: Vec<serde_json::Value>) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/matches/queue"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::Value::Array(records)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/api/matches/[^/]+/crop/[ab]$"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 2048]))
        .mount(&server)
        .await;
    server
}

/// Acknowledge every decision for `id`, expecting exactly `times` posts.
pub async fn expect_decision(server: &MockServer, id: &str, body: serde_json::Value, times: u64) {
    Mock::given(method("POST"))
        .and(path(format!("/api/matches/{id}/decision")))
        .and(wiremock::matchers::body_json(body))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "success": true })))
        .expect(times)
        .mount(server)
        .await;
}

/// Settings that never touch the user's config file.
pub fn test_settings() -> AppSettings {
    AppSettings {
        config_path: None,
        ..AppSettings::from_config(None)
    }
}

pub fn app_for(server: &MockServer) -> App {
    let backend = HttpBackend::new(&server.uri(), Duration::from_secs(5)).unwrap();
    App::new(Arc::new(backend), test_settings())
}

/// Drain background results without moving time forward.
pub fn drain(app: &mut App) {
    let now = app.clock();
    app.advance_clock(now);
}

/// Poll real time until `done` holds, draining results in between.
pub async fn wait_until(app: &mut App, mut done: impl FnMut(&App) -> bool) {
    for _ in 0..200 {
        drain(app);
        if done(app) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not reached in time");
}

/// Reload and wait for the queue to arrive.
pub async fn loaded_app(server: &MockServer) -> App {
    let mut app = app_for(server);
    app.reload();
    wait_until(&mut app, |app| !app.machine().is_loading()).await;
    app
}

/// Move the app clock forward, firing due timers.
pub fn advance(app: &mut App, by: Duration) {
    let now = app.clock() + by;
    app.advance_clock(now);
}
