//! Background sync: decision failures and crop prefetch never block review.

use pairdeck_engine::{CropStatus, EXIT_DURATION, Screen};
use pairdeck_types::{CandidateId, EndpointSide};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{advance, app_for, candidate_json, loaded_app, start_matcher, wait_until};

#[tokio::test]
async fn failed_submit_is_counted_and_review_continues() {
    let server = start_matcher(vec![candidate_json("m-1", 0.9), candidate_json("m-2", 0.8)]).await;
    Mock::given(method("POST"))
        .and(path("/api/matches/m-1/decision"))
        .respond_with(ResponseTemplate::new(500).set_body_string("matcher down"))
        .expect(1)
        .mount(&server)
        .await;
    let mut app = loaded_app(&server).await;
    app.start_review();

    app.confirm();
    advance(&mut app, EXIT_DURATION);
    assert_eq!(app.machine().session().current_index(), 1);

    wait_until(&mut app, |app| app.sync_stats().failed == 1).await;
    assert_eq!(app.sync_stats().acknowledged, 0);
    assert_eq!(app.machine().session().counters().confirmed, 1);
}

#[tokio::test]
async fn unsuccessful_ack_counts_as_failure() {
    let server = start_matcher(vec![candidate_json("m-1", 0.9)]).await;
    Mock::given(method("POST"))
        .and(path("/api/matches/m-1/decision"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "success": false })))
        .mount(&server)
        .await;
    let mut app = loaded_app(&server).await;
    app.start_review();
    app.confirm();
    advance(&mut app, EXIT_DURATION);
    assert_eq!(app.machine().screen(), Screen::Summary);

    wait_until(&mut app, |app| app.sync_stats().failed == 1).await;
}

#[tokio::test]
async fn unreachable_server_yields_empty_queue() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/matches/queue"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let mut app = app_for(&server);
    app.reload();
    wait_until(&mut app, |app| !app.machine().is_loading()).await;

    assert!(app.machine().queue().is_empty());
    assert!(!app.machine().can_start());
}

#[tokio::test]
async fn start_prefetches_first_two_candidates() {
    let server = start_matcher(vec![
        candidate_json("m-1", 0.9),
        candidate_json("m-2", 0.8),
        candidate_json("m-3", 0.7),
    ])
    .await;
    let mut app = loaded_app(&server).await;
    app.start_review();

    let ready = |app: &pairdeck_engine::App, id: &str| {
        EndpointSide::BOTH.into_iter().all(|side| {
            matches!(
                app.crop_status(&CandidateId::new(id), side),
                Some(CropStatus::Ready { bytes: 2048 })
            )
        })
    };
    wait_until(&mut app, |app| ready(app, "m-1") && ready(app, "m-2")).await;
    assert_eq!(app.crop_status(&CandidateId::new("m-3"), EndpointSide::A), None);

    app.skip();
    advance(&mut app, pairdeck_engine::SKIP_FADE_DURATION);
    wait_until(&mut app, |app| ready(app, "m-3")).await;
    assert_eq!(app.sync_stats().prefetched, 6);
}

#[tokio::test]
async fn missing_crop_is_marked_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/matches/queue"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!([candidate_json("m-1", 0.9)])),
        )
        .mount(&server)
        .await;
    let mut app = loaded_app(&server).await;
    app.start_review();

    let id = CandidateId::new("m-1");
    wait_until(&mut app, |app| {
        app.crop_status(&id, EndpointSide::A) == Some(CropStatus::Unavailable)
            && app.crop_status(&id, EndpointSide::B) == Some(CropStatus::Unavailable)
    })
    .await;
    assert_eq!(app.sync_stats().prefetch_failed, 2);
    assert_eq!(app.machine().screen(), Screen::Review);
}
