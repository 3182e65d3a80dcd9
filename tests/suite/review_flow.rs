//! End-to-end review flows against a mock matcher.

use std::time::Duration;

use pairdeck_engine::{EXIT_DURATION, ReasonInput, SKIP_FADE_DURATION, Screen, UNDO_HIDE_AFTER};
use pairdeck_types::ConfidenceFilter;
use wiremock::matchers::{method, path_regex};
use wiremock::{Mock, ResponseTemplate};

use crate::common::{
    advance, candidate_json, drain, expect_decision, loaded_app, start_matcher, wait_until,
};

fn confirm_body() -> serde_json::Value {
    serde_json::json!({ "reject": false, "rejection_reason": null })
}

#[tokio::test]
async fn queue_keeps_server_order_and_filters_locally() {
    let server = start_matcher(vec![
        candidate_json("m-1", 0.9),
        candidate_json("m-2", 0.4),
        candidate_json("m-3", 0.7),
    ])
    .await;
    let mut app = loaded_app(&server).await;

    let ids: Vec<_> = app.machine().queue().iter().map(|c| c.id.to_string()).collect();
    assert_eq!(ids, ["m-1", "m-2", "m-3"]);

    let counts = app.machine().filter_counts();
    assert_eq!(counts.get(ConfidenceFilter::All), 3);
    assert_eq!(counts.get(ConfidenceFilter::High), 2);
    assert_eq!(counts.get(ConfidenceFilter::Low), 1);

    app.select_filter(ConfidenceFilter::High);
    let ids: Vec<_> = app.machine().queue().iter().map(|c| c.id.to_string()).collect();
    assert_eq!(ids, ["m-1", "m-3"]);

    app.select_filter(ConfidenceFilter::Low);
    assert_eq!(app.machine().queue().len(), 1);
}

#[tokio::test]
async fn confirm_posts_verdict_and_advances_after_exit() {
    let server = start_matcher(vec![candidate_json("m-1", 0.9), candidate_json("m-2", 0.8)]).await;
    expect_decision(&server, "m-1", confirm_body(), 1).await;
    let mut app = loaded_app(&server).await;

    app.start_review();
    assert_eq!(app.machine().screen(), Screen::Review);

    app.confirm();
    assert!(app.machine().session().is_animating());
    assert_eq!(app.machine().session().current_index(), 0);

    advance(&mut app, EXIT_DURATION);
    assert_eq!(app.machine().session().current_index(), 1);
    assert_eq!(app.machine().current().map(|c| c.id.to_string()).as_deref(), Some("m-2"));

    wait_until(&mut app, |app| app.sync_stats().acknowledged == 1).await;
}

#[tokio::test]
async fn reject_with_preset_reason_sends_tag() {
    let server = start_matcher(vec![candidate_json("m-1", 0.9)]).await;
    expect_decision(
        &server,
        "m-1",
        serde_json::json!({ "reject": true, "rejection_reason": "not_same_vehicle" }),
        1,
    )
    .await;
    let mut app = loaded_app(&server).await;
    app.start_review();

    app.reject();
    assert!(app.machine().reason().is_some());

    // Submit before choosing does nothing.
    app.reason_input(ReasonInput::Submit);
    assert!(app.machine().reason().is_some());

    app.reason_input(ReasonInput::Choose(0));
    app.reason_input(ReasonInput::Submit);
    assert!(app.machine().reason().is_none());

    advance(&mut app, EXIT_DURATION);
    assert_eq!(app.machine().screen(), Screen::Summary);
    wait_until(&mut app, |app| app.sync_stats().acknowledged == 1).await;
}

#[tokio::test]
async fn reject_with_other_text_and_without_reason() {
    let server = start_matcher(vec![candidate_json("m-1", 0.9), candidate_json("m-2", 0.3)]).await;
    expect_decision(
        &server,
        "m-1",
        serde_json::json!({ "reject": true, "rejection_reason": "other: two cars" }),
        1,
    )
    .await;
    expect_decision(
        &server,
        "m-2",
        serde_json::json!({ "reject": true, "rejection_reason": null }),
        1,
    )
    .await;
    let mut app = loaded_app(&server).await;
    app.start_review();

    app.reject();
    app.reason_input(ReasonInput::Choose(5));
    for ch in "two cars".chars() {
        app.reason_input(ReasonInput::Type(ch));
    }
    app.reason_input(ReasonInput::Submit);
    advance(&mut app, EXIT_DURATION);

    app.reject();
    app.reason_input(ReasonInput::SkipReason);
    advance(&mut app, EXIT_DURATION);

    assert_eq!(app.machine().screen(), Screen::Summary);
    assert_eq!(app.machine().summary().rejected, 2);
    wait_until(&mut app, |app| app.sync_stats().acknowledged == 2).await;
}

#[tokio::test]
async fn dismissing_reason_leaves_card_in_place() {
    let server = start_matcher(vec![candidate_json("m-1", 0.9)]).await;
    Mock::given(method("POST"))
        .and(path_regex(r"/decision$"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let mut app = loaded_app(&server).await;
    app.start_review();

    app.reject();
    app.escape();
    assert!(app.machine().reason().is_none());
    assert_eq!(app.machine().session().current_index(), 0);
    assert!(app.machine().session().history().is_empty());
    assert!(app.card_pose().is_neutral());
}

#[tokio::test]
async fn skip_is_local_and_feeds_review_skipped() {
    let server = start_matcher(vec![
        candidate_json("m-1", 0.9),
        candidate_json("m-2", 0.5),
        candidate_json("m-3", 0.6),
    ])
    .await;
    Mock::given(method("POST"))
        .and(path_regex(r"^/api/matches/m-(2|3)/decision$"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    expect_decision(&server, "m-1", confirm_body(), 1).await;
    let mut app = loaded_app(&server).await;
    app.start_review();

    app.confirm();
    advance(&mut app, EXIT_DURATION);
    app.skip();
    advance(&mut app, SKIP_FADE_DURATION);
    app.skip();
    advance(&mut app, SKIP_FADE_DURATION);

    assert_eq!(app.machine().screen(), Screen::Summary);
    let summary = app.machine().summary();
    assert_eq!((summary.confirmed, summary.rejected, summary.skipped), (1, 0, 2));
    assert_eq!(summary.percent(), 33);

    app.review_skipped();
    assert_eq!(app.machine().screen(), Screen::Review);
    let ids: Vec<_> = app.machine().queue().iter().map(|c| c.id.to_string()).collect();
    assert_eq!(ids, ["m-2", "m-3"]);
    assert_eq!(app.machine().session().counters().total(), 0);

    wait_until(&mut app, |app| app.sync_stats().acknowledged == 1).await;
}

#[tokio::test]
async fn undo_restores_card_without_second_request() {
    let server = start_matcher(vec![candidate_json("m-1", 0.9), candidate_json("m-2", 0.8)]).await;
    expect_decision(&server, "m-1", confirm_body(), 1).await;
    let mut app = loaded_app(&server).await;
    app.start_review();

    app.confirm();
    advance(&mut app, EXIT_DURATION);
    assert!(app.machine().undo_visible());

    app.undo();
    assert_eq!(app.machine().session().current_index(), 0);
    assert_eq!(app.machine().session().counters().total(), 0);
    assert!(!app.machine().undo_visible());

    wait_until(&mut app, |app| app.sync_stats().acknowledged == 1).await;
    assert_eq!(app.sync_stats().submitted, 1);
}

#[tokio::test]
async fn undo_toast_hides_on_its_own() {
    let server = start_matcher(vec![candidate_json("m-1", 0.9), candidate_json("m-2", 0.8)]).await;
    let mut app = loaded_app(&server).await;
    app.start_review();

    app.skip();
    assert!(app.machine().undo_visible());
    advance(&mut app, UNDO_HIDE_AFTER - Duration::from_millis(1));
    assert!(app.machine().undo_visible());
    advance(&mut app, Duration::from_millis(1));
    assert!(!app.machine().undo_visible());
}

#[tokio::test]
async fn back_from_summary_reloads_queue() {
    let server = start_matcher(vec![candidate_json("m-1", 0.9)]).await;
    let mut app = loaded_app(&server).await;
    app.start_review();
    app.skip();
    advance(&mut app, SKIP_FADE_DURATION);
    assert_eq!(app.machine().screen(), Screen::Summary);

    app.back();
    assert_eq!(app.machine().screen(), Screen::Queue);
    assert!(app.machine().is_loading());
    wait_until(&mut app, |app| !app.machine().is_loading()).await;
    assert_eq!(app.machine().queue().len(), 1);
}

#[tokio::test]
async fn empty_queue_cannot_start() {
    let server = start_matcher(Vec::new()).await;
    let mut app = loaded_app(&server).await;
    assert!(!app.machine().can_start());
    app.start_review();
    assert_eq!(app.machine().screen(), Screen::Queue);
    drain(&mut app);
}
