use chrono::{TimeZone, Utc};
use serde_json::json;

use freshet_core::service::{DataService, MetadataService, Page, SignupService};
use freshet_core::FreshetError;
use freshet_mock::MockHub;
use freshet_types::{
    Change, CreateSignupInput, ResourceChanges, ResourceFilter, SignupState, StreamDef, TypeDef,
};

async fn seed_streams(hub: &MockHub, ids: &[&str]) {
    let ty = hub
        .get_or_create_type(&TypeDef::timestamped_double("simpleType"))
        .await
        .unwrap();
    for id in ids {
        hub.get_or_create_stream(&StreamDef::new(*id, &ty.id))
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn signup_activates_after_polling_not_immediately() {
    let hub = MockHub::with_delays(2, 0);
    seed_streams(&hub, &["stream_0"]).await;

    let signup = hub
        .create_signup(&CreateSignupInput::streams("s", vec!["stream_0".into()]))
        .await
        .unwrap();
    assert!(signup.signup_state.is_pre_active());
    assert!(signup.bookmark.is_none(), "no bookmark before activation");

    // Two pre-active polls, then active with a bookmark.
    assert_eq!(
        hub.get_signup(&signup.id).await.unwrap().signup_state,
        SignupState::Activating
    );
    assert_eq!(
        hub.get_signup(&signup.id).await.unwrap().signup_state,
        SignupState::Activating
    );
    let active = hub.get_signup(&signup.id).await.unwrap();
    assert_eq!(active.signup_state, SignupState::Active);
    assert!(active.bookmark.is_some());
}

#[tokio::test]
async fn updates_before_activation_are_rejected() {
    let hub = MockHub::with_delays(1, 0);
    seed_streams(&hub, &["stream_0"]).await;
    let signup = hub
        .create_signup(&CreateSignupInput::streams("s", vec!["stream_0".into()]))
        .await
        .unwrap();

    let err = hub
        .get_updates(&signup.id, &freshet_types::Bookmark::new("mock-0"))
        .await
        .unwrap_err();
    assert!(matches!(err, FreshetError::Request { status: 409, .. }));
}

#[tokio::test]
async fn expired_signup_cannot_serve_updates() {
    let hub = MockHub::with_delays(0, 0);
    seed_streams(&hub, &["stream_0"]).await;
    let signup = hub
        .create_signup(&CreateSignupInput::streams("s", vec!["stream_0".into()]))
        .await
        .unwrap();
    let active = hub.get_signup(&signup.id).await.unwrap();
    let bookmark = active.bookmark.unwrap();

    hub.expire_signup(&signup.id);
    let err = hub.get_updates(&signup.id, &bookmark).await.unwrap_err();
    assert!(matches!(err, FreshetError::SignupExpired { .. }));
}

#[tokio::test]
async fn successive_polls_never_redeliver() {
    let hub = MockHub::with_delays(0, 0);
    seed_streams(&hub, &["stream_0", "stream_1"]).await;
    let signup = hub
        .create_signup(&CreateSignupInput::streams(
            "s",
            vec!["stream_0".into(), "stream_1".into()],
        ))
        .await
        .unwrap();
    let bookmark = hub.get_signup(&signup.id).await.unwrap().bookmark.unwrap();

    hub.insert_values("stream_0", &[json!({"value": 1})]).await.unwrap();
    let first = hub.get_updates(&signup.id, &bookmark).await.unwrap();
    assert_eq!(first.data.len(), 1);

    hub.insert_values("stream_1", &[json!({"value": 2})]).await.unwrap();
    let second = hub.get_updates(&signup.id, &first.bookmark).await.unwrap();
    assert_eq!(second.data.len(), 1);
    assert_eq!(second.data[0].resource_id, "stream_1");

    // Re-using the first bookmark would replay both writes; the advanced
    // one replays nothing.
    let third = hub.get_updates(&signup.id, &second.bookmark).await.unwrap();
    assert!(third.data.is_empty());
}

#[tokio::test]
async fn remove_window_reports_only_bounds() {
    let hub = MockHub::with_delays(0, 0);
    seed_streams(&hub, &["weather_0"]).await;
    let signup = hub
        .create_signup(&CreateSignupInput::streams("s", vec!["weather_0".into()]))
        .await
        .unwrap();
    let bookmark = hub.get_signup(&signup.id).await.unwrap().bookmark.unwrap();

    let start = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2024, 5, 2, 0, 0, 0).unwrap();
    hub.insert_values("weather_0", &[json!({"t": 1})]).await.unwrap();
    hub.remove_window_values("weather_0", start, end).await.unwrap();

    let batch = hub.get_updates(&signup.id, &bookmark).await.unwrap();
    assert_eq!(batch.data.len(), 2);
    match &batch.data[1].change {
        Change::RemoveWindow(windows) => {
            assert_eq!(windows.len(), 1);
            assert_eq!(windows[0].start, start);
            assert_eq!(windows[0].end, end);
        }
        other => panic!("expected RemoveWindow, got {other:?}"),
    }
}

#[tokio::test]
async fn added_resources_become_accessible_after_grace() {
    let hub = MockHub::with_delays(0, 2);
    seed_streams(&hub, &["stream_0", "newStream"]).await;
    let signup = hub
        .create_signup(&CreateSignupInput::streams("s", vec!["stream_0".into()]))
        .await
        .unwrap();
    hub.get_signup(&signup.id).await.unwrap();

    hub.update_signup_resources(&signup.id, &ResourceChanges::add(vec!["newStream".into()]))
        .await
        .unwrap();

    let resources = hub
        .get_signup_resources(&signup.id, Page::default(), ResourceFilter::All)
        .await
        .unwrap();
    let added = resources.iter().find(|r| r.resource_id == "newStream").unwrap();
    assert!(!added.is_accessible, "grace period applies right after add");

    // Grace is poll-driven; it lapses after two more queries.
    hub.get_signup_resources(&signup.id, Page::default(), ResourceFilter::All)
        .await
        .unwrap();
    let resources = hub
        .get_signup_resources(&signup.id, Page::default(), ResourceFilter::All)
        .await
        .unwrap();
    let added = resources.iter().find(|r| r.resource_id == "newStream").unwrap();
    assert!(added.is_accessible);
}

#[tokio::test]
async fn accessibility_filter_matches_names() {
    let hub = MockHub::with_delays(0, 5);
    seed_streams(&hub, &["stream_0", "pending"]).await;
    let signup = hub
        .create_signup(&CreateSignupInput::streams("s", vec!["stream_0".into()]))
        .await
        .unwrap();
    hub.update_signup_resources(&signup.id, &ResourceChanges::add(vec!["pending".into()]))
        .await
        .unwrap();

    let accessible = hub
        .get_signup_resources(&signup.id, Page::default(), ResourceFilter::Accessible)
        .await
        .unwrap();
    assert_eq!(accessible.len(), 1);
    assert_eq!(accessible[0].resource_id, "stream_0");

    let inaccessible = hub
        .get_signup_resources(&signup.id, Page::default(), ResourceFilter::Inaccessible)
        .await
        .unwrap();
    assert_eq!(inaccessible.len(), 1);
    assert_eq!(inaccessible[0].resource_id, "pending");
}

#[tokio::test]
async fn deleting_twice_reports_not_found() {
    let hub = MockHub::with_delays(0, 0);
    seed_streams(&hub, &["stream_0"]).await;
    let signup = hub
        .create_signup(&CreateSignupInput::streams("s", vec!["stream_0".into()]))
        .await
        .unwrap();

    hub.delete_signup(&signup.id).await.unwrap();
    let err = hub.delete_signup(&signup.id).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn injected_delete_failure_fires_exactly_once() {
    let hub = MockHub::with_delays(0, 0);
    seed_streams(&hub, &["stream_0"]).await;

    hub.fail_next_delete();
    let err = hub.delete_stream("stream_0").await.unwrap_err();
    assert!(matches!(err, FreshetError::Request { status: 500, .. }));

    // The switch is one-shot; the retry goes through.
    hub.delete_stream("stream_0").await.unwrap();
}

#[tokio::test]
async fn type_with_live_streams_cannot_be_deleted() {
    let hub = MockHub::with_delays(0, 0);
    seed_streams(&hub, &["stream_0"]).await;

    assert!(hub.delete_type("simpleType").await.is_err());
    hub.delete_stream("stream_0").await.unwrap();
    hub.delete_type("simpleType").await.unwrap();
}
