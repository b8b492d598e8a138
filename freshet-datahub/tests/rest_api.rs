use httpmock::prelude::*;
use serde_json::json;

use freshet_core::service::{Page, SignupService};
use freshet_core::FreshetError;
use freshet_datahub::HubClient;
use freshet_types::{Bookmark, CreateSignupInput, HubConfig, ResourceFilter, SignupState};

const BASE: &str = "/api/v1/Tenants/tenant/Namespaces/ns";

fn client_for(server: &MockServer) -> HubClient {
    let cfg = HubConfig {
        resource: server.base_url(),
        api_version: "v1".into(),
        tenant_id: "tenant".into(),
        namespace_id: "ns".into(),
        client_id: "cid".into(),
        client_secret: "secret".into(),
    };
    HubClient::from_config(&cfg).unwrap()
}

fn signup_body(state: &str) -> serde_json::Value {
    json!({
        "id": "sg-1",
        "name": "signupSample",
        "type": "Stream",
        "signupState": state,
        "createdDate": "2024-05-01T00:00:00Z",
        "modifiedDate": "2024-05-01T00:00:00Z"
    })
}

async fn mock_token(server: &MockServer) -> httpmock::Mock<'_> {
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/identity/connect/token")
                .body_includes("grant_type=client_credentials")
                .body_includes("client_id=cid");
            then.status(200)
                .json_body(json!({"access_token": "tok-1", "expires_in": 3600, "token_type": "Bearer"}));
        })
        .await
}

#[tokio::test]
async fn token_is_fetched_once_and_attached_as_bearer() {
    let server = MockServer::start_async().await;
    let token = mock_token(&server).await;
    let get = server
        .mock_async(|when, then| {
            when.method(GET)
                .path(format!("{BASE}/signups/sg-1"))
                .header("authorization", "Bearer tok-1");
            then.status(200).json_body(signup_body("Activating"));
        })
        .await;

    let client = client_for(&server);
    client.get_signup("sg-1").await.unwrap();
    client.get_signup("sg-1").await.unwrap();

    get.assert_hits_async(2).await;
    token.assert_hits_async(1).await;
}

#[tokio::test]
async fn create_signup_posts_wire_body() {
    let server = MockServer::start_async().await;
    mock_token(&server).await;
    let post = server
        .mock_async(|when, then| {
            when.method(POST).path(format!("{BASE}/signups")).json_body(json!({
                "name": "signupSample",
                "resourceType": "Stream",
                "resourceIds": ["stream_0", "stream_1"]
            }));
            then.status(201).json_body(signup_body("Activating"));
        })
        .await;

    let client = client_for(&server);
    let signup = client
        .create_signup(&CreateSignupInput::streams(
            "signupSample",
            vec!["stream_0".into(), "stream_1".into()],
        ))
        .await
        .unwrap();
    assert_eq!(signup.id, "sg-1");
    assert!(signup.signup_state.is_pre_active());
    post.assert_async().await;
}

#[tokio::test]
async fn get_signup_folds_get_updates_header_into_bookmark() {
    let server = MockServer::start_async().await;
    mock_token(&server).await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(format!("{BASE}/signups/sg-1"));
            then.status(200)
                .header(
                    "Get-Updates",
                    "https://hub.example.invalid/api/v1/Tenants/t/Namespaces/n/signups/sg-1/updates?bookmark=bm-42",
                )
                .json_body(signup_body("Active"));
        })
        .await;

    let client = client_for(&server);
    let signup = client.get_signup("sg-1").await.unwrap();
    assert_eq!(signup.signup_state, SignupState::Active);
    assert_eq!(signup.bookmark, Some(Bookmark::new("bm-42")));
}

#[tokio::test]
async fn body_bookmark_wins_over_header() {
    let server = MockServer::start_async().await;
    mock_token(&server).await;
    let mut body = signup_body("Active");
    body["bookmark"] = json!("bm-body");
    server
        .mock_async(|when, then| {
            when.method(GET).path(format!("{BASE}/signups/sg-1"));
            then.status(200).header("Get-Updates", "bm-header").json_body(body);
        })
        .await;

    let client = client_for(&server);
    let signup = client.get_signup("sg-1").await.unwrap();
    assert_eq!(signup.bookmark, Some(Bookmark::new("bm-body")));
}

#[tokio::test]
async fn non_success_carries_status_and_correlation_id() {
    let server = MockServer::start_async().await;
    mock_token(&server).await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(format!("{BASE}/signups/missing"));
            then.status(403).header("Operation-Id", "op-123").json_body(json!({}));
        })
        .await;

    let client = client_for(&server);
    let err = client.get_signup("missing").await.unwrap_err();
    match err {
        FreshetError::Request {
            endpoint,
            status,
            correlation_id,
        } => {
            assert!(endpoint.starts_with("GET "));
            assert_eq!(status, 403);
            assert_eq!(correlation_id.as_deref(), Some("op-123"));
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test]
async fn get_updates_sends_bookmark_and_parses_batch() {
    let server = MockServer::start_async().await;
    mock_token(&server).await;
    let updates = server
        .mock_async(|when, then| {
            when.method(GET)
                .path(format!("{BASE}/signups/sg-1/updates"))
                .query_param("bookmark", "bm-0");
            then.status(200).json_body(json!({
                "bookmark": "bm-1",
                "data": [{
                    "resourceId": "stream_0",
                    "operation": "Insert",
                    "events": [{"timestamp": "2024-05-01T00:00:00Z", "value": 10.0}]
                }]
            }));
        })
        .await;

    let client = client_for(&server);
    let batch = client
        .get_updates("sg-1", &Bookmark::new("bm-0"))
        .await
        .unwrap();
    assert_eq!(batch.bookmark, Bookmark::new("bm-1"));
    assert_eq!(batch.data.len(), 1);
    updates.assert_async().await;
}

#[tokio::test]
async fn resources_query_uses_filter_names() {
    let server = MockServer::start_async().await;
    mock_token(&server).await;
    let resources = server
        .mock_async(|when, then| {
            when.method(GET)
                .path(format!("{BASE}/signups/sg-1/resources"))
                .query_param("skip", "0")
                .query_param("count", "4")
                .query_param("resourceFilter", "All");
            then.status(200).json_body(json!({
                "resources": [{"resourceId": "stream_0", "isAccessible": true}]
            }));
        })
        .await;

    let client = client_for(&server);
    let out = client
        .get_signup_resources("sg-1", Page { skip: 0, count: 4 }, ResourceFilter::All)
        .await
        .unwrap();
    assert_eq!(out.len(), 1);
    resources.assert_async().await;
}

#[tokio::test]
async fn rejected_credentials_surface_as_auth_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/identity/connect/token");
            then.status(400).json_body(json!({"error": "invalid_client"}));
        })
        .await;

    let client = client_for(&server);
    let err = client.get_signup("sg-1").await.unwrap_err();
    assert!(matches!(err, FreshetError::Auth { .. }));
}

#[tokio::test]
async fn delete_of_missing_signup_reads_as_already_gone() {
    let server = MockServer::start_async().await;
    mock_token(&server).await;
    server
        .mock_async(|when, then| {
            when.method(DELETE).path(format!("{BASE}/signups/sg-9"));
            then.status(404).json_body(json!({}));
        })
        .await;

    let client = client_for(&server);
    let err = client.delete_signup("sg-9").await.unwrap_err();
    assert!(err.is_not_found());
}
