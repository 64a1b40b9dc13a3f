// ABOUTME: Tests for bounded status polling.
// ABOUTME: Covers success, the failure status, the deadline, and fatal fetch errors.

mod support;

use std::time::Duration;

use serde_json::json;
use support::platform::FakePlatform;
use tokio::time::Instant;
use v3push::api::Method;
use v3push::deploy::{DeployError, PollSpec, poll_status};

const BUILD: &str = "/v3/builds/build-1";

fn build_spec() -> PollSpec {
    PollSpec::new(BUILD, "STAGED")
        .failure_status("FAILED")
        .interval(Duration::from_millis(10))
        .timeout(Duration::from_secs(5))
        .failure_message("Build failed to stage")
}

#[tokio::test]
async fn returns_on_first_success_without_another_fetch() {
    support::init_tracing();
    let platform = FakePlatform::new();
    platform.respond(Method::Get, BUILD, json!({"guid": "build-1", "state": "STAGED"}));

    poll_status(&platform, &build_spec()).await.unwrap();

    assert_eq!(platform.count(Method::Get, BUILD), 1);
}

#[tokio::test]
async fn keeps_polling_until_success() {
    let platform = FakePlatform::new();
    platform
        .respond(Method::Get, BUILD, json!({"state": "STAGING"}))
        .respond(Method::Get, BUILD, json!({"state": "STAGING"}))
        .respond(Method::Get, BUILD, json!({"state": "STAGED"}));

    poll_status(&platform, &build_spec()).await.unwrap();

    assert_eq!(platform.count(Method::Get, BUILD), 3);
}

#[tokio::test]
async fn failure_status_stops_immediately() {
    let platform = FakePlatform::new();
    platform.respond(Method::Get, BUILD, json!({"state": "FAILED"}));

    let err = poll_status(&platform, &build_spec()).await.unwrap_err();

    assert!(matches!(&err, DeployError::StageFailed(msg) if msg == "Build failed to stage"));
    assert_eq!(platform.count(Method::Get, BUILD), 1);
}

#[tokio::test]
async fn deadline_produces_timeout() {
    let platform = FakePlatform::new();
    platform.respond(Method::Get, "/v3/packages/pkg-1", json!({"state": "PENDING"}));
    let spec = PollSpec::new("/v3/packages/pkg-1", "READY")
        .timeout(Duration::from_millis(50))
        .interval(Duration::from_millis(10))
        .failure_message("Package failed to upload");

    let started = Instant::now();
    let err = poll_status(&platform, &spec).await.unwrap_err();

    assert!(matches!(&err, DeployError::Timeout(msg) if msg == "Package failed to upload"));
    assert!(started.elapsed() >= Duration::from_millis(50));
    assert!(platform.count(Method::Get, "/v3/packages/pkg-1") >= 2);
}

#[tokio::test]
async fn status_field_is_accepted() {
    let platform = FakePlatform::new();
    platform.respond(Method::Get, "/v3/packages/pkg-1", json!({"status": "READY"}));

    poll_status(&platform, &PollSpec::new("/v3/packages/pkg-1", "READY"))
        .await
        .unwrap();
}

#[tokio::test]
async fn transport_error_is_fatal() {
    let platform = FakePlatform::new();
    platform.fail(Method::Get, BUILD);

    let err = poll_status(&platform, &build_spec()).await.unwrap_err();

    assert!(matches!(err, DeployError::Transport { .. }));
    assert_eq!(platform.count(Method::Get, BUILD), 1);
}

#[tokio::test]
async fn error_payload_is_fatal_not_pending() {
    let platform = FakePlatform::new();
    platform.respond(
        Method::Get,
        BUILD,
        json!({"errors": [{"code": 10010, "title": "CF-ResourceNotFound", "detail": "Build not found"}]}),
    );

    let err = poll_status(&platform, &build_spec()).await.unwrap_err();

    match err {
        DeployError::Resource { payload, .. } => {
            assert!(payload.to_string().contains("Build not found"));
        }
        other => panic!("expected resource error, got {other:?}"),
    }
}

#[tokio::test]
async fn unbounded_timeout_still_polls() {
    let platform = FakePlatform::new();
    platform
        .respond(Method::Get, BUILD, json!({"state": "STAGING"}))
        .respond(Method::Get, BUILD, json!({"state": "STAGED"}));
    let spec = build_spec().timeout(Duration::MAX);

    poll_status(&platform, &spec).await.unwrap();

    assert_eq!(platform.count(Method::Get, BUILD), 2);
}
