// ABOUTME: Tests for route create-or-find.
// ABOUTME: A host-taken conflict triggers exactly one lookup; other failures are fatal.

mod support;

use serde_json::json;
use support::platform::{FakePlatform, host_taken, route};
use v3push::api::Method;
use v3push::deploy::{DeployError, ROUTES_PATH, resolve_route, route_lookup_path};
use v3push::types::{DomainId, SpaceId};

fn domain() -> DomainId {
    DomainId::new("domain-1")
}

fn space() -> SpaceId {
    SpaceId::new("space-1")
}

#[tokio::test]
async fn created_route_is_used_without_lookup() {
    let platform = FakePlatform::new();
    platform.respond(Method::Post, ROUTES_PATH, route("route-new", "demo", "domain-1"));

    let id = resolve_route(&platform, "demo", &domain(), &space())
        .await
        .unwrap();

    assert_eq!(id.as_str(), "route-new");
    assert_eq!(platform.calls().len(), 1);
    assert_eq!(
        platform.body_of(Method::Post, ROUTES_PATH),
        Some(json!({"host": "demo", "domain_guid": "domain-1", "space_guid": "space-1"}))
    );
}

#[tokio::test]
async fn host_taken_falls_back_to_lookup() {
    let lookup = route_lookup_path("demo", &domain());
    let platform = FakePlatform::new();
    platform
        .respond(Method::Post, ROUTES_PATH, host_taken("demo"))
        .respond(
            Method::Get,
            &lookup,
            json!({"total_results": 1, "resources": [route("route-existing", "demo", "domain-1")]}),
        );

    let id = resolve_route(&platform, "demo", &domain(), &space())
        .await
        .unwrap();

    assert_eq!(id.as_str(), "route-existing");
    assert_eq!(platform.count(Method::Post, ROUTES_PATH), 1);
    assert_eq!(platform.count(Method::Get, &lookup), 1);
}

#[tokio::test]
async fn lookup_takes_the_first_match() {
    let lookup = route_lookup_path("demo", &domain());
    let platform = FakePlatform::new();
    platform
        .respond(Method::Post, ROUTES_PATH, host_taken("demo"))
        .respond(
            Method::Get,
            &lookup,
            json!({"resources": [
                route("route-a", "demo", "domain-1"),
                route("route-b", "demo", "domain-1"),
            ]}),
        );

    let id = resolve_route(&platform, "demo", &domain(), &space())
        .await
        .unwrap();

    assert_eq!(id.as_str(), "route-a");
}

#[tokio::test]
async fn empty_lookup_is_route_not_found() {
    let lookup = route_lookup_path("demo", &domain());
    let platform = FakePlatform::new();
    platform
        .respond(Method::Post, ROUTES_PATH, host_taken("demo"))
        .respond(Method::Get, &lookup, json!({"total_results": 0, "resources": []}));

    let err = resolve_route(&platform, "demo", &domain(), &space())
        .await
        .unwrap_err();

    assert!(matches!(err, DeployError::RouteNotFound { ref host, .. } if host == "demo"));
}

#[tokio::test]
async fn other_create_errors_are_fatal() {
    let platform = FakePlatform::new();
    platform.respond(
        Method::Post,
        ROUTES_PATH,
        json!({"code": 210001, "description": "The route is invalid", "error_code": "CF-RouteInvalid"}),
    );

    let err = resolve_route(&platform, "demo", &domain(), &space())
        .await
        .unwrap_err();

    assert!(matches!(err, DeployError::Resource { .. }));
    assert_eq!(platform.calls().len(), 1);
}

#[tokio::test]
async fn lookup_error_payload_is_fatal() {
    let lookup = route_lookup_path("demo", &domain());
    let platform = FakePlatform::new();
    platform
        .respond(Method::Post, ROUTES_PATH, host_taken("demo"))
        .respond(
            Method::Get,
            &lookup,
            json!({"code": 10001, "description": "Request invalid", "error_code": "CF-InvalidRequest"}),
        );

    let err = resolve_route(&platform, "demo", &domain(), &space())
        .await
        .unwrap_err();

    assert!(matches!(err, DeployError::Resource { .. }));
}
