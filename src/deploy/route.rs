// ABOUTME: Create-or-find for the application's route.
// ABOUTME: A host-taken conflict falls back to looking the existing route up.

use serde_json::json;

use crate::api::models::{RouteResource, V2Page};
use crate::api::{ApiRequest, ControlPlane, Decoded};
use crate::types::{DomainId, RouteId, SpaceId};

use super::call;
use super::error::DeployError;

pub const ROUTES_PATH: &str = "/v2/routes";

/// Path of the lookup used when `host` is already taken on `domain`.
pub fn route_lookup_path(host: &str, domain: &DomainId) -> String {
    format!(
        "{ROUTES_PATH}?q={}&q={}",
        urlencoding::encode(&format!("host:{host}")),
        urlencoding::encode(&format!("domain_guid:{domain}"))
    )
}

/// Resolve the route for `host` on `domain`, creating it in `space` if needed.
///
/// Route creation is not idempotent on the platform, so a host-taken
/// conflict is answered with a lookup, and the first match wins. Only one
/// create is ever attempted.
///
/// # Errors
///
/// Any create failure other than host-taken, any lookup failure, and an
/// empty lookup result (`DeployError::RouteNotFound`) are fatal.
pub async fn resolve_route<C: ControlPlane + ?Sized>(
    client: &C,
    host: &str,
    domain: &DomainId,
    space: &SpaceId,
) -> Result<RouteId, DeployError> {
    let create = ApiRequest::post(
        ROUTES_PATH,
        json!({
            "host": host,
            "domain_guid": domain,
            "space_guid": space,
        }),
    );
    let body = call::send(client, &create).await?;

    match call::classify::<RouteResource>(&create, &body)? {
        Decoded::Resource(route) => {
            tracing::debug!(route = %route.metadata.guid, "route created");
            Ok(route.id())
        }
        Decoded::Failure(payload) if payload.is_host_taken() => {
            tracing::debug!(%host, %domain, "host taken, looking up existing route");
            find_route(client, host, domain).await
        }
        Decoded::Failure(payload) => Err(DeployError::Resource {
            request: create.to_string(),
            payload,
        }),
    }
}

async fn find_route<C: ControlPlane + ?Sized>(
    client: &C,
    host: &str,
    domain: &DomainId,
) -> Result<RouteId, DeployError> {
    let lookup = ApiRequest::get(route_lookup_path(host, domain));
    let page: V2Page<RouteResource> = call::fetch(client, &lookup).await?;

    page.resources
        .first()
        .map(RouteResource::id)
        .ok_or_else(|| DeployError::RouteNotFound {
            host: host.to_string(),
            domain: domain.clone(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_path_encodes_filters() {
        let path = route_lookup_path("demo", &DomainId::new("d-1"));
        assert_eq!(path, "/v2/routes?q=host%3Ademo&q=domain_guid%3Ad-1");
    }
}
