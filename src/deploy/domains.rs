// ABOUTME: Shared domain discovery across paginated v2 listings.
// ABOUTME: Accumulates every page in order; the first domain is the one routes bind to.

use std::collections::HashSet;

use nonempty::NonEmpty;

use crate::api::models::{SharedDomainResource, V2Page};
use crate::api::{ApiRequest, ControlPlane};
use crate::types::DomainId;

use super::call;
use super::error::DeployError;

pub const SHARED_DOMAINS_PATH: &str = "/v2/shared_domains";

/// A platform-wide domain any space may create routes on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedDomain {
    pub id: DomainId,
    pub name: String,
}

impl SharedDomain {
    /// Fully qualified hostname for `host` on this domain.
    pub fn hostname(&self, host: &str) -> String {
        format!("{host}.{}", self.name)
    }
}

/// Fetch every shared domain, following `next_url` until the last page.
///
/// # Errors
///
/// Fails on the first page that cannot be fetched or carries an error
/// payload, with `DeployError::PaginationLoop` when a `next_url` points back
/// to a page already fetched, and with `DeployError::NoSharedDomains` when
/// the listing is empty.
pub async fn list_shared_domains<C: ControlPlane + ?Sized>(
    client: &C,
) -> Result<NonEmpty<SharedDomain>, DeployError> {
    let mut domains = Vec::new();
    let mut visited = HashSet::new();
    let mut next = Some(SHARED_DOMAINS_PATH.to_string());

    while let Some(path) = next.take() {
        if !visited.insert(path.clone()) {
            return Err(DeployError::PaginationLoop(path));
        }

        let page: V2Page<SharedDomainResource> = call::fetch(client, &ApiRequest::get(path)).await?;
        next = page.next().map(str::to_string);
        domains.extend(page.resources.into_iter().map(|resource| SharedDomain {
            id: resource.id(),
            name: resource.entity.name,
        }));
    }

    tracing::debug!(count = domains.len(), "shared domains listed");
    NonEmpty::from_vec(domains).ok_or(DeployError::NoSharedDomains)
}

/// Pick the domain to bind the route to: always the first one listed.
pub fn select_domain(domains: &NonEmpty<SharedDomain>) -> &SharedDomain {
    domains.first()
}
