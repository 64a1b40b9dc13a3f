// ABOUTME: Wire models for the v2 and v3 control-plane resources used by a push.
// ABOUTME: Only the fields the pipeline reads are modelled.

use serde::Deserialize;

use crate::types::{AppId, BuildId, DomainId, DropletId, PackageId, RouteId};

/// `{"guid": ...}` reference from a build to the droplet it produced.
#[derive(Debug, Clone, Deserialize)]
pub struct DropletRef {
    pub guid: DropletId,
}

#[derive(Debug, Clone, Deserialize)]
pub struct App {
    pub guid: AppId,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Package {
    pub guid: PackageId,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Build {
    pub guid: BuildId,
    #[serde(default)]
    pub droplet: Option<DropletRef>,
}

impl Build {
    pub fn droplet_id(&self) -> Option<&DropletId> {
        self.droplet.as_ref().map(|d| &d.guid)
    }
}

/// The minimal shape the poller needs from any stateful resource.
#[derive(Debug, Clone, Deserialize)]
pub struct Status {
    #[serde(alias = "status")]
    pub state: String,
}

/// A v3 list response (`/v3/apps?names=...`).
#[derive(Debug, Clone, Deserialize)]
pub struct List<T> {
    #[serde(default = "Vec::new")]
    pub resources: Vec<T>,
}

/// v2 resources wrap their fields in `metadata` and `entity`.
#[derive(Debug, Clone, Deserialize)]
pub struct V2Resource<E> {
    pub metadata: V2Metadata,
    pub entity: E,
}

#[derive(Debug, Clone, Deserialize)]
pub struct V2Metadata {
    pub guid: String,
}

/// One page of a v2 listing; `next_url` is empty or absent on the last page.
#[derive(Debug, Clone, Deserialize)]
pub struct V2Page<T> {
    #[serde(default = "Vec::new")]
    pub resources: Vec<T>,
    #[serde(default)]
    pub next_url: Option<String>,
}

impl<T> V2Page<T> {
    pub fn next(&self) -> Option<&str> {
        self.next_url.as_deref().filter(|u| !u.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SharedDomainEntity {
    pub name: String,
}

/// Routes are only ever read for their GUID.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteEntity {}

pub type SharedDomainResource = V2Resource<SharedDomainEntity>;
pub type RouteResource = V2Resource<RouteEntity>;

impl V2Resource<SharedDomainEntity> {
    pub fn id(&self) -> DomainId {
        DomainId::new(self.metadata.guid.clone())
    }
}

impl V2Resource<RouteEntity> {
    pub fn id(&self) -> RouteId {
        RouteId::new(self.metadata.guid.clone())
    }
}
