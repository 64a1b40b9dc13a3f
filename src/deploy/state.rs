// ABOUTME: Deployment state types for the type state pattern.
// ABOUTME: Each state carries the identifiers produced so far, so later stages cannot run early.

use crate::types::{AppId, BuildId, DropletId, PackageId, RouteId};

use super::domains::SharedDomain;

/// Initial state: nothing exists on the platform yet.
/// Available actions: `create_app()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Initialized;

/// Application created.
/// Available actions: `create_package()`
#[derive(Debug, Clone)]
pub struct AppCreated {
    pub(crate) app: AppId,
}

/// Package created and ready to stage (uploaded and processed for bits).
/// Available actions: `create_build()`
#[derive(Debug, Clone)]
pub struct PackageReady {
    pub(crate) app: AppId,
    pub(crate) package: PackageId,
}

/// Build requested; staging runs out of band.
/// Available actions: `await_staging()`
#[derive(Debug, Clone)]
pub struct BuildCreated {
    pub(crate) app: AppId,
    pub(crate) build: BuildId,
}

/// Build reported `STAGED`.
/// Available actions: `fetch_droplet()`
#[derive(Debug, Clone)]
pub struct Staged {
    pub(crate) app: AppId,
    pub(crate) build: BuildId,
}

/// Droplet identified from the staged build.
/// Available actions: `assign_droplet()`
#[derive(Debug, Clone)]
pub struct DropletFound {
    pub(crate) app: AppId,
    pub(crate) droplet: DropletId,
}

/// Droplet is the application's current droplet.
/// Available actions: `select_domain()`
#[derive(Debug, Clone)]
pub struct DropletAssigned {
    pub(crate) app: AppId,
    pub(crate) droplet: DropletId,
}

/// Shared domain chosen for the route.
/// Available actions: `resolve_route()`
#[derive(Debug, Clone)]
pub struct DomainSelected {
    pub(crate) app: AppId,
    pub(crate) droplet: DropletId,
    pub(crate) domain: SharedDomain,
}

/// Route created or found.
/// Available actions: `map_route()`
#[derive(Debug, Clone)]
pub struct RouteResolved {
    pub(crate) app: AppId,
    pub(crate) droplet: DropletId,
    pub(crate) domain: SharedDomain,
    pub(crate) route: RouteId,
}

/// Route mapped to the application.
/// Available actions: `start()`
#[derive(Debug, Clone)]
pub struct RouteMapped {
    pub(crate) app: AppId,
    pub(crate) droplet: DropletId,
    pub(crate) domain: SharedDomain,
    pub(crate) route: RouteId,
}

/// Application started. Terminal state.
#[derive(Debug, Clone)]
pub struct Started {
    pub(crate) app: AppId,
    pub(crate) droplet: DropletId,
    pub(crate) domain: SharedDomain,
    pub(crate) route: RouteId,
}

/// States that come after the application exists.
pub trait HasApp {
    fn app(&self) -> &AppId;
}

macro_rules! has_app {
    ($($state:ty),* $(,)?) => {
        $(impl HasApp for $state {
            fn app(&self) -> &AppId {
                &self.app
            }
        })*
    };
}

has_app!(
    AppCreated,
    PackageReady,
    BuildCreated,
    Staged,
    DropletFound,
    DropletAssigned,
    DomainSelected,
    RouteResolved,
    RouteMapped,
    Started,
);
