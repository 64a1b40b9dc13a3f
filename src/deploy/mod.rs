// ABOUTME: Push orchestration using the type state pattern.
// ABOUTME: Exports the state markers, the Deployment struct, and the poller, domain and route helpers.

mod call;
mod deployment;
mod domains;
mod error;
mod pipeline;
mod poller;
mod request;
mod route;
mod state;
mod transitions;

pub use deployment::Deployment;
pub use domains::{SHARED_DOMAINS_PATH, SharedDomain, list_shared_domains, select_domain};
pub use error::{DeployError, DeployErrorKind, Stage, StageContext, StageError};
pub use pipeline::deploy;
pub use poller::{PollSpec, poll_status};
pub use request::{Lifecycle, PushRequest};
pub use route::{ROUTES_PATH, resolve_route, route_lookup_path};
pub use state::{
    AppCreated, BuildCreated, DomainSelected, DropletAssigned, DropletFound, HasApp, Initialized,
    PackageReady, RouteMapped, RouteResolved, Staged, Started,
};
pub use transitions::{
    BUILD_FAILED, BUILD_FAILURE_MESSAGE, BUILD_STAGED, PACKAGE_FAILED, PACKAGE_FAILURE_MESSAGE,
    PACKAGE_READY,
};
