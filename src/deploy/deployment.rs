// ABOUTME: Generic deployment struct parameterized by state marker.
// ABOUTME: State types carry the identifiers produced by earlier stages.

use crate::types::{AppId, AppName, DropletId, RouteId, SpaceId};

use super::request::{Lifecycle, PushRequest};
use super::state::{HasApp, Initialized, Started};

/// A push in progress, parameterized by its current state.
///
/// Each stage consumes the deployment and returns it in the next state, so
/// stages can only run in order and each one has the identifiers it needs.
#[derive(Debug)]
pub struct Deployment<S> {
    pub(crate) request: PushRequest,
    pub(crate) state: S,
}

impl Deployment<Initialized> {
    pub fn new(request: PushRequest) -> Self {
        Deployment {
            request,
            state: Initialized,
        }
    }
}

impl<S> Deployment<S> {
    pub fn app_name(&self) -> &AppName {
        &self.request.app_name
    }

    pub fn space(&self) -> &SpaceId {
        &self.request.space
    }

    pub fn lifecycle(&self) -> &Lifecycle {
        &self.request.lifecycle
    }

    /// Move to the next state, keeping the request.
    pub(crate) fn advance<T>(self, state: T) -> Deployment<T> {
        Deployment {
            request: self.request,
            state,
        }
    }
}

impl<S: HasApp> Deployment<S> {
    /// The application's GUID, known from `AppCreated` onwards.
    pub fn app_id(&self) -> &AppId {
        self.state.app()
    }
}

impl Deployment<Started> {
    pub fn droplet(&self) -> &DropletId {
        &self.state.droplet
    }

    pub fn route(&self) -> &RouteId {
        &self.state.route
    }

    /// The hostname traffic reaches the application on.
    pub fn url(&self) -> String {
        self.state.domain.hostname(self.request.app_name.host())
    }
}
