// ABOUTME: State transition methods for the push pipeline.
// ABOUTME: Each method performs one stage against the platform and returns the next state.

use serde_json::json;

use crate::api::models::{App, Build, Package};
use crate::api::{ApiRequest, ArtifactUploader, ControlPlane};
use crate::archive;
use crate::config::PollSettings;

use super::Deployment;
use super::call;
use super::domains::{list_shared_domains, select_domain};
use super::error::DeployError;
use super::poller::{PollSpec, poll_status};
use super::request::Lifecycle;
use super::route::resolve_route;
use super::state::{
    AppCreated, BuildCreated, DomainSelected, DropletAssigned, DropletFound, Initialized,
    PackageReady, RouteMapped, RouteResolved, Staged, Started,
};

pub const PACKAGE_READY: &str = "READY";
pub const PACKAGE_FAILED: &str = "FAILED";
pub const BUILD_STAGED: &str = "STAGED";
pub const BUILD_FAILED: &str = "FAILED";

pub const PACKAGE_FAILURE_MESSAGE: &str = "Package failed to upload";
pub const BUILD_FAILURE_MESSAGE: &str = "Build failed to stage";

// =============================================================================
// Initialized -> AppCreated
// =============================================================================

impl Deployment<Initialized> {
    /// Create the application in the target space.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::Resource` if the platform rejects the app
    /// (for example, the name is already used in the space).
    #[must_use = "deployment state must be used"]
    pub async fn create_app<C: ControlPlane + ?Sized>(
        self,
        client: &C,
    ) -> Result<Deployment<AppCreated>, DeployError> {
        let request = ApiRequest::post(
            "/v3/apps",
            json!({
                "name": self.request.app_name.as_str(),
                "relationships": { "space": { "data": { "guid": self.request.space } } },
                "lifecycle": self.request.lifecycle.descriptor(),
            }),
        );
        let app: App = call::fetch(client, &request).await?;
        tracing::info!(app = %app.guid, name = %app.name, "application created");

        Ok(self.advance(AppCreated { app: app.guid }))
    }
}

// =============================================================================
// AppCreated -> PackageReady
// =============================================================================

impl Deployment<AppCreated> {
    /// Create the package the build will stage.
    ///
    /// Docker packages reference the image and are usable at once. Bits
    /// packages are created empty, filled by `uploader` with the packaged
    /// application source, then polled until the platform reports `READY`.
    ///
    /// # Errors
    ///
    /// Returns the packaging, upload or polling failure; a package that never
    /// becomes ready fails with "Package failed to upload".
    #[must_use = "deployment state must be used"]
    pub async fn create_package<C, U>(
        self,
        client: &C,
        uploader: &U,
        poll: &PollSettings,
    ) -> Result<Deployment<PackageReady>, DeployError>
    where
        C: ControlPlane + ?Sized,
        U: ArtifactUploader + ?Sized,
    {
        let app = self.state.app.clone();

        let package = match &self.request.lifecycle {
            Lifecycle::Docker { image } => {
                let request = ApiRequest::post(
                    "/v3/packages",
                    json!({
                        "type": "docker",
                        "data": { "image": image },
                        "relationships": { "app": { "data": { "guid": app } } },
                    }),
                );
                let package: Package = call::fetch(client, &request).await?;
                package.guid
            }
            Lifecycle::Buildpack { .. } => {
                let request = ApiRequest::post(
                    "/v3/packages",
                    json!({
                        "type": "bits",
                        "relationships": { "app": { "data": { "guid": app } } },
                    }),
                );
                let package: Package = call::fetch(client, &request).await?;

                let archive = archive::package_source(&self.request.source)?;
                uploader.upload(&package.guid, &archive).await?;

                let spec = PollSpec::new(format!("/v3/packages/{}", package.guid), PACKAGE_READY)
                    .failure_status(PACKAGE_FAILED)
                    .timeout(poll.timeout)
                    .interval(poll.interval)
                    .failure_message(PACKAGE_FAILURE_MESSAGE);
                poll_status(client, &spec).await?;
                package.guid
            }
        };
        tracing::info!(%package, "package ready");

        Ok(self.advance(PackageReady { app, package }))
    }
}

// =============================================================================
// PackageReady -> BuildCreated
// =============================================================================

impl Deployment<PackageReady> {
    /// Ask the platform to stage the ready package.
    #[must_use = "deployment state must be used"]
    pub async fn create_build<C: ControlPlane + ?Sized>(
        self,
        client: &C,
    ) -> Result<Deployment<BuildCreated>, DeployError> {
        let request = ApiRequest::post(
            "/v3/builds",
            json!({
                "lifecycle": self.request.lifecycle.descriptor(),
                "package": { "guid": self.state.package },
            }),
        );
        let build: Build = call::fetch(client, &request).await?;
        tracing::info!(build = %build.guid, "build created");

        let app = self.state.app.clone();
        Ok(self.advance(BuildCreated {
            app,
            build: build.guid,
        }))
    }
}

// =============================================================================
// BuildCreated -> Staged
// =============================================================================

impl Deployment<BuildCreated> {
    /// Wait for staging to finish.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::StageFailed` as soon as the build reports
    /// `FAILED`, and `DeployError::Timeout` if it is still staging when the
    /// timeout elapses.
    #[must_use = "deployment state must be used"]
    pub async fn await_staging<C: ControlPlane + ?Sized>(
        self,
        client: &C,
        poll: &PollSettings,
    ) -> Result<Deployment<Staged>, DeployError> {
        let spec = PollSpec::new(format!("/v3/builds/{}", self.state.build), BUILD_STAGED)
            .failure_status(BUILD_FAILED)
            .timeout(poll.timeout)
            .interval(poll.interval)
            .failure_message(BUILD_FAILURE_MESSAGE);
        poll_status(client, &spec).await?;
        tracing::info!(build = %self.state.build, "build staged");

        let BuildCreated { app, build } = self.state.clone();
        Ok(self.advance(Staged { app, build }))
    }
}

// =============================================================================
// Staged -> DropletFound
// =============================================================================

impl Deployment<Staged> {
    /// Re-read the build to learn which droplet it produced.
    #[must_use = "deployment state must be used"]
    pub async fn fetch_droplet<C: ControlPlane + ?Sized>(
        self,
        client: &C,
    ) -> Result<Deployment<DropletFound>, DeployError> {
        let request = ApiRequest::get(format!("/v3/builds/{}", self.state.build));
        let build: Build = call::fetch(client, &request).await?;

        let droplet = build
            .droplet_id()
            .cloned()
            .ok_or_else(|| DeployError::MissingDroplet(build.guid.clone()))?;

        let app = self.state.app.clone();
        Ok(self.advance(DropletFound { app, droplet }))
    }
}

// =============================================================================
// DropletFound -> DropletAssigned
// =============================================================================

impl Deployment<DropletFound> {
    /// Make the droplet the application's current droplet.
    #[must_use = "deployment state must be used"]
    pub async fn assign_droplet<C: ControlPlane + ?Sized>(
        self,
        client: &C,
    ) -> Result<Deployment<DropletAssigned>, DeployError> {
        let request = ApiRequest::patch(
            format!("/v3/apps/{}/relationships/current_droplet", self.state.app),
            json!({ "data": { "guid": self.state.droplet } }),
        );
        call::acknowledge(client, &request).await?;

        let DropletFound { app, droplet } = self.state.clone();
        Ok(self.advance(DropletAssigned { app, droplet }))
    }
}

// =============================================================================
// DropletAssigned -> DomainSelected
// =============================================================================

impl Deployment<DropletAssigned> {
    /// Choose the shared domain the route will live on.
    #[must_use = "deployment state must be used"]
    pub async fn select_domain<C: ControlPlane + ?Sized>(
        self,
        client: &C,
    ) -> Result<Deployment<DomainSelected>, DeployError> {
        let domains = list_shared_domains(client).await?;
        let domain = select_domain(&domains).clone();
        tracing::info!(domain = %domain.name, "shared domain selected");

        let DropletAssigned { app, droplet } = self.state.clone();
        Ok(self.advance(DomainSelected {
            app,
            droplet,
            domain,
        }))
    }
}

// =============================================================================
// DomainSelected -> RouteResolved
// =============================================================================

impl Deployment<DomainSelected> {
    /// Create the `<app>.<domain>` route, or find it if the host is taken.
    #[must_use = "deployment state must be used"]
    pub async fn resolve_route<C: ControlPlane + ?Sized>(
        self,
        client: &C,
    ) -> Result<Deployment<RouteResolved>, DeployError> {
        let route = resolve_route(
            client,
            self.request.app_name.host(),
            &self.state.domain.id,
            &self.request.space,
        )
        .await?;

        let DomainSelected {
            app,
            droplet,
            domain,
        } = self.state.clone();
        Ok(self.advance(RouteResolved {
            app,
            droplet,
            domain,
            route,
        }))
    }
}

// =============================================================================
// RouteResolved -> RouteMapped
// =============================================================================

impl Deployment<RouteResolved> {
    /// Bind the route to the application.
    #[must_use = "deployment state must be used"]
    pub async fn map_route<C: ControlPlane + ?Sized>(
        self,
        client: &C,
    ) -> Result<Deployment<RouteMapped>, DeployError> {
        let request = ApiRequest::post(
            "/v3/route_mappings",
            json!({
                "relationships": {
                    "route": { "guid": self.state.route },
                    "app": { "guid": self.state.app },
                },
            }),
        );
        call::acknowledge(client, &request).await?;
        tracing::info!(route = %self.state.route, "route mapped");

        let RouteResolved {
            app,
            droplet,
            domain,
            route,
        } = self.state.clone();
        Ok(self.advance(RouteMapped {
            app,
            droplet,
            domain,
            route,
        }))
    }
}

// =============================================================================
// RouteMapped -> Started
// =============================================================================

impl Deployment<RouteMapped> {
    /// Start the application's processes.
    #[must_use = "deployment state must be used"]
    pub async fn start<C: ControlPlane + ?Sized>(
        self,
        client: &C,
    ) -> Result<Deployment<Started>, DeployError> {
        let request = ApiRequest::put(format!("/v3/apps/{}/start", self.state.app));
        call::acknowledge(client, &request).await?;
        tracing::info!(app = %self.state.app, "application started");

        let RouteMapped {
            app,
            droplet,
            domain,
            route,
        } = self.state.clone();
        Ok(self.advance(Started {
            app,
            droplet,
            domain,
            route,
        }))
    }
}
