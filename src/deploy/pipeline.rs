// ABOUTME: The full push, stage by stage.
// ABOUTME: Drives a Deployment from Initialized to Started and tags any failure with its stage.

use crate::api::{ArtifactUploader, ControlPlane};
use crate::config::PushSettings;
use crate::output::Output;
use crate::types::AppId;

use super::Deployment;
use super::error::{Stage, StageContext, StageError};
use super::request::PushRequest;
use super::state::Started;

/// Push an application.
///
/// Stages run strictly in order and the first failure ends the push; nothing
/// already created on the platform is cleaned up. `on_app_created` runs once,
/// right after the application exists, and is where callers start side
/// channels such as log streaming.
///
/// # Errors
///
/// Returns a [`StageError`] naming the stage that failed and why.
pub async fn deploy<C, U, F>(
    client: &C,
    uploader: &U,
    request: PushRequest,
    settings: &PushSettings,
    output: &Output,
    on_app_created: F,
) -> Result<Deployment<Started>, StageError>
where
    C: ControlPlane + ?Sized,
    U: ArtifactUploader + ?Sized,
    F: FnOnce(&AppId),
{
    let deployment = Deployment::new(request);
    tracing::info!(app = %deployment.app_name(), space = %deployment.space(), "push started");

    output.progress(&format!("Creating app {}...", deployment.app_name()));
    let deployment = deployment.create_app(client).await.at(Stage::CreateApp)?;
    on_app_created(deployment.app_id());

    if deployment.lifecycle().is_docker() {
        output.progress("Creating docker package...");
    } else {
        output.progress("Uploading app bits...");
    }
    let deployment = deployment
        .create_package(client, uploader, &settings.package)
        .await
        .at(Stage::CreatePackage)?;

    output.progress("Staging...");
    let deployment = deployment.create_build(client).await.at(Stage::CreateBuild)?;
    let deployment = deployment
        .await_staging(client, &settings.build)
        .await
        .at(Stage::AwaitStaging)?;

    output.progress("Setting current droplet...");
    let deployment = deployment.fetch_droplet(client).await.at(Stage::FetchDroplet)?;
    let deployment = deployment
        .assign_droplet(client)
        .await
        .at(Stage::AssignDroplet)?;

    output.progress("Mapping route...");
    let deployment = deployment
        .select_domain(client)
        .await
        .at(Stage::ResolveDomain)?;
    let deployment = deployment
        .resolve_route(client)
        .await
        .at(Stage::ResolveRoute)?;
    let deployment = deployment.map_route(client).await.at(Stage::MapRoute)?;

    output.progress(&format!("Starting app {}...", deployment.app_name()));
    let deployment = deployment.start(client).await.at(Stage::StartApp)?;

    tracing::info!(app = %deployment.app_id(), url = %deployment.url(), "push complete");
    Ok(deployment)
}
