// ABOUTME: Push command implementation.
// ABOUTME: Wires the target, HTTP sessions, settings and log streamer into the push pipeline.

use std::path::Path;

use v3push::api::{HttpControlPlane, HttpUploader};
use v3push::config::{PushSettings, Target};
use v3push::deploy::{Lifecycle, PushRequest, deploy};
use v3push::diagnostics::{Diagnostics, Warning};
use v3push::error::Result;
use v3push::logs::LogStreamer;
use v3push::output::Output;
use v3push::types::{AppName, SpaceId};

use crate::cli::PushArgs;

pub const DONE_MESSAGE: &str = "Done pushing! Check out your processes using 'cf apps'";

/// Push one application to the targeted space.
pub async fn push(args: PushArgs, cwd: &Path, mut output: Output) -> Result<()> {
    let app_name = AppName::new(&args.app_name)?;
    let target = Target::discover(args.space_guid.map(SpaceId::new))?;
    let settings = PushSettings::discover_or_default(cwd)?;
    let stream_logs = settings.stream_logs && !args.no_logs;

    let lifecycle = match args.docker_image {
        Some(image) => Lifecycle::docker(image),
        None => Lifecycle::buildpacks(args.buildpacks),
    };
    let request = PushRequest::new(app_name, target.space.clone(), lifecycle)
        .source(cwd.join(&args.path));

    let client = HttpControlPlane::new(&target.api, &target.token)?;
    let uploader = HttpUploader::new(&target.api, &target.token)?;
    let mut diag = Diagnostics::default();

    output.start_timer();
    if let Some(space) = &target.space_name {
        output.progress(&format!("Pushing {} to space {space}", request.app_name));
    }

    let deployment = deploy(
        &client,
        &uploader,
        request,
        &settings,
        &output,
        |app| {
            if !stream_logs {
                return;
            }
            // The streamer owns its session; the handle is never awaited.
            match LogStreamer::connect(&target.api, &target.token, app.clone()) {
                Ok(streamer) => drop(streamer.spawn(output.clone())),
                Err(e) => diag.warn(Warning::log_streaming(format!(
                    "not streaming logs: {e}"
                ))),
            }
        },
    )
    .await?;

    for warning in diag.warnings() {
        output.warning(&warning.message);
    }

    tracing::debug!(
        app = %deployment.app_id(),
        droplet = %deployment.droplet(),
        route = %deployment.route(),
        "push finished"
    );
    output.progress(&format!("Routed to {}", deployment.url()));
    output.success(DONE_MESSAGE);
    Ok(())
}
