// ABOUTME: Logs command implementation.
// ABOUTME: Finds the application in the targeted space and tails its logs until Ctrl-C.

use v3push::api::HttpControlPlane;
use v3push::config::Target;
use v3push::error::Result;
use v3push::logs::{LogStreamer, find_app};
use v3push::output::Output;
use v3push::types::{AppName, SpaceId};

pub async fn logs(app_name: &str, space_guid: Option<String>, output: Output) -> Result<()> {
    let app_name = AppName::new(app_name)?;
    let target = Target::discover(space_guid.map(SpaceId::new))?;

    let client = HttpControlPlane::new(&target.api, &target.token)?;
    let app = find_app(&client, &app_name, &target.space).await?;

    output.progress(&format!("Retrieving logs for app {app_name}..."));
    let streamer = LogStreamer::connect(&target.api, &target.token, app)?;

    tokio::select! {
        () = streamer.run(output) => {}
        signal = tokio::signal::ctrl_c() => signal?,
    }
    Ok(())
}
