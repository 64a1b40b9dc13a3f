// ABOUTME: Init command implementation.
// ABOUTME: Writes a v3push.yml settings template into the working directory.

use std::path::Path;

use v3push::config::init_settings;
use v3push::error::Result;
use v3push::output::Output;

pub fn init(cwd: &Path, force: bool, output: &Output) -> Result<()> {
    let path = init_settings(cwd, force)?;
    output.success(&format!("Wrote {}", path.display()));
    Ok(())
}
