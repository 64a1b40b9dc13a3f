// ABOUTME: Settings scaffolding for new projects.
// ABOUTME: Creates a v3push.yml template spelling out every default.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

use super::{CONFIG_FILENAME, PushSettings};

const HEADER: &str = "\
# v3push settings. Every field is optional.
# package: waiting for uploaded application bits to be processed
# build: waiting for the build to stage
# stream_logs: tail application logs while pushing (override with --no-logs)
";

/// Write a `v3push.yml` template into `dir` and return its path.
pub fn init_settings(dir: &Path, force: bool) -> Result<PathBuf> {
    let path = dir.join(CONFIG_FILENAME);

    if path.exists() && !force {
        return Err(Error::AlreadyExists(path));
    }

    let yaml = generate_template_yaml(&PushSettings::default())?;
    std::fs::write(&path, yaml)?;

    Ok(path)
}

fn generate_template_yaml(settings: &PushSettings) -> Result<String> {
    let body = serde_yaml::to_string(settings)?;
    Ok(format!("{HEADER}{body}"))
}
