// ABOUTME: Configuration types and parsing for v3push.yml and the cf CLI target.
// ABOUTME: Every setting has a default, so the settings file itself is optional.

mod init;
mod poll;
mod target;

pub use init::init_settings;
pub use poll::{MAX_POLL_TIMEOUT, PollSettings};
pub use target::{CF_HOME_VAR, Target, cf_config_path};

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const CONFIG_FILENAME: &str = "v3push.yml";
pub const CONFIG_FILENAME_ALT: &str = "v3push.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".v3push/config.yml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PushSettings {
    /// Waiting for uploaded bits to be processed.
    #[serde(
        default = "PollSettings::package",
        deserialize_with = "poll::deserialize_package_poll"
    )]
    pub package: PollSettings,

    /// Waiting for staging to finish.
    #[serde(
        default = "PollSettings::build",
        deserialize_with = "poll::deserialize_build_poll"
    )]
    pub build: PollSettings,

    #[serde(default = "default_stream_logs")]
    pub stream_logs: bool,
}

fn default_stream_logs() -> bool {
    true
}

impl Default for PushSettings {
    fn default() -> Self {
        Self {
            package: PollSettings::package(),
            build: PollSettings::build(),
            stream_logs: default_stream_logs(),
        }
    }
}

impl PushSettings {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty file parses as YAML null.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).map_err(Error::from)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Find the settings file in `dir`.
    ///
    /// Returns `Error::ConfigNotFound` when there is none; see
    /// [`PushSettings::discover_or_default`] for the lenient variant.
    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                tracing::debug!(path = %path.display(), "loading settings");
                return Self::load(path);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    pub fn discover_or_default(dir: &Path) -> Result<Self> {
        match Self::discover(dir) {
            Err(Error::ConfigNotFound(_)) => Ok(Self::default()),
            other => other,
        }
    }
}
