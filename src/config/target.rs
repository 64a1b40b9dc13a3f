// ABOUTME: Reads the logged-in API endpoint, token and space from the cf CLI's config file.
// ABOUTME: Honors CF_HOME the same way the cf CLI does.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::types::SpaceId;

pub const CF_HOME_VAR: &str = "CF_HOME";

/// Where the push goes and who it runs as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// API root, e.g. `https://api.example.com`.
    pub api: String,
    /// Sent verbatim as the `Authorization` header (`bearer ...`).
    pub token: String,
    pub space: SpaceId,
    pub space_name: Option<String>,
}

/// The subset of `~/.cf/config.json` the push needs.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CfConfig {
    #[serde(default)]
    target: String,
    #[serde(default)]
    access_token: String,
    #[serde(default)]
    space_fields: SpaceFields,
}

#[derive(Debug, Default, Deserialize)]
struct SpaceFields {
    #[serde(default, rename = "GUID")]
    guid: String,
    #[serde(default, rename = "Name")]
    name: String,
}

/// Location of the cf CLI config: `$CF_HOME/.cf/config.json`, else `~/.cf/config.json`.
pub fn cf_config_path() -> Option<PathBuf> {
    let home = std::env::var_os(CF_HOME_VAR)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(dirs::home_dir)?;
    Some(home.join(".cf").join("config.json"))
}

impl Target {
    /// Read the target from the cf CLI config.
    ///
    /// `space` replaces the targeted space when given.
    pub fn discover(space: Option<SpaceId>) -> Result<Self> {
        let path = cf_config_path().ok_or_else(|| Error::NotLoggedIn(PathBuf::from("~/.cf")))?;
        Self::load(&path, space)
    }

    pub fn load(path: &Path, space: Option<SpaceId>) -> Result<Self> {
        if !path.exists() {
            return Err(Error::NotLoggedIn(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content, path, space)
    }

    pub fn from_json(json: &str, path: &Path, space: Option<SpaceId>) -> Result<Self> {
        let config: CfConfig = serde_json::from_str(json)?;

        if config.target.is_empty() || config.access_token.is_empty() {
            return Err(Error::NotLoggedIn(path.to_path_buf()));
        }

        let (space, space_name) = match space {
            Some(space) => (space, None),
            None if config.space_fields.guid.is_empty() => return Err(Error::NoTargetSpace),
            None => (
                SpaceId::new(config.space_fields.guid),
                Some(config.space_fields.name).filter(|n| !n.is_empty()),
            ),
        };

        Ok(Self {
            api: config.target,
            token: config.access_token,
            space,
            space_name,
        })
    }
}
