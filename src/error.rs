// ABOUTME: Application-wide error types for v3push.
// ABOUTME: Uses thiserror for ergonomic error handling.

use std::path::PathBuf;
use thiserror::Error;

use crate::api::{ErrorPayload, TransportError};
use crate::deploy::StageError;
use crate::logs::LogError;
use crate::types::AppNameError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("not logged in: run 'cf login' first ({0})")]
    NotLoggedIn(PathBuf),

    #[error("no space targeted: run 'cf target -s SPACE' or pass --space-guid")]
    NoTargetSpace,

    #[error("file already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("configuration file not found in {0}")]
    ConfigNotFound(PathBuf),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid application name: {0}")]
    InvalidAppName(#[from] AppNameError),

    #[error(transparent)]
    Deploy(#[from] StageError),

    #[error("application {0} not found in the targeted space")]
    AppNotFound(String),

    #[error(transparent)]
    Logs(#[from] LogError),

    #[error("platform error: {0}")]
    Platform(ErrorPayload),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
