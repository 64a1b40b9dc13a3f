// ABOUTME: Error types for the push pipeline.
// ABOUTME: DeployError says what went wrong; StageError adds which stage it happened in.

use std::fmt;

use crate::api::{ErrorPayload, TransportError, UploadError};
use crate::archive::ArchiveError;
use crate::types::{BuildId, DomainId};

/// Errors that can occur while executing a single push stage.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    /// The control-plane call itself failed.
    #[error("{request}: {source}")]
    Transport {
        request: String,
        source: TransportError,
    },

    /// The response carried an error payload.
    #[error("{request}: {payload}")]
    Resource {
        request: String,
        payload: ErrorPayload,
    },

    /// The response was neither the expected resource nor an error payload.
    #[error("{request}: unexpected response: {source}")]
    Malformed {
        request: String,
        source: serde_json::Error,
    },

    /// A polled resource reached its failure state.
    #[error("{0}")]
    StageFailed(String),

    /// A polled resource never reached its success state.
    #[error("{0} (timed out)")]
    Timeout(String),

    /// The build staged but did not reference a droplet.
    #[error("build {0} staged without a droplet")]
    MissingDroplet(BuildId),

    /// The platform offers no shared domain to route through.
    #[error("no shared domains available")]
    NoSharedDomains,

    /// A listing's `next_url` led back to a page already fetched.
    #[error("pagination loop: {0} was already fetched")]
    PaginationLoop(String),

    /// The host was reported taken but no matching route could be found.
    #[error("route {host} on domain {domain} is taken but could not be found")]
    RouteNotFound { host: String, domain: DomainId },

    /// The application source could not be packaged.
    #[error(transparent)]
    Archive(#[from] ArchiveError),

    /// The packaged bits could not be uploaded.
    #[error(transparent)]
    Upload(#[from] UploadError),
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployErrorKind {
    /// Network or authentication failure.
    Transport,
    /// The platform rejected or could not produce a resource.
    Resource,
    /// A polled resource failed.
    StageFailed,
    /// A polled resource took too long.
    Timeout,
    /// Packaging or uploading the application failed.
    Artifact,
}

impl DeployError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> DeployErrorKind {
        match self {
            DeployError::Transport { .. } => DeployErrorKind::Transport,
            DeployError::Resource { .. }
            | DeployError::Malformed { .. }
            | DeployError::MissingDroplet(_)
            | DeployError::NoSharedDomains
            | DeployError::PaginationLoop(_)
            | DeployError::RouteNotFound { .. } => DeployErrorKind::Resource,
            DeployError::StageFailed(_) => DeployErrorKind::StageFailed,
            DeployError::Timeout(_) => DeployErrorKind::Timeout,
            DeployError::Archive(_) => DeployErrorKind::Artifact,
            DeployError::Upload(UploadError::Transport(_)) => DeployErrorKind::Transport,
            DeployError::Upload(_) => DeployErrorKind::Artifact,
        }
    }
}

/// The ten stages of a push, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    CreateApp,
    CreatePackage,
    CreateBuild,
    AwaitStaging,
    FetchDroplet,
    AssignDroplet,
    ResolveDomain,
    ResolveRoute,
    MapRoute,
    StartApp,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Stage::CreateApp => "create application",
            Stage::CreatePackage => "create package",
            Stage::CreateBuild => "create build",
            Stage::AwaitStaging => "await staging",
            Stage::FetchDroplet => "fetch droplet",
            Stage::AssignDroplet => "assign droplet",
            Stage::ResolveDomain => "resolve shared domain",
            Stage::ResolveRoute => "resolve route",
            Stage::MapRoute => "map route",
            Stage::StartApp => "start application",
        };
        f.write_str(label)
    }
}

/// A push that stopped at `stage`.
#[derive(Debug, thiserror::Error)]
#[error("{stage} failed: {source}")]
pub struct StageError {
    pub stage: Stage,
    pub source: DeployError,
}

impl StageError {
    pub fn kind(&self) -> DeployErrorKind {
        self.source.kind()
    }
}

/// Extension trait to attribute a `DeployError` to the stage it came from.
pub trait StageContext<T> {
    fn at(self, stage: Stage) -> Result<T, StageError>;
}

impl<T> StageContext<T> for Result<T, DeployError> {
    fn at(self, stage: Stage) -> Result<T, StageError> {
        self.map_err(|source| StageError { stage, source })
    }
}
