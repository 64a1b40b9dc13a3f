// ABOUTME: What to push: application name, target space, lifecycle and source.
// ABOUTME: Lifecycle renders the descriptor shared by app and build creation.

use std::path::PathBuf;

use serde_json::{Value, json};

use crate::types::{AppName, SpaceId};

/// How the platform turns the package into a droplet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lifecycle {
    /// Stage bits with the given buildpacks, in order. Empty means auto-detect.
    Buildpack { buildpacks: Vec<String> },
    /// Run a prebuilt container image.
    Docker { image: String },
}

impl Lifecycle {
    pub fn buildpacks<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Lifecycle::Buildpack {
            buildpacks: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn docker(image: impl Into<String>) -> Self {
        Lifecycle::Docker {
            image: image.into(),
        }
    }

    /// The `lifecycle` object sent when creating apps and builds.
    pub fn descriptor(&self) -> Value {
        match self {
            Lifecycle::Buildpack { buildpacks } => json!({
                "type": "buildpack",
                "data": { "buildpacks": buildpacks },
            }),
            Lifecycle::Docker { .. } => json!({
                "type": "docker",
                "data": {},
            }),
        }
    }

    pub fn is_docker(&self) -> bool {
        matches!(self, Lifecycle::Docker { .. })
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Lifecycle::Buildpack {
            buildpacks: Vec::new(),
        }
    }
}

/// Everything the pipeline needs to know up front.
#[derive(Debug, Clone)]
pub struct PushRequest {
    pub app_name: AppName,
    pub space: SpaceId,
    pub lifecycle: Lifecycle,
    /// Directory or zip to upload; ignored for docker lifecycles.
    pub source: PathBuf,
}

impl PushRequest {
    pub fn new(app_name: AppName, space: SpaceId, lifecycle: Lifecycle) -> Self {
        Self {
            app_name,
            space,
            lifecycle,
            source: PathBuf::from("."),
        }
    }

    pub fn source(mut self, source: impl Into<PathBuf>) -> Self {
        self.source = source.into();
        self
    }
}
