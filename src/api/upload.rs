// ABOUTME: Artifact upload collaborator for bits packages.
// ABOUTME: Posts the zipped application as a multipart form to the package's upload endpoint.

use std::path::PathBuf;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::multipart::{Form, Part};
use snafu::ResultExt;

use super::decode::{Decoded, ErrorPayload, decode_ack};
use super::error::{BodySnafu, SendSnafu, TransportError, UnauthorizedSnafu};
use super::http::HttpControlPlane;
use crate::archive::Archive;
use crate::types::PackageId;

/// Uploads a packaged artifact into an existing bits package.
///
/// Reports only success or failure; the package's readiness is observed
/// separately by polling.
#[async_trait]
pub trait ArtifactUploader: Send + Sync {
    async fn upload(&self, package: &PackageId, archive: &Archive) -> Result<(), UploadError>;
}

/// Errors from uploading package bits.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("failed to read archive {path}: {source}")]
    ReadArchive {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("upload rejected with HTTP {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("upload failed: {0}")]
    Platform(ErrorPayload),
}

/// Multipart uploader that talks to the API root directly.
#[derive(Debug, Clone)]
pub struct HttpUploader {
    session: HttpControlPlane,
}

impl HttpUploader {
    pub fn new(base: &str, token: impl Into<String>) -> Result<Self, TransportError> {
        Ok(Self {
            session: HttpControlPlane::new(base, token)?,
        })
    }
}

#[async_trait]
impl ArtifactUploader for HttpUploader {
    async fn upload(&self, package: &PackageId, archive: &Archive) -> Result<(), UploadError> {
        let path = format!("/v3/packages/{package}/upload");
        let label = format!("POST {path}");
        let url = self.session.resolve(&path)?;

        let bits = tokio::fs::read(archive.path())
            .await
            .map_err(|source| UploadError::ReadArchive {
                path: archive.path().to_path_buf(),
                source,
            })?;
        tracing::debug!(%package, bytes = bits.len(), "uploading package bits");

        let form = Form::new().part("bits", Part::bytes(bits).file_name("application.zip"));
        let response = self
            .session
            .client()
            .post(url)
            .header(AUTHORIZATION, self.session.token())
            .multipart(form)
            .send()
            .await
            .context(SendSnafu {
                request: label.clone(),
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(UnauthorizedSnafu { request: label }.build().into());
        }
        let body = response.text().await.context(BodySnafu { request: label })?;

        if !status.is_success() {
            return Err(UploadError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        match decode_ack(&body) {
            Ok(Decoded::Failure(payload)) => Err(UploadError::Platform(payload)),
            // The upload response is informational; a success status is enough.
            Ok(Decoded::Resource(())) | Err(_) => Ok(()),
        }
    }
}
