// ABOUTME: reqwest-backed control-plane client.
// ABOUTME: Resolves paths against the API root and returns raw response bodies.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::AUTHORIZATION;
use snafu::ResultExt;
use url::Url;

use super::client::{ApiRequest, ControlPlane};
use super::error::{
    BodySnafu, ClientSnafu, InvalidUrlSnafu, SendSnafu, TransportError, UnauthorizedSnafu,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// One HTTP session against a control-plane (or log-cache) root URL.
///
/// Each instance owns its own connection pool. Components that run
/// concurrently with a push, such as the log streamer, build their own
/// instance instead of sharing this one.
#[derive(Debug, Clone)]
pub struct HttpControlPlane {
    client: reqwest::Client,
    base: Url,
    token: String,
}

impl HttpControlPlane {
    /// Create a session for `base` authenticating with `token`.
    ///
    /// `token` is sent verbatim as the `Authorization` header, so it should
    /// already carry its scheme (`bearer ...`).
    pub fn new(base: &str, token: impl Into<String>) -> Result<Self, TransportError> {
        let base = Url::parse(base).context(InvalidUrlSnafu { url: base })?;
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("v3push/", env!("CARGO_PKG_VERSION")))
            .build()
            .context(ClientSnafu)?;

        Ok(Self {
            client,
            base,
            token: token.into(),
        })
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub(crate) fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Resolve a relative path (or pass through an absolute URL).
    pub fn resolve(&self, path: &str) -> Result<Url, TransportError> {
        self.base.join(path).context(InvalidUrlSnafu { url: path })
    }
}

#[async_trait]
impl ControlPlane for HttpControlPlane {
    async fn request(&self, request: &ApiRequest) -> Result<String, TransportError> {
        let url = self.resolve(&request.path)?;
        let label = request.to_string();

        let mut builder = self
            .client
            .request(request.method.into(), url)
            .header(AUTHORIZATION, &self.token);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.context(SendSnafu {
            request: label.clone(),
        })?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return UnauthorizedSnafu { request: label }.fail();
        }

        let status = response.status();
        let body = response.text().await.context(BodySnafu {
            request: label.clone(),
        })?;
        tracing::trace!(request = %label, %status, "response received");

        Ok(body)
    }
}
