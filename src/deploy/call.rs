// ABOUTME: Request helpers shared by every stage.
// ABOUTME: Logs each request, maps transport failures and decodes bodies into DeployError.

use serde::de::DeserializeOwned;

use crate::api::{ApiRequest, ControlPlane, Decoded, decode, decode_ack};

use super::error::DeployError;

/// Send a request and return the raw body.
pub(crate) async fn send<C: ControlPlane + ?Sized>(
    client: &C,
    request: &ApiRequest,
) -> Result<String, DeployError> {
    match &request.body {
        Some(body) => tracing::debug!("{} {}", request, body),
        None => tracing::debug!("{}", request),
    }

    client
        .request(request)
        .await
        .map_err(|source| DeployError::Transport {
            request: request.to_string(),
            source,
        })
}

/// Decode a body without deciding what a failure payload means.
pub(crate) fn classify<T: DeserializeOwned>(
    request: &ApiRequest,
    body: &str,
) -> Result<Decoded<T>, DeployError> {
    decode(body).map_err(|source| DeployError::Malformed {
        request: request.to_string(),
        source,
    })
}

/// Send a request and require the expected resource back.
pub(crate) async fn fetch<C, T>(client: &C, request: &ApiRequest) -> Result<T, DeployError>
where
    C: ControlPlane + ?Sized,
    T: DeserializeOwned,
{
    let body = send(client, request).await?;
    match classify(request, &body)? {
        Decoded::Resource(resource) => Ok(resource),
        Decoded::Failure(payload) => Err(DeployError::Resource {
            request: request.to_string(),
            payload,
        }),
    }
}

/// Send a request whose only interesting outcome is "no error payload".
pub(crate) async fn acknowledge<C: ControlPlane + ?Sized>(
    client: &C,
    request: &ApiRequest,
) -> Result<(), DeployError> {
    let body = send(client, request).await?;
    let decoded = decode_ack(&body).map_err(|source| DeployError::Malformed {
        request: request.to_string(),
        source,
    })?;
    match decoded {
        Decoded::Resource(()) => Ok(()),
        Decoded::Failure(payload) => Err(DeployError::Resource {
            request: request.to_string(),
            payload,
        }),
    }
}
