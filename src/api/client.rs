// ABOUTME: The control-plane request abstraction the deploy pipeline depends on.
// ABOUTME: One request in, one raw response body out.

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

use super::error::TransportError;

/// HTTP verbs used against the control plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
        };
        f.write_str(verb)
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
        }
    }
}

/// A single control-plane call.
///
/// `path` is usually relative to the API root (`/v3/apps`), but pagination
/// links may hand back absolute URLs; implementations must accept both.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            body: Some(body),
        }
    }

    pub fn patch(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Patch,
            path: path.into(),
            body: Some(body),
        }
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self {
            method: Method::Put,
            path: path.into(),
            body: None,
        }
    }
}

impl fmt::Display for ApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

/// Executes requests against the platform's control plane.
///
/// Implementations return the body for every HTTP status they can read a body
/// from: the platform reports most failures inside the body, and deciding
/// what is an error is left to [`decode`](super::decode).
#[async_trait]
pub trait ControlPlane: Send + Sync {
    async fn request(&self, request: &ApiRequest) -> Result<String, TransportError>;
}

#[async_trait]
impl<T: ControlPlane + ?Sized> ControlPlane for &T {
    async fn request(&self, request: &ApiRequest) -> Result<String, TransportError> {
        (**self).request(request).await
    }
}
