// ABOUTME: Decodes raw control-plane bodies into a resource or an error payload.
// ABOUTME: The error-shape check happens here once, never ad hoc in the pipeline.

use std::fmt;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// v2 error code for "the host is taken" when creating a route.
pub const HOST_TAKEN_ERROR: &str = "CF-RouteHostTaken";

/// Numeric v2 code that accompanies [`HOST_TAKEN_ERROR`].
pub const HOST_TAKEN_CODE: i64 = 210003;

/// A response body, classified.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded<T> {
    /// The body is the expected resource.
    Resource(T),
    /// The body carries an error payload; none of its other fields are trusted.
    Failure(ErrorPayload),
}

/// The platform's error shapes, merged.
///
/// v2 endpoints answer with `code`, `description` and `error_code`; v3
/// endpoints answer with an `errors` list.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ErrorPayload {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub error_code: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub errors: Vec<ErrorDetail>,
}

/// One entry of a v3 `errors` list.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

impl ErrorPayload {
    /// True when any of the error fields is populated.
    pub fn is_error(&self) -> bool {
        non_empty(&self.error_code) || non_empty(&self.description) || !self.errors.is_empty()
    }

    /// True when the payload reports a route host collision.
    pub fn is_host_taken(&self) -> bool {
        self.error_code.as_deref() == Some(HOST_TAKEN_ERROR)
            || self.code == Some(HOST_TAKEN_CODE)
            || self
                .errors
                .iter()
                .any(|e| e.title.as_deref() == Some(HOST_TAKEN_ERROR))
    }
}

fn non_empty(field: &Option<String>) -> bool {
    field.as_deref().is_some_and(|s| !s.is_empty())
}

impl fmt::Display for ErrorPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();

        if let Some(code) = self.error_code.as_deref().filter(|c| !c.is_empty()) {
            parts.push(code.to_string());
        }
        if let Some(description) = self.description.as_deref().filter(|d| !d.is_empty()) {
            parts.push(description.to_string());
        }
        for detail in &self.errors {
            match (&detail.title, &detail.detail) {
                (Some(title), Some(text)) => parts.push(format!("{title}: {text}")),
                (Some(title), None) => parts.push(title.clone()),
                (None, Some(text)) => parts.push(text.clone()),
                (None, None) => {}
            }
        }

        if parts.is_empty() {
            f.write_str("unknown platform error")
        } else {
            f.write_str(&parts.join("; "))
        }
    }
}

/// Decode a body that should contain a `T`.
///
/// # Errors
///
/// Returns the JSON error if the body is neither a recognised error payload
/// nor a valid `T`.
pub fn decode<T: DeserializeOwned>(body: &str) -> Result<Decoded<T>, serde_json::Error> {
    let value: Value = serde_json::from_str(body)?;
    if let Some(payload) = error_payload(&value) {
        return Ok(Decoded::Failure(payload));
    }
    serde_json::from_value(value).map(Decoded::Resource)
}

/// Decode a body whose content is irrelevant apart from error detection.
///
/// An empty body counts as success.
///
/// # Errors
///
/// Returns the JSON error if a non-empty body is not JSON.
pub fn decode_ack(body: &str) -> Result<Decoded<()>, serde_json::Error> {
    if body.trim().is_empty() {
        return Ok(Decoded::Resource(()));
    }
    let value: Value = serde_json::from_str(body)?;
    Ok(match error_payload(&value) {
        Some(payload) => Decoded::Failure(payload),
        None => Decoded::Resource(()),
    })
}

fn error_payload(value: &Value) -> Option<ErrorPayload> {
    if !value.is_object() {
        return None;
    }
    // A resource whose fields happen to clash with the error shape is not an error.
    let payload: ErrorPayload = serde_json::from_value(value.clone()).ok()?;
    payload.is_error().then_some(payload)
}
