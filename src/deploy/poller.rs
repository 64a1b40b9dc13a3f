// ABOUTME: Bounded status polling for asynchronous platform resources.
// ABOUTME: Stops on the success status, the failure status, or the deadline, whichever comes first.

use std::time::Duration;

use tokio::time::Instant;

use crate::api::{ApiRequest, ControlPlane, models::Status};

use super::call;
use super::error::DeployError;

/// Deadline used when `now + timeout` does not fit in an `Instant`.
const FAR_DEADLINE: Duration = Duration::from_secs(30 * 365 * 24 * 60 * 60);

/// What to poll and when to give up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollSpec {
    path: String,
    success: String,
    failure: Option<String>,
    timeout: Duration,
    interval: Duration,
    failure_message: String,
}

impl PollSpec {
    /// Poll `path` until its state equals `success`.
    ///
    /// Defaults to a five minute timeout checked every two seconds.
    pub fn new(path: impl Into<String>, success: impl Into<String>) -> Self {
        let success = success.into();
        Self {
            path: path.into(),
            failure_message: format!("resource did not become {success}"),
            success,
            failure: None,
            timeout: Duration::from_secs(300),
            interval: Duration::from_secs(2),
        }
    }

    /// A state that ends polling immediately with `StageFailed`.
    pub fn failure_status(mut self, status: impl Into<String>) -> Self {
        self.failure = Some(status.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Message attached to both `StageFailed` and `Timeout`.
    pub fn failure_message(mut self, message: impl Into<String>) -> Self {
        self.failure_message = message.into();
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

/// Poll a resource until it reaches its success state.
///
/// The first fetch happens immediately. A failed fetch or an error payload
/// ends polling at once; it is never taken to mean "not ready yet".
///
/// # Errors
///
/// - `DeployError::StageFailed` when the failure status is observed.
/// - `DeployError::Timeout` when the deadline passes first.
/// - `DeployError::Transport`, `Resource` or `Malformed` when a fetch fails.
pub async fn poll_status<C: ControlPlane + ?Sized>(
    client: &C,
    spec: &PollSpec,
) -> Result<(), DeployError> {
    let start = Instant::now();
    let deadline = start
        .checked_add(spec.timeout)
        .unwrap_or_else(|| start + FAR_DEADLINE);
    let request = ApiRequest::get(spec.path.as_str());

    loop {
        let status: Status = call::fetch(client, &request).await?;

        if status.state == spec.success {
            return Ok(());
        }
        if spec.failure.as_deref() == Some(status.state.as_str()) {
            return Err(DeployError::StageFailed(spec.failure_message.clone()));
        }

        let now = Instant::now();
        if now >= deadline {
            return Err(DeployError::Timeout(spec.failure_message.clone()));
        }

        tracing::debug!(path = %spec.path, state = %status.state, "waiting for {}", spec.success);
        tokio::time::sleep(spec.interval.min(deadline - now)).await;
    }
}
