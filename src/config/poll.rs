// ABOUTME: Polling cadence for package readiness and build staging.
// ABOUTME: Each poll has its own defaults; a settings file may override either field.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Longest wait a settings file may ask for on a single poll.
pub const MAX_POLL_TIMEOUT: Duration = Duration::from_secs(24 * 60 * 60);

/// How often to check a resource and how long to wait for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PollSettings {
    #[serde(serialize_with = "humantime_serde::serialize")]
    pub interval: Duration,
    #[serde(serialize_with = "humantime_serde::serialize")]
    pub timeout: Duration,
}

impl PollSettings {
    pub const fn new(interval: Duration, timeout: Duration) -> Self {
        Self { interval, timeout }
    }

    /// Package readiness: every 2s for up to 5 minutes.
    pub const fn package() -> Self {
        Self::new(Duration::from_secs(2), Duration::from_secs(5 * 60))
    }

    /// Build staging: every 10s for up to 10 minutes.
    pub const fn build() -> Self {
        Self::new(Duration::from_secs(10), Duration::from_secs(10 * 60))
    }

    fn with_overrides(self, overrides: PollOverrides) -> Self {
        Self {
            interval: overrides.interval.unwrap_or(self.interval),
            timeout: overrides.timeout.unwrap_or(self.timeout),
        }
    }
}

/// The fields a settings file may set; missing ones keep the poll's default.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct PollOverrides {
    #[serde(default, with = "humantime_serde")]
    interval: Option<Duration>,

    #[serde(default, with = "humantime_serde")]
    timeout: Option<Duration>,
}

pub(super) fn deserialize_package_poll<'de, D>(deserializer: D) -> Result<PollSettings, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let overrides = PollOverrides::deserialize(deserializer)?;
    validated(PollSettings::package().with_overrides(overrides))
}

pub(super) fn deserialize_build_poll<'de, D>(deserializer: D) -> Result<PollSettings, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let overrides = PollOverrides::deserialize(deserializer)?;
    validated(PollSettings::build().with_overrides(overrides))
}

fn validated<E: serde::de::Error>(settings: PollSettings) -> Result<PollSettings, E> {
    if settings.interval.is_zero() {
        return Err(E::custom("poll interval must be greater than zero"));
    }
    if settings.timeout > MAX_POLL_TIMEOUT {
        return Err(E::custom("poll timeout must be at most 24h"));
    }
    Ok(settings)
}
