// ABOUTME: Application log streaming from the platform's log cache.
// ABOUTME: Polls for new LOG envelopes on a dedicated HTTP session and prints them as they arrive.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Local, Utc};
use futures::{Stream, StreamExt, stream};
use serde::{Deserialize, Deserializer};
use tokio::task::JoinHandle;
use url::Url;

use crate::api::models::{App, List};
use crate::api::{ApiRequest, ControlPlane, Decoded, HttpControlPlane, TransportError, decode};
use crate::error::{Error, Result};
use crate::output::Output;
use crate::types::{AppId, AppName, SpaceId};

const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Errors from reading the log cache.
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("no log cache endpoint can be derived from {0}")]
    NoLogCache(String),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("unexpected log cache response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Log stream type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogStream {
    Stdout,
    Stderr,
}

impl fmt::Display for LogStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LogStream::Stdout => "OUT",
            LogStream::Stderr => "ERR",
        })
    }
}

/// A single application log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub timestamp: DateTime<Utc>,
    /// Emitting component, e.g. `APP/PROC/WEB` or `STG`.
    pub source: String,
    pub instance: String,
    pub stream: LogStream,
    pub content: String,
}

impl fmt::Display for LogLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}/{}] {} {}",
            self.timestamp
                .with_timezone(&Local)
                .format("%Y-%m-%dT%H:%M:%S%.3f%z"),
            self.source,
            self.instance,
            self.stream,
            self.content
        )
    }
}

#[derive(Debug, Default, Deserialize)]
struct ReadResponse {
    #[serde(default)]
    envelopes: EnvelopeBatch,
}

#[derive(Debug, Default, Deserialize)]
struct EnvelopeBatch {
    #[serde(default)]
    batch: Vec<Envelope>,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(deserialize_with = "nanos")]
    timestamp: i64,
    #[serde(default)]
    instance_id: String,
    #[serde(default)]
    tags: HashMap<String, String>,
    #[serde(default)]
    log: Option<LogPayload>,
}

#[derive(Debug, Deserialize)]
struct LogPayload {
    #[serde(default)]
    payload: String,
    #[serde(default, rename = "type")]
    kind: Option<String>,
}

/// Log cache encodes 64-bit timestamps as JSON strings.
fn nanos<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(i64),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.parse().map_err(serde::de::Error::custom),
    }
}

impl Envelope {
    fn into_line(self) -> Option<LogLine> {
        let log = self.log?;
        let bytes = STANDARD.decode(log.payload.as_bytes()).ok()?;
        let content = String::from_utf8_lossy(&bytes).trim_end().to_string();
        let stream = match log.kind.as_deref() {
            Some("ERR") => LogStream::Stderr,
            _ => LogStream::Stdout,
        };

        Some(LogLine {
            timestamp: DateTime::from_timestamp_nanos(self.timestamp),
            source: self.tags.get("source_type").cloned().unwrap_or_default(),
            instance: self.instance_id,
            stream,
            content,
        })
    }
}

/// The log cache root for an API root: `https://api.X` becomes `https://log-cache.X`.
pub fn log_cache_url(api: &str) -> std::result::Result<String, LogError> {
    let mut url = Url::parse(api).map_err(|_| LogError::NoLogCache(api.to_string()))?;
    let host = url
        .host_str()
        .and_then(|h| h.strip_prefix("api."))
        .map(|rest| format!("log-cache.{rest}"))
        .ok_or_else(|| LogError::NoLogCache(api.to_string()))?;
    url.set_host(Some(&host))
        .map_err(|_| LogError::NoLogCache(api.to_string()))?;
    Ok(url.as_str().trim_end_matches('/').to_string())
}

/// Follows one application's logs from a start time onwards.
#[derive(Debug)]
pub struct LogStreamer<C = HttpControlPlane> {
    client: C,
    app: AppId,
    cursor: i64,
    interval: Duration,
}

impl LogStreamer<HttpControlPlane> {
    /// Open a log cache session of its own, separate from any push session.
    pub fn connect(api: &str, token: &str, app: AppId) -> std::result::Result<Self, LogError> {
        let base = log_cache_url(api)?;
        let session = HttpControlPlane::new(&base, token)?;
        Ok(Self::new(session, app))
    }
}

impl<C: ControlPlane> LogStreamer<C> {
    /// Stream logs emitted from now on.
    pub fn new(client: C, app: AppId) -> Self {
        Self {
            client,
            app,
            cursor: Utc::now().timestamp_nanos_opt().unwrap_or_default(),
            interval: POLL_INTERVAL,
        }
    }

    pub fn starting_at(mut self, nanos: i64) -> Self {
        self.cursor = nanos;
        self
    }

    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    fn read_path(&self) -> String {
        format!(
            "/api/v1/read/{}?start_time={}&envelope_types=LOG",
            self.app, self.cursor
        )
    }

    /// Fetch everything newer than the cursor and move the cursor past it.
    pub async fn poll_once(&mut self) -> std::result::Result<Vec<LogLine>, LogError> {
        let body = self.client.request(&ApiRequest::get(self.read_path())).await?;
        let response: ReadResponse = serde_json::from_str(&body)?;

        let mut envelopes = response.envelopes.batch;
        envelopes.sort_by_key(|e| e.timestamp);
        if let Some(newest) = envelopes.last() {
            self.cursor = newest.timestamp + 1;
        }

        Ok(envelopes.into_iter().filter_map(Envelope::into_line).collect())
    }

    /// An endless stream of log lines. Read failures are logged and skipped.
    pub fn into_stream(self) -> impl Stream<Item = LogLine> + Send
    where
        C: 'static,
    {
        stream::unfold((self, true), |(mut streamer, first)| async move {
            if !first {
                tokio::time::sleep(streamer.interval).await;
            }
            let batch = match streamer.poll_once().await {
                Ok(lines) => lines,
                Err(e) => {
                    tracing::debug!(app = %streamer.app, error = %e, "log cache read failed");
                    Vec::new()
                }
            };
            Some((stream::iter(batch), (streamer, false)))
        })
        .flatten()
    }

    /// Print lines until the task is dropped or aborted.
    pub async fn run(self, output: Output)
    where
        C: 'static,
    {
        let lines = self.into_stream();
        futures::pin_mut!(lines);
        while let Some(line) = lines.next().await {
            output.log_line(&line.to_string());
        }
    }

    /// Run in the background; the handle may be dropped.
    pub fn spawn(self, output: Output) -> JoinHandle<()>
    where
        C: 'static,
    {
        tokio::spawn(self.run(output))
    }
}

/// Look an application up by name in a space.
pub async fn find_app<C: ControlPlane + ?Sized>(
    client: &C,
    name: &AppName,
    space: &SpaceId,
) -> Result<AppId> {
    let request = ApiRequest::get(format!(
        "/v3/apps?names={}&space_guids={}",
        urlencoding::encode(name.as_str()),
        urlencoding::encode(space.as_str())
    ));
    tracing::debug!("{}", request);
    let body = client.request(&request).await?;

    match decode::<List<App>>(&body)? {
        Decoded::Resource(list) => list
            .resources
            .into_iter()
            .next()
            .map(|app| app.guid)
            .ok_or_else(|| Error::AppNotFound(name.to_string())),
        Decoded::Failure(payload) => Err(Error::Platform(payload)),
    }
}
