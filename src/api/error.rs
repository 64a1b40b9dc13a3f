// ABOUTME: Transport error types with SNAFU pattern.
// ABOUTME: Covers everything that stops a request from producing a readable body.

use snafu::Snafu;

/// A control-plane call that could not complete.
///
/// These are always fatal to a push; they are never confused with an error
/// payload returned inside a response body.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum TransportError {
    #[snafu(display("failed to build HTTP client: {source}"))]
    Client { source: reqwest::Error },

    #[snafu(display("invalid URL {url}: {source}"))]
    InvalidUrl { url: String, source: url::ParseError },

    #[snafu(display("{request} failed: {source}"))]
    Send {
        request: String,
        source: reqwest::Error,
    },

    #[snafu(display("failed to read response to {request}: {source}"))]
    Body {
        request: String,
        source: reqwest::Error,
    },

    #[snafu(display("{request} was rejected: not authorized (try logging in again)"))]
    Unauthorized { request: String },
}
