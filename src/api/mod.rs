// ABOUTME: Control-plane API access: request trait, transport, response decoding.
// ABOUTME: Exports ControlPlane, HttpControlPlane, ArtifactUploader and wire models.

mod client;
mod decode;
mod error;
mod http;
pub mod models;
mod upload;

pub use client::{ApiRequest, ControlPlane, Method};
pub use decode::{Decoded, ErrorDetail, ErrorPayload, HOST_TAKEN_CODE, HOST_TAKEN_ERROR, decode, decode_ack};
pub use error::TransportError;
pub use http::HttpControlPlane;
pub use upload::{ArtifactUploader, HttpUploader, UploadError};
