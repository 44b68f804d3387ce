//! Error types for upstream calls.

use thiserror::Error;

/// Errors that may occur while talking to the upstream inference API.
///
/// Upstream 4xx/5xx responses are not errors; they come back as an
/// [`UpstreamResponse`](crate::UpstreamResponse) with the upstream status.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// No credential is configured. Raised before any network call.
    #[error("upstream API token is not configured")]
    NotConfigured,

    #[error("invalid upstream base url: {0}")]
    InvalidBaseUrl(String),

    #[error("failed to build HTTP client: {0}")]
    Client(String),

    #[error("upstream request failed: {0}")]
    Network(String),

    #[error("failed to parse upstream response: {0}")]
    Parse(String),
}

impl UpstreamError {
    /// True for failures that happened while talking to the upstream.
    #[inline]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Parse(_))
    }
}
