//! Upstream client implementation.

use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::error::UpstreamError;
use crate::types::UpstreamResponse;

const PREDICTIONS_PATH: &str = "predictions";

/// Forwards prediction calls to the upstream API with the credential attached.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone)]
pub struct UpstreamClient {
    client: Client,
    base_url: Url,
    api_token: Option<String>,
}

impl std::fmt::Debug for UpstreamClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamClient")
            .field("base_url", &self.base_url.as_str())
            .field("has_credential", &self.has_credential())
            .finish()
    }
}

impl UpstreamClient {
    /// Creates a client for `base_url`. A blank token is treated as absent.
    pub fn new(base_url: &str, api_token: Option<String>) -> Result<Self, UpstreamError> {
        let base_url =
            Url::parse(base_url).map_err(|e| UpstreamError::InvalidBaseUrl(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(UpstreamError::InvalidBaseUrl(base_url.to_string()));
        }

        let client = Client::builder()
            .user_agent(concat!("aleto-proxy/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| UpstreamError::Client(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            api_token: api_token.filter(|t| !t.trim().is_empty()),
        })
    }

    /// Whether a credential is available for outbound calls.
    #[inline]
    pub fn has_credential(&self) -> bool {
        self.api_token.is_some()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `POST {base}/predictions` with `payload` as the JSON body.
    pub async fn create_prediction(&self, payload: &Value) -> Result<UpstreamResponse, UpstreamError> {
        let token = self.credential()?;
        let url = self.endpoint(&[PREDICTIONS_PATH])?;
        debug!(%url, "creating upstream prediction");
        self.send(self.client.post(url).bearer_auth(token).json(payload))
            .await
    }

    /// `GET {base}/predictions/{id}`. The id is sent as a single path segment.
    pub async fn get_prediction(&self, id: &str) -> Result<UpstreamResponse, UpstreamError> {
        let token = self.credential()?;
        let url = self.endpoint(&[PREDICTIONS_PATH, id])?;
        debug!(%url, "fetching upstream prediction");
        self.send(self.client.get(url).bearer_auth(token)).await
    }

    fn credential(&self) -> Result<&str, UpstreamError> {
        self.api_token
            .as_deref()
            .ok_or(UpstreamError::NotConfigured)
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, UpstreamError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| UpstreamError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<UpstreamResponse, UpstreamError> {
        let response = request.send().await.map_err(|e| {
            warn!("upstream request failed: {}", e);
            UpstreamError::Network(e.to_string())
        })?;

        let status = response.status().as_u16();
        let bytes = response.bytes().await.map_err(|e| {
            warn!("failed to read upstream response body: {}", e);
            UpstreamError::Network(e.to_string())
        })?;

        let body: Value = serde_json::from_slice(&bytes).map_err(|e| {
            warn!(status, "upstream returned a non-JSON body: {}", e);
            UpstreamError::Parse(e.to_string())
        })?;

        Ok(UpstreamResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_appends_segments() {
        let client = UpstreamClient::new("https://api.replicate.com/v1", None).unwrap();
        assert_eq!(
            client.endpoint(&[PREDICTIONS_PATH]).unwrap().as_str(),
            "https://api.replicate.com/v1/predictions"
        );
        assert_eq!(
            client.endpoint(&[PREDICTIONS_PATH, "abc123"]).unwrap().as_str(),
            "https://api.replicate.com/v1/predictions/abc123"
        );
    }

    #[test]
    fn endpoint_handles_trailing_slash_and_encodes_ids() {
        let client = UpstreamClient::new("http://localhost:8080/v1/", None).unwrap();
        assert_eq!(
            client.endpoint(&[PREDICTIONS_PATH]).unwrap().as_str(),
            "http://localhost:8080/v1/predictions"
        );
        assert_eq!(
            client.endpoint(&[PREDICTIONS_PATH, "a/b c"]).unwrap().as_str(),
            "http://localhost:8080/v1/predictions/a%2Fb%20c"
        );
    }

    #[test]
    fn exposes_parsed_base_url() {
        let client = UpstreamClient::new("http://localhost:8080/v1", None).unwrap();
        assert_eq!(client.base_url().host_str(), Some("localhost"));
        assert_eq!(client.base_url().path(), "/v1");
    }

    #[test]
    fn rejects_unusable_base_urls() {
        assert!(matches!(
            UpstreamClient::new("not a url", None),
            Err(UpstreamError::InvalidBaseUrl(_))
        ));
        assert!(matches!(
            UpstreamClient::new("mailto:ops@example.com", None),
            Err(UpstreamError::InvalidBaseUrl(_))
        ));
    }

    #[test]
    fn blank_token_is_absent() {
        let client = UpstreamClient::new("https://api.replicate.com/v1", Some(" ".into())).unwrap();
        assert!(!client.has_credential());
        assert!(matches!(client.credential(), Err(UpstreamError::NotConfigured)));

        let client = UpstreamClient::new("https://api.replicate.com/v1", Some("r8_x".into())).unwrap();
        assert!(client.has_credential());
        assert!(!format!("{client:?}").contains("r8_x"));
    }
}
