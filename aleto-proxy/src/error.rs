use aleto_upstream::UpstreamError;
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

/// Top-level API error shared by all route handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The process is missing something it needs, e.g. the upstream credential.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// Talking to the upstream failed. `message` is what the caller sees.
    #[error("{message}")]
    Transport {
        message: &'static str,
        #[source]
        source: UpstreamError,
    },
    /// Payload is returned to the caller as-is with a 400.
    #[error("validation error")]
    Validation(serde_json::Value),
    #[error("route not found: {method} {path}")]
    RouteNotFound { method: String, path: String },
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self {
            ApiError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Transport { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::RouteNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let payload = match self {
            ApiError::Validation(v) => v,
            ApiError::Transport { message, ref source } => {
                tracing::error!(error = %source, "upstream transport failure");
                json!({ "error": message })
            }
            ApiError::RouteNotFound { ref method, ref path } => json!({
                "error": "Not found",
                "message": format!("Route {method} {path} not found"),
                "availableRoutes": crate::handlers::root::route_list(),
            }),
            ApiError::Configuration(ref reason) => {
                tracing::error!(%reason, "request failed on server configuration");
                json!({ "error": self.to_string() })
            }
            ApiError::Unexpected(_) => json!({ "error": "Internal server error" }),
        };

        (status, Json(payload)).into_response()
    }
}

impl ApiError {
    /// Map an upstream failure, attaching the generic message shown on transport errors.
    pub fn from_upstream(err: UpstreamError, message: &'static str) -> Self {
        match err {
            UpstreamError::NotConfigured => {
                Self::Configuration("upstream API token is not set".to_string())
            }
            err if err.is_transport() => Self::Transport {
                message,
                source: err,
            },
            other => Self::Unexpected(other.to_string()),
        }
    }

    pub fn validation(payload: serde_json::Value) -> Self {
        Self::Validation(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(resp: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn missing_credential_maps_to_500() {
        let err = ApiError::from_upstream(UpstreamError::NotConfigured, "Failed to create prediction");
        assert!(matches!(err, ApiError::Configuration(_)));
        let resp = err.into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(resp).await;
        assert!(body["error"].as_str().unwrap().contains("token"));
    }

    #[tokio::test]
    async fn transport_failure_hides_details() {
        let err = ApiError::from_upstream(
            UpstreamError::Network("tcp connect error: 10.0.0.7:443".into()),
            "Failed to fetch prediction",
        );
        let resp = err.into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(resp).await;
        assert_eq!(body, json!({ "error": "Failed to fetch prediction" }));
    }

    #[tokio::test]
    async fn validation_payload_is_passed_through() {
        let payload = json!({ "success": false, "message": "Reset key is required" });
        let resp = ApiError::validation(payload.clone()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await, payload);
    }

    #[tokio::test]
    async fn route_not_found_lists_routes() {
        let resp = ApiError::RouteNotFound {
            method: "GET".into(),
            path: "/unknown-path".into(),
        }
        .into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body = body_json(resp).await;
        assert!(body["availableRoutes"].as_array().unwrap().len() >= 4);
    }

    #[test]
    fn non_transport_upstream_errors_are_unexpected() {
        let err = ApiError::from_upstream(
            UpstreamError::InvalidBaseUrl("x".into()),
            "Failed to create prediction",
        );
        assert!(matches!(err, ApiError::Unexpected(_)));
    }
}
