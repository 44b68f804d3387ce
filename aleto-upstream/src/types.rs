//! Core types for upstream predictions.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Status code and parsed JSON body exactly as the upstream returned them.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: Value,
}

impl UpstreamResponse {
    /// Best-effort view of the body as a prediction.
    #[inline]
    pub fn prediction(&self) -> Option<PredictionSummary> {
        PredictionSummary::from_body(&self.body)
    }
}

/// Status of a prediction as reported upstream.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PredictionStatus {
    Starting,
    Pending,
    Processing,
    Succeeded,
    Failed,
    Canceled,
    /// Any status this relay does not know about yet.
    #[serde(other)]
    Unknown,
}

impl PredictionStatus {
    /// Returns true if this status represents a terminal state.
    #[inline]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Canceled)
    }
}

impl std::fmt::Display for PredictionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Starting => "starting",
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
            Self::Canceled => "canceled",
            Self::Unknown => "unknown",
        })
    }
}

/// The handful of prediction fields worth logging. Owned by the upstream;
/// the relay only reads it.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct PredictionSummary {
    pub id: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    pub status: PredictionStatus,
}

impl PredictionSummary {
    /// Extract a summary from an upstream body. Error bodies yield `None`.
    pub fn from_body(body: &Value) -> Option<Self> {
        Self::deserialize(body).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn summary_from_prediction_body() {
        let body = json!({
            "id": "gm3qorzdhgbfurvjtvhg6dckhu",
            "model": "black-forest-labs/flux-schnell",
            "version": "5599ed30",
            "input": { "prompt": "a lighthouse" },
            "status": "processing",
            "output": null
        });
        let summary = PredictionSummary::from_body(&body).expect("summary");
        assert_eq!(summary.id, "gm3qorzdhgbfurvjtvhg6dckhu");
        assert_eq!(summary.model.as_deref(), Some("black-forest-labs/flux-schnell"));
        assert_eq!(summary.status, PredictionStatus::Processing);
        assert!(!summary.status.is_terminal());
    }

    #[test]
    fn unknown_status_is_tolerated() {
        let body = json!({ "id": "p1", "status": "queued_for_gpu" });
        let summary = PredictionSummary::from_body(&body).expect("summary");
        assert_eq!(summary.status, PredictionStatus::Unknown);
        assert_eq!(summary.status.to_string(), "unknown");
    }

    #[test]
    fn error_body_has_no_summary() {
        let resp = UpstreamResponse {
            status: 422,
            body: json!({ "title": "Invalid version", "detail": "not found" }),
        };
        assert!(resp.prediction().is_none());
    }

    #[test]
    fn terminal_statuses() {
        for s in [
            PredictionStatus::Succeeded,
            PredictionStatus::Failed,
            PredictionStatus::Canceled,
        ] {
            assert!(s.is_terminal(), "{s} should be terminal");
        }
        for s in [
            PredictionStatus::Starting,
            PredictionStatus::Pending,
            PredictionStatus::Processing,
            PredictionStatus::Unknown,
        ] {
            assert!(!s.is_terminal(), "{s} should not be terminal");
        }
    }
}
