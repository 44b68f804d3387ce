use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::Extension;
use axum::response::{Json, Response};
use serde_json::{json, Map, Value};

use super::relay;
use crate::{error::ApiError, state::AppState};

/// POST /predictions
/// Forwards the request body to the upstream unchanged; a request without a
/// JSON body is forwarded as `{}`. A body that is not valid JSON is a 400
/// and never reaches the upstream.
pub async fn create(
    Extension(state): Extension<Arc<AppState>>,
    body: Result<Option<Json<Value>>, JsonRejection>,
) -> Result<Response, ApiError> {
    let payload = match body {
        Ok(Some(Json(v))) => v,
        Ok(None) => Value::Object(Map::new()),
        Err(rejection) => {
            tracing::debug!(error = %rejection.body_text(), "unreadable prediction request body");
            return Err(ApiError::validation(json!({
                "error": "Invalid JSON body",
                "message": rejection.body_text(),
            })));
        }
    };

    let upstream = state
        .upstream
        .create_prediction(&payload)
        .await
        .map_err(|e| ApiError::from_upstream(e, "Failed to create prediction"))?;

    match upstream.prediction() {
        Some(p) => tracing::info!(
            prediction_id = %p.id,
            status = %p.status,
            upstream_status = upstream.status,
            "prediction created"
        ),
        None => tracing::warn!(
            upstream_status = upstream.status,
            "upstream rejected prediction request"
        ),
    }

    Ok(relay(upstream))
}
