use std::sync::Arc;

use axum::extract::{Extension, Path};
use axum::response::Response;

use super::relay;
use crate::{error::ApiError, state::AppState};

/// GET /predictions/{id}
/// Re-fetches the prediction from upstream on every call; nothing is cached.
pub async fn get(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let upstream = state
        .upstream
        .get_prediction(&id)
        .await
        .map_err(|e| ApiError::from_upstream(e, "Failed to fetch prediction"))?;

    match upstream.prediction() {
        Some(p) if p.status.is_terminal() => tracing::info!(
            prediction_id = %id,
            status = %p.status,
            upstream_status = upstream.status,
            "prediction finished"
        ),
        Some(p) => tracing::debug!(
            prediction_id = %id,
            status = %p.status,
            upstream_status = upstream.status,
            "prediction still running"
        ),
        None => tracing::debug!(
            prediction_id = %id,
            upstream_status = upstream.status,
            "upstream returned no prediction"
        ),
    }

    Ok(relay(upstream))
}
