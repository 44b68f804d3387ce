use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::Extension;
use axum::response::Json;
use serde_json::{json, Value};

use super::dto::{ValidateResetKey, ValidateResetKeyResponse};
use crate::{error::ApiError, state::AppState};

const KEY_REQUIRED: &str = "Reset key is required";
const KEY_INVALID: &str = "Invalid reset key";

/// POST /validate-reset-key
/// Accepts { resetKey } and reports the matching descriptor.
///
/// An unknown key is a 200 with `success: false`. A missing or unreadable
/// body, or an absent or empty key, is a 400.
pub async fn validate(
    Extension(state): Extension<Arc<AppState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let dto = body
        .ok()
        .and_then(|Json(v)| serde_json::from_value::<ValidateResetKey>(v).ok());
    let key = dto
        .as_ref()
        .and_then(ValidateResetKey::key)
        .ok_or_else(|| ApiError::validation(json!({ "success": false, "message": KEY_REQUIRED })))?;

    let response = match state.reset_keys.lookup(key) {
        Some(descriptor) => {
            tracing::info!(reset_type = %descriptor.reset_type, "reset key accepted");
            ValidateResetKeyResponse::accepted(descriptor)
        }
        None => {
            tracing::info!("reset key rejected");
            ValidateResetKeyResponse::rejected(KEY_INVALID)
        }
    };

    serde_json::to_value(response)
        .map(Json)
        .map_err(|e| ApiError::Unexpected(e.to_string()))
}
