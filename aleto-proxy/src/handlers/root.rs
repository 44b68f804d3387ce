use axum::http::{Method, StatusCode, Uri};
use axum::response::{IntoResponse, Json};
use serde_json::{json, Map, Value};

use crate::error::ApiError;

/// Every route the relay serves, with a short description.
pub const ROUTES: &[(&str, &str)] = &[
    ("GET /", "Service information"),
    ("GET /health", "Liveness probe"),
    ("POST /predictions", "Create a prediction upstream"),
    ("GET /predictions/:id", "Fetch the current state of a prediction"),
    ("POST /validate-reset-key", "Check a credit reset key"),
];

pub fn route_list() -> Vec<&'static str> {
    ROUTES.iter().map(|(route, _)| *route).collect()
}

/// GET /
pub async fn index() -> Json<Value> {
    let endpoints: Map<String, Value> = ROUTES
        .iter()
        .map(|(route, description)| (route.to_string(), json!(description)))
        .collect();

    Json(json!({
        "status": "ok",
        "message": "Aleto prediction relay is running",
        "endpoints": endpoints,
        "usage": {
            "createPrediction": {
                "method": "POST",
                "path": "/predictions",
                "body": { "version": "<model version>", "input": { "prompt": "..." } },
            },
            "getPrediction": {
                "method": "GET",
                "path": "/predictions/<id>",
            },
            "validateResetKey": {
                "method": "POST",
                "path": "/validate-reset-key",
                "body": { "resetKey": "<key>" },
            },
        },
    }))
}

/// GET /health
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Fallback for anything not matched by the router, including a known
/// path requested with the wrong method.
pub async fn not_found(method: Method, uri: Uri) -> ApiError {
    tracing::debug!(%method, path = %uri.path(), "no route matched");
    ApiError::RouteNotFound {
        method: method.to_string(),
        path: uri.path().to_string(),
    }
}
