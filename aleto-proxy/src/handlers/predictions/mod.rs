pub mod create;
pub mod get;

use aleto_upstream::UpstreamResponse;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};

/// Mirror an upstream answer back to the caller, status and body unchanged.
pub(crate) fn relay(upstream: UpstreamResponse) -> Response {
    let status =
        StatusCode::from_u16(upstream.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(upstream.body)).into_response()
}
