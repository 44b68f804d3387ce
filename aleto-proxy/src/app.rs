use std::any::Any;
use std::sync::Arc;

use aleto_config::CorsConfig;
use axum::{
    extract::DefaultBodyLimit,
    extract::Extension,
    http::{HeaderValue, Method},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{self, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::ApiError;
use crate::handlers::{predictions, reset_keys, root};
use crate::state::AppState;

// Prediction inputs are small JSON documents; images travel as URLs.
const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

/// Build the relay router without CORS handling.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root::index))
        .route("/health", get(root::health))
        .route("/predictions", post(predictions::create::create))
        .route("/predictions/{id}", get(predictions::get::get))
        .route("/validate-reset-key", post(reset_keys::validate::validate))
        .fallback(root::not_found)
        .method_not_allowed_fallback(root::not_found)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(DefaultBodyLimit::max(DEFAULT_BODY_LIMIT))
        .layer(TraceLayer::new_for_http())
        .layer(Extension(state))
}

/// Build the relay router with CORS configured for the browser plugin.
pub fn build_router_with_cors(state: Arc<AppState>, cors: &CorsConfig) -> Router {
    build_router(state).layer(cors_layer(cors))
}

/// Translate the CORS section of the config into a tower-http layer.
///
/// Origins that are not valid header values are skipped with a warning.
pub fn cors_layer(cfg: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(cors::Any);

    if cfg.allow_all_origins || cfg.allowed_origins.iter().any(|o| o == "*") {
        return layer.allow_origin(cors::Any);
    }

    let origins: Vec<HeaderValue> = cfg
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!(%origin, error = %e, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(origins))
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    tracing::error!(%detail, "handler panicked");
    ApiError::Unexpected(detail).into_response()
}
