use std::sync::Arc;

use aleto_upstream::UpstreamClient;

use crate::reset_keys::ResetKeyTable;

/// Shared application state passed to every route handler.
///
/// Everything in here is read-only once the server is running.
#[derive(Debug, Clone)]
pub struct AppState {
    pub upstream: UpstreamClient,
    pub reset_keys: Arc<ResetKeyTable>,
}

impl AppState {
    /// Build a fully initialised state container from its constituent parts.
    pub fn new(upstream: UpstreamClient, reset_keys: ResetKeyTable) -> Self {
        Self {
            upstream,
            reset_keys: Arc::new(reset_keys),
        }
    }
}
