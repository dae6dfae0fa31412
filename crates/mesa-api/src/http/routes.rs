//! HTTP route definitions.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::http::handlers::{agents_status, chat, health, reset_chat, root};
use crate::state::AppState;

/// Create the router.
///
/// ```text
/// GET  /               - Service info and agent ids
/// GET  /health         - Liveness
/// POST /chat           - Process the newest message
/// POST /chat/reset     - Reset every agent (?session_id=)
/// GET  /agents/status  - Per-agent status snapshots
/// ```
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/chat", post(chat))
        .route("/chat/reset", post(reset_chat))
        .route("/agents/status", get(agents_status))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;
