//! Application state.

use std::sync::Arc;
use std::time::Instant;

use mesa_runtime::MultiAgentCoordinator;

/// State shared by every handler.
pub struct AppState {
    pub coordinator: Arc<MultiAgentCoordinator>,
    start_time: Instant,
}

impl AppState {
    pub fn new(coordinator: Arc<MultiAgentCoordinator>) -> Self {
        Self {
            coordinator,
            start_time: Instant::now(),
        }
    }

    pub fn uptime(&self) -> std::time::Duration {
        self.start_time.elapsed()
    }
}
