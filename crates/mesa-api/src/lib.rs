//! # Mesa API
//!
//! Thin HTTP surface over the multi-agent coordinator.
//!
//! ```text
//! client ──► POST /chat ──► MultiAgentCoordinator ──► orchestrator ──► specialists
//! ```

pub mod error;
pub mod http;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use http::handlers::{ChatMessage, ChatRequest, ChatResponse};
pub use http::routes::create_router;
pub use server::{InterfaceConfig, InterfaceServer};
pub use state::AppState;
