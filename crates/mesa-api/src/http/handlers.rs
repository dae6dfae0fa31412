//! Chat API handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use mesa_runtime::SystemStatus;

use crate::error::ApiError;
use crate::state::AppState;

/// One message of the client-side conversation.
#[derive(Debug, Deserialize)]
pub struct ChatMessage {
    /// `user` or `assistant`.
    pub role: String,
    pub content: String,
}

/// Request to chat with the assistant.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// Conversation so far. Only the newest message is processed.
    #[serde(default)]
    pub messages: Vec<ChatMessage>,

    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub session_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResetQuery {
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ResetResponse {
    pub message: String,
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub service: String,
    pub status: String,
    pub architecture: String,
    pub agents: Vec<String>,
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}

/// GET /
pub async fn root(State(state): State<Arc<AppState>>) -> Json<ServiceInfo> {
    Json(ServiceInfo {
        service: "Mesa restaurant assistant".to_string(),
        status: "online".to_string(),
        architecture: "multi-agent".to_string(),
        agents: state.coordinator.agent_ids(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /health
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime().as_secs(),
    })
}

/// POST /chat
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let message = req
        .messages
        .last()
        .map(|m| m.content.trim())
        .filter(|content| !content.is_empty())
        .ok_or(ApiError::EmptyMessage)?;

    info!(
        "Chat request: session={:?}, {} messages",
        req.session_id,
        req.messages.len()
    );

    let outcome = state
        .coordinator
        .process(message, req.session_id.clone())
        .await;

    if !outcome.success {
        let detail = outcome
            .error
            .unwrap_or_else(|| "could not process the message".to_string());
        error!("Chat processing failed: {}", detail);
        return Err(ApiError::Processing(detail));
    }

    Ok(Json(ChatResponse {
        response: outcome.response.unwrap_or_default(),
        session_id: outcome.session_id,
    }))
}

/// POST /chat/reset?session_id=
pub async fn reset_chat(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ResetQuery>,
) -> Json<ResetResponse> {
    state
        .coordinator
        .reset_session(query.session_id.as_deref())
        .await;

    Json(ResetResponse {
        message: "Session reset".to_string(),
        session_id: query.session_id,
    })
}

/// GET /agents/status
pub async fn agents_status(State(state): State<Arc<AppState>>) -> Json<SystemStatus> {
    Json(state.coordinator.system_status())
}
