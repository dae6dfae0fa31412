//! # Mesa Protocols
//!
//! Shared protocol definitions for the Mesa assistant.
//! Contains the seams between crates and no behavior of its own.
//!
//! ## Core Traits
//!
//! - [`Tool`] - An external action the model may request
//! - [`LLMProvider`] - A hosted model that completes conversations

pub mod agent;
pub mod error;
pub mod provider;
pub mod tool;
pub mod types;

pub use agent::{
    AgentConfig, AgentRole, AgentStatus, AgentStatusSnapshot, ExecutionResult, HistoryEntry,
    RoutingDecision, Speaker, SystemPromptMode,
};
pub use error::{AgentError, ProviderError, ToolError};
pub use provider::{CompletionRequest, CompletionResponse, GenerationSettings, LLMProvider};
pub use tool::{Tool, ToolContext, ToolDefinition, ToolResult};
pub use types::*;
