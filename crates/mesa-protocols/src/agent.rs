//! Agent protocol definitions.
//!
//! An agent is one model conversation bound to a fixed prompt and tool
//! subset. These types describe its identity, its observable state and the
//! data it hands back to the coordinator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::provider::GenerationSettings;

/// Specialization of an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentRole {
    Reservations,
    Menus,
    Info,
    Orchestrator,
}

impl AgentRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentRole::Reservations => "reservations",
            AgentRole::Menus => "menus",
            AgentRole::Info => "info",
            AgentRole::Orchestrator => "orchestrator",
        }
    }
}

impl fmt::Display for AgentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of an agent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    #[default]
    Idle,
    Running,
    /// Blocked on a tool result.
    Waiting,
    Error,
    Completed,
}

/// How the system prompt reaches the model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemPromptMode {
    /// Sent as the request's system instruction on every call.
    #[default]
    Instruction,
    /// Prepended to the first user message of a fresh session.
    FirstMessagePrefix,
}

/// Immutable identity of an agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Unique agent ID.
    pub id: String,

    /// Specialization.
    pub role: AgentRole,

    /// System prompt.
    pub system_prompt: String,

    /// Names of the tools this agent may call.
    #[serde(default)]
    pub tools: Vec<String>,

    /// Sampling parameters.
    #[serde(default)]
    pub generation: GenerationSettings,

    /// Prompt delivery mode.
    #[serde(default)]
    pub prompt_mode: SystemPromptMode,

    /// Model override. Empty uses the provider default.
    #[serde(default)]
    pub model: String,
}

impl AgentConfig {
    pub fn new(id: impl Into<String>, role: AgentRole, system_prompt: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role,
            system_prompt: system_prompt.into(),
            tools: Vec::new(),
            generation: GenerationSettings::default(),
            prompt_mode: SystemPromptMode::default(),
            model: String::new(),
        }
    }

    pub fn with_tools<I, S>(mut self, tools: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tools = tools.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_generation(mut self, generation: GenerationSettings) -> Self {
        self.generation = generation;
        self
    }

    pub fn with_prompt_mode(mut self, mode: SystemPromptMode) -> Self {
        self.prompt_mode = mode;
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

/// Author of a history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Agent,
}

/// One completed turn in an agent's conversation history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub speaker: Speaker,
    pub text: String,
}

impl HistoryEntry {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::User,
            text: text.into(),
        }
    }

    pub fn agent(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Agent,
            text: text.into(),
        }
    }
}

/// Outcome of a single `execute` call. Never an `Err`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub success: bool,
    pub agent_id: String,
    pub role: AgentRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Execution count including this call.
    pub execution_count: u64,
    pub timestamp: DateTime<Utc>,
}

impl ExecutionResult {
    pub fn succeeded(
        agent_id: impl Into<String>,
        role: AgentRole,
        response: impl Into<String>,
        execution_count: u64,
    ) -> Self {
        Self {
            success: true,
            agent_id: agent_id.into(),
            role,
            response: Some(response.into()),
            error: None,
            execution_count,
            timestamp: Utc::now(),
        }
    }

    pub fn failed(
        agent_id: impl Into<String>,
        role: AgentRole,
        error: impl Into<String>,
        execution_count: u64,
    ) -> Self {
        Self {
            success: false,
            agent_id: agent_id.into(),
            role,
            response: None,
            error: Some(error.into()),
            execution_count,
            timestamp: Utc::now(),
        }
    }
}

/// Read-only view of an agent's runtime state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentStatusSnapshot {
    pub agent_id: String,
    pub role: AgentRole,
    pub status: AgentStatus,
    pub execution_count: u64,
    pub created_at: DateTime<Utc>,
    pub last_execution: Option<DateTime<Utc>>,
    pub history_length: usize,
}

/// The orchestrator's choice of agents for a message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingDecision {
    pub agents: Vec<String>,
    #[serde(default)]
    pub reasoning: String,
}

impl RoutingDecision {
    pub fn new(agents: Vec<String>, reasoning: impl Into<String>) -> Self {
        Self {
            agents,
            reasoning: reasoning.into(),
        }
    }

    /// Route everything to `agent_id` because no usable decision was made.
    pub fn fallback(agent_id: impl Into<String>) -> Self {
        Self::new(vec![agent_id.into()], "fallback")
    }

    pub fn is_fallback(&self) -> bool {
        self.reasoning == "fallback"
    }
}

#[cfg(test)]
#[path = "agent_tests.rs"]
mod tests;
