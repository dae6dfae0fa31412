//! Multi-agent coordinator.
//!
//! Owns every agent, asks the orchestrator where a message should go, runs
//! the selected specialists and merges their answers.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::Serialize;
use tracing::{error, info, warn};

use mesa_core::{BaseRegistry, RegistryError};
use mesa_protocols::agent::{AgentRole, AgentStatusSnapshot, ExecutionResult};
use mesa_protocols::error::AgentError;

use crate::orchestrator::Orchestrator;
use crate::runner::AgentRunner;

pub const DEFAULT_APOLOGY: &str = "Sorry, I could not process your request right now.";

/// Result of [`MultiAgentCoordinator::process`].
#[derive(Debug, Clone, Serialize)]
pub struct ProcessOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub agents_used: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub routing_reasoning: Option<String>,
    pub session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProcessOutcome {
    fn failed(error: impl Into<String>, session_id: Option<String>) -> Self {
        Self {
            success: false,
            response: None,
            agents_used: Vec::new(),
            routing_reasoning: None,
            session_id,
            error: Some(error.into()),
        }
    }
}

/// Snapshot of every registered agent.
#[derive(Debug, Clone, Serialize)]
pub struct SystemStatus {
    pub total_agents: usize,
    pub agents: BTreeMap<String, AgentStatusSnapshot>,
    pub timestamp: DateTime<Utc>,
}

pub struct MultiAgentCoordinator {
    agents: BaseRegistry<AgentRunner>,
    orchestrator: Orchestrator,
    apology: String,
}

impl MultiAgentCoordinator {
    /// Create a coordinator. The orchestrator's agent is registered too.
    pub fn new(orchestrator: Orchestrator) -> Self {
        let agents = BaseRegistry::new();
        // A fresh registry cannot hold a duplicate.
        let _ = agents.register(orchestrator.agent().clone());
        Self {
            agents,
            orchestrator,
            apology: DEFAULT_APOLOGY.to_string(),
        }
    }

    pub fn with_apology(mut self, apology: impl Into<String>) -> Self {
        self.apology = apology.into();
        self
    }

    pub fn register(&self, agent: Arc<AgentRunner>) -> Result<(), RegistryError> {
        let id = agent.id().to_string();
        self.agents.register(agent)?;
        info!("Agent {} registered", id);
        Ok(())
    }

    pub fn get(&self, agent_id: &str) -> Option<Arc<AgentRunner>> {
        self.agents.get(agent_id)
    }

    pub fn agents_by_role(&self, role: AgentRole) -> Vec<Arc<AgentRunner>> {
        self.agents
            .values()
            .into_iter()
            .filter(|agent| agent.role() == role)
            .collect()
    }

    /// Registered agent ids, in registration order.
    pub fn agent_ids(&self) -> Vec<String> {
        self.agents.list_ids()
    }

    /// Ids the orchestrator may route to.
    fn specialist_ids(&self) -> Vec<String> {
        let orchestrator_id = self.orchestrator.agent().id();
        self.agents
            .list_ids()
            .into_iter()
            .filter(|id| id != orchestrator_id)
            .collect()
    }

    /// Fails unless the orchestrator's fallback is a registered specialist.
    pub fn check_fallback(&self) -> Result<(), AgentError> {
        let fallback = self.orchestrator.fallback();
        if self.specialist_ids().iter().any(|id| id == fallback) {
            Ok(())
        } else {
            Err(AgentError::NotFound(fallback.to_string()))
        }
    }

    /// Route `message`, run the chosen agents and merge their answers.
    pub async fn process(&self, message: &str, session_id: Option<String>) -> ProcessOutcome {
        if message.trim().is_empty() {
            return ProcessOutcome::failed("message is empty", session_id);
        }

        let known = self.specialist_ids();
        if known.is_empty() {
            return ProcessOutcome::failed("no agents registered", session_id);
        }

        let decision = self.orchestrator.route(message, &known).await;
        if decision.is_fallback() && !decision.agents.iter().all(|id| known.contains(id)) {
            error!(
                "Fallback agent {} is not a registered specialist",
                self.orchestrator.fallback()
            );
            return ProcessOutcome::failed(
                format!(
                    "fallback agent {} is not registered",
                    self.orchestrator.fallback()
                ),
                session_id,
            );
        }

        let response = if let [agent_id] = decision.agents.as_slice() {
            let result = self.execute(agent_id, message).await;
            match result.response.filter(|_| result.success) {
                Some(response) => response,
                None => self.apology.clone(),
            }
        } else {
            info!("Running {} agents in parallel", decision.agents.len());
            let results = join_all(
                decision
                    .agents
                    .iter()
                    .map(|agent_id| self.execute(agent_id, message)),
            )
            .await;
            merge_responses(&results).unwrap_or_else(|| self.apology.clone())
        };

        ProcessOutcome {
            success: true,
            response: Some(response),
            agents_used: decision.agents,
            routing_reasoning: Some(decision.reasoning),
            session_id,
            error: None,
        }
    }

    async fn execute(&self, agent_id: &str, message: &str) -> ExecutionResult {
        match self.agents.get(agent_id) {
            Some(agent) => agent.execute(message, None).await,
            None => {
                warn!("Agent {} vanished before execution", agent_id);
                ExecutionResult::failed(
                    agent_id,
                    AgentRole::Info,
                    AgentError::NotFound(agent_id.to_string()).to_string(),
                    0,
                )
            }
        }
    }

    /// Reset every agent. Agents are shared by all sessions, so `session_id`
    /// is only logged.
    pub async fn reset_session(&self, session_id: Option<&str>) {
        join_all(self.agents.values().iter().map(|agent| agent.reset())).await;
        info!("Session reset: {}", session_id.unwrap_or("<none>"));
    }

    pub async fn reset_agent(&self, agent_id: &str) -> Result<(), AgentError> {
        let agent = self
            .agents
            .get(agent_id)
            .ok_or_else(|| AgentError::NotFound(agent_id.to_string()))?;
        agent.reset().await;
        Ok(())
    }

    pub fn system_status(&self) -> SystemStatus {
        let agents: BTreeMap<_, _> = self
            .agents
            .values()
            .iter()
            .map(|agent| (agent.id().to_string(), agent.status()))
            .collect();

        SystemStatus {
            total_agents: agents.len(),
            agents,
            timestamp: Utc::now(),
        }
    }
}

/// `**Label**: response` for each success, in order. `None` if none succeeded.
fn merge_responses(results: &[ExecutionResult]) -> Option<String> {
    let sections: Vec<String> = results
        .iter()
        .filter(|result| result.success)
        .filter_map(|result| {
            let response = result.response.as_deref()?;
            Some(format!("**{}**: {}", agent_label(&result.agent_id), response))
        })
        .collect();

    if sections.is_empty() {
        None
    } else {
        Some(sections.join("\n\n"))
    }
}

/// `menus_agent` -> `Menus`.
fn agent_label(agent_id: &str) -> String {
    let base = agent_id.strip_suffix("_agent").unwrap_or(agent_id);
    let mut label = String::with_capacity(base.len());
    let mut word_start = true;
    for c in base.chars() {
        if c.is_alphanumeric() {
            if word_start {
                label.extend(c.to_uppercase());
            } else {
                label.extend(c.to_lowercase());
            }
            word_start = false;
        } else {
            label.push(c);
            word_start = true;
        }
    }
    label
}

#[cfg(test)]
#[path = "coordinator_tests.rs"]
mod tests;
