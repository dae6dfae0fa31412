//! Agent runner.
//!
//! An [`AgentRunner`] binds one [`AgentConfig`] to a provider and a tool
//! subset, and owns the agent's history, status and open model session.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tokio::sync::Mutex;
use tracing::{error, info};

use mesa_core::{Registerable, ToolRegistry};
use mesa_protocols::agent::{
    AgentConfig, AgentRole, AgentStatus, AgentStatusSnapshot, ExecutionResult, HistoryEntry,
    Speaker, SystemPromptMode,
};
use mesa_protocols::provider::LLMProvider;
use mesa_protocols::types::Message;

use crate::resolution::{DEFAULT_MAX_TOOL_ROUNDS, ResolutionLoop};

#[derive(Debug)]
struct AgentState {
    status: AgentStatus,
    history: Vec<HistoryEntry>,
    execution_count: u64,
    created_at: DateTime<Utc>,
    last_execution: Option<DateTime<Utc>>,
}

/// A running agent.
pub struct AgentRunner {
    config: AgentConfig,
    provider: Arc<dyn LLMProvider>,
    tools: ToolRegistry,
    max_tool_rounds: u32,
    state: RwLock<AgentState>,
    /// Open model conversation. Locked for the whole of `execute`, which
    /// serializes concurrent calls on the same agent.
    session: Mutex<Option<Vec<Message>>>,
}

impl AgentRunner {
    /// Create an agent whose tools are `config.tools` looked up in `catalogue`.
    pub fn new(config: AgentConfig, provider: Arc<dyn LLMProvider>, catalogue: &ToolRegistry) -> Self {
        let tools = catalogue.subset(&config.tools);
        info!(
            "Agent {} ({}) initialized with {} tools",
            config.id,
            config.role,
            tools.len()
        );

        Self {
            config,
            provider,
            tools,
            max_tool_rounds: DEFAULT_MAX_TOOL_ROUNDS,
            state: RwLock::new(AgentState {
                status: AgentStatus::Idle,
                history: Vec::new(),
                execution_count: 0,
                created_at: Utc::now(),
                last_execution: None,
            }),
            session: Mutex::new(None),
        }
    }

    pub fn with_max_tool_rounds(mut self, max_tool_rounds: u32) -> Self {
        self.max_tool_rounds = max_tool_rounds;
        self
    }

    pub fn id(&self) -> &str {
        &self.config.id
    }

    pub fn role(&self) -> AgentRole {
        self.config.role
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Run one user turn. Failures come back as an unsuccessful result.
    pub async fn execute(
        &self,
        message: &str,
        context: Option<&BTreeMap<String, String>>,
    ) -> ExecutionResult {
        let mut session = self.session.lock().await;

        let execution_count = {
            let mut state = self.state.write();
            state.execution_count += 1;
            state.status = AgentStatus::Running;
            state.last_execution = Some(Utc::now());
            state.execution_count
        };
        info!("Agent {} executing message #{}", self.config.id, execution_count);

        let text = match context {
            Some(context) if !context.is_empty() => with_context(message, context),
            _ => message.to_string(),
        };

        let fresh = session.is_none();
        let mut messages = match session.take() {
            Some(messages) => messages,
            None => self.seed_from_history(),
        };
        let checkpoint = messages.len();

        let outgoing = if fresh && self.config.prompt_mode == SystemPromptMode::FirstMessagePrefix {
            format!("{}\n\n{}", self.config.system_prompt, text)
        } else {
            text.clone()
        };
        messages.push(Message::user(outgoing));

        let outcome = ResolutionLoop::new(&self.config, self.provider.as_ref(), &self.tools)
            .with_max_rounds(self.max_tool_rounds)
            .run(&mut messages, |status| self.state.write().status = status)
            .await;

        match outcome {
            Ok(answer) => {
                *session = Some(messages);
                {
                    let mut state = self.state.write();
                    state.history.push(HistoryEntry::user(text));
                    state.history.push(HistoryEntry::agent(answer.clone()));
                    state.status = AgentStatus::Completed;
                }
                info!(
                    "Agent {} completed execution #{}",
                    self.config.id, execution_count
                );
                ExecutionResult::succeeded(&self.config.id, self.config.role, answer, execution_count)
            }
            Err(e) => {
                // Drop the partial turn so the session matches the history.
                if !fresh {
                    messages.truncate(checkpoint);
                    *session = Some(messages);
                }
                self.state.write().status = AgentStatus::Error;
                error!("Agent {} failed: {}", self.config.id, e);
                ExecutionResult::failed(&self.config.id, self.config.role, e.to_string(), execution_count)
            }
        }
    }

    fn seed_from_history(&self) -> Vec<Message> {
        self.state
            .read()
            .history
            .iter()
            .map(|entry| match entry.speaker {
                Speaker::User => Message::user(entry.text.clone()),
                Speaker::Agent => Message::assistant(entry.text.clone()),
            })
            .collect()
    }

    /// Clear history and the open session. Waits for an in-flight execution.
    pub async fn reset(&self) {
        let mut session = self.session.lock().await;
        *session = None;

        let mut state = self.state.write();
        state.history.clear();
        state.status = AgentStatus::Idle;
        info!("Agent {} reset", self.config.id);
    }

    pub fn status(&self) -> AgentStatusSnapshot {
        let state = self.state.read();
        AgentStatusSnapshot {
            agent_id: self.config.id.clone(),
            role: self.config.role,
            status: state.status,
            execution_count: state.execution_count,
            created_at: state.created_at,
            last_execution: state.last_execution,
            history_length: state.history.len(),
        }
    }

    /// Completed turns, oldest first.
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.state.read().history.clone()
    }
}

impl Registerable for AgentRunner {
    fn registry_id(&self) -> &str {
        &self.config.id
    }
}

fn with_context(message: &str, context: &BTreeMap<String, String>) -> String {
    let block = context
        .iter()
        .map(|(k, v)| format!("{}: {}", k, v))
        .collect::<Vec<_>>()
        .join("\n");
    format!("[Context: {}]\n\n{}", block, message)
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
