//! Function-call resolution loop.
//!
//! Drives one agent turn to a final text answer: ask the model, run any tool
//! calls it requests through the registry, feed the payloads back, repeat.
//! The number of tool rounds per turn is bounded.

use tracing::{debug, info, warn};

use mesa_core::ToolRegistry;
use mesa_protocols::agent::{AgentConfig, AgentStatus, SystemPromptMode};
use mesa_protocols::error::AgentError;
use mesa_protocols::provider::{CompletionRequest, LLMProvider};
use mesa_protocols::tool::ToolContext;
use mesa_protocols::types::{Message, ToolCall};

/// Default bound on tool-call rounds within one turn.
pub const DEFAULT_MAX_TOOL_ROUNDS: u32 = 10;

#[derive(Debug)]
enum LoopState {
    Generating,
    AwaitingToolResult(Vec<ToolCall>),
}

/// One resolution run over a borrowed agent identity.
pub struct ResolutionLoop<'a> {
    config: &'a AgentConfig,
    provider: &'a dyn LLMProvider,
    tools: &'a ToolRegistry,
    max_rounds: u32,
}

impl<'a> ResolutionLoop<'a> {
    pub fn new(config: &'a AgentConfig, provider: &'a dyn LLMProvider, tools: &'a ToolRegistry) -> Self {
        Self {
            config,
            provider,
            tools,
            max_rounds: DEFAULT_MAX_TOOL_ROUNDS,
        }
    }

    pub fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    fn build_request(&self, messages: &[Message]) -> CompletionRequest {
        let mut request = CompletionRequest::new(self.config.model.clone(), messages.to_vec())
            .with_generation(&self.config.generation)
            .with_tools(self.tools.declare());

        if self.config.prompt_mode == SystemPromptMode::Instruction {
            request = request.with_system(self.config.system_prompt.clone());
        }

        request
    }

    /// Run until the model answers without tool calls.
    ///
    /// `messages` must end with the new user turn. Every model reply and tool
    /// result is appended to it. `on_status` observes `Waiting` while tools
    /// run and `Running` while the model generates.
    pub async fn run<F>(&self, messages: &mut Vec<Message>, on_status: F) -> Result<String, AgentError>
    where
        F: Fn(AgentStatus) + Send + Sync,
    {
        let mut state = LoopState::Generating;
        let mut rounds = 0u32;

        loop {
            state = match state {
                LoopState::Generating => {
                    let request = self.build_request(messages);
                    debug!(
                        "Agent {} requesting completion ({} messages, {} tools)",
                        self.config.id,
                        request.messages.len(),
                        request.tools.len()
                    );

                    let response = self.provider.complete(request).await?;
                    if !response.message.has_tool_calls() {
                        let text = response.message.content.clone();
                        messages.push(response.message);
                        return Ok(text);
                    }
                    let calls = response.message.tool_calls.clone();
                    messages.push(response.message);
                    LoopState::AwaitingToolResult(calls)
                }
                LoopState::AwaitingToolResult(calls) => {
                    if rounds >= self.max_rounds {
                        warn!(
                            "Agent {} exceeded {} tool-call rounds",
                            self.config.id, self.max_rounds
                        );
                        return Err(AgentError::ToolLoopExceeded(self.max_rounds));
                    }
                    rounds += 1;

                    on_status(AgentStatus::Waiting);
                    for call in calls {
                        info!("Agent {} calling tool {}", self.config.id, call.name);
                        let payload = self
                            .tools
                            .invoke(&call.name, call.arguments.clone(), ToolContext::new(&self.config.id))
                            .await;
                        messages.push(Message::tool_result(&call, &payload));
                    }
                    on_status(AgentStatus::Running);

                    LoopState::Generating
                }
            };
        }
    }
}
