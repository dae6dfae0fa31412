//! Builds the identity of every restaurant agent.

use tracing::debug;

use mesa_protocols::agent::{AgentConfig, AgentRole, SystemPromptMode};
use mesa_protocols::provider::GenerationSettings;
use mesa_tools_restaurant::{MENU_TOOLS, RESERVATION_TOOLS};

use crate::prompts::{INFO_PROMPT, MENUS_PROMPT, ORCHESTRATOR_PROMPT, RESERVATIONS_PROMPT};

pub const RESERVATIONS_AGENT: &str = "reservations_agent";
pub const MENUS_AGENT: &str = "menus_agent";
pub const INFO_AGENT: &str = "info_agent";
pub const ORCHESTRATOR_AGENT: &str = "orchestrator";

/// Produces [`AgentConfig`]s sharing one model and prompt mode.
///
/// Specialists use `generation`; the orchestrator uses `routing`, which
/// defaults to the same settings with temperature 0.3 and 512 output tokens.
#[derive(Debug, Clone)]
pub struct AgentFactory {
    generation: GenerationSettings,
    routing: GenerationSettings,
    prompt_mode: SystemPromptMode,
    model: String,
}

impl AgentFactory {
    pub fn new(generation: GenerationSettings) -> Self {
        Self {
            generation,
            routing: GenerationSettings {
                temperature: 0.3,
                max_output_tokens: 512,
                ..generation
            },
            prompt_mode: SystemPromptMode::default(),
            model: String::new(),
        }
    }

    pub fn with_routing(mut self, routing: GenerationSettings) -> Self {
        self.routing = routing;
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

    fn build(
        &self,
        id: &str,
        role: AgentRole,
        prompt: &str,
        generation: GenerationSettings,
    ) -> AgentConfig {
        AgentConfig::new(id, role, prompt)
            .with_generation(generation)
            .with_prompt_mode(self.prompt_mode)
            .with_model(self.model.clone())
    }

    pub fn reservations(&self) -> AgentConfig {
        self.build(
            RESERVATIONS_AGENT,
            AgentRole::Reservations,
            RESERVATIONS_PROMPT,
            self.generation,
        )
        .with_tools(RESERVATION_TOOLS)
    }

    pub fn menus(&self) -> AgentConfig {
        self.build(MENUS_AGENT, AgentRole::Menus, MENUS_PROMPT, self.generation)
            .with_tools(MENU_TOOLS)
    }

    pub fn info(&self) -> AgentConfig {
        self.build(INFO_AGENT, AgentRole::Info, INFO_PROMPT, self.generation)
    }

    pub fn orchestrator(&self) -> AgentConfig {
        self.build(
            ORCHESTRATOR_AGENT,
            AgentRole::Orchestrator,
            ORCHESTRATOR_PROMPT,
            self.routing,
        )
    }

    /// The three specialists, in catalogue order.
    pub fn specialists(&self) -> Vec<AgentConfig> {
        let agents = vec![self.reservations(), self.menus(), self.info()];
        debug!(
            "Built specialist agents: {:?}",
            agents.iter().map(|a| a.id.as_str()).collect::<Vec<_>>()
        );
        agents
    }
}

impl Default for AgentFactory {
    fn default() -> Self {
        Self::new(GenerationSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_subsets() {
        let factory = AgentFactory::default();
        assert_eq!(factory.reservations().tools, RESERVATION_TOOLS.to_vec());
        assert_eq!(factory.menus().tools, MENU_TOOLS.to_vec());
        assert!(factory.info().tools.is_empty());
        assert!(factory.orchestrator().tools.is_empty());
    }

    #[test]
    fn test_orchestrator_generation() {
        let factory = AgentFactory::default();
        let routing = factory.orchestrator().generation;
        assert_eq!(routing.temperature, 0.3);
        assert_eq!(routing.max_output_tokens, 512);
        assert_eq!(routing.top_p, 0.95);
        assert_eq!(routing.top_k, 40);

        let specialist = factory.menus().generation;
        assert_eq!(specialist, GenerationSettings::default());
    }

    #[test]
    fn test_orchestrator_prompt_lists_specialists() {
        let factory = AgentFactory::default();
        let prompt = factory.orchestrator().system_prompt;
        for agent in factory.specialists() {
            assert!(prompt.contains(&agent.id), "missing {}", agent.id);
        }
        assert!(prompt.contains("\"agents\""));
        assert!(prompt.contains("\"reasoning\""));
    }

    #[test]
    fn test_prompts_name_their_tools() {
        let factory = AgentFactory::default();
        for agent in factory.specialists() {
            for tool in &agent.tools {
                assert!(agent.system_prompt.contains(tool.as_str()), "{} lacks {}", agent.id, tool);
            }
        }
    }

    #[test]
    fn test_prompt_mode_and_model_propagate() {
        let factory = AgentFactory::default()
            .with_prompt_mode(SystemPromptMode::FirstMessagePrefix)
            .with_model("gemini-2.5-pro");
        let info = factory.info();
        assert_eq!(info.prompt_mode, SystemPromptMode::FirstMessagePrefix);
        assert_eq!(info.model, "gemini-2.5-pro");
        assert_eq!(factory.orchestrator().model, "gemini-2.5-pro");
    }

    #[test]
    fn test_roles() {
        let factory = AgentFactory::default();
        assert_eq!(factory.reservations().role, AgentRole::Reservations);
        assert_eq!(factory.menus().role, AgentRole::Menus);
        assert_eq!(factory.info().role, AgentRole::Info);
        assert_eq!(factory.orchestrator().role, AgentRole::Orchestrator);
    }
}
