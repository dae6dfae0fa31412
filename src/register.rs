//! Tool, provider and agent wiring for Mesa.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use mesa_agents_restaurant::AgentFactory;
use mesa_config::{Config, GenerationConfig};
use mesa_core::ToolRegistry;
use mesa_protocols::agent::SystemPromptMode;
use mesa_protocols::provider::{GenerationSettings, LLMProvider};
use mesa_provider_gemini::{GeminiOptions, GeminiProvider};
use mesa_runtime::{AgentRunner, MultiAgentCoordinator, Orchestrator};
use mesa_tools_restaurant::{BackendClient, restaurant_tools};

fn generation_settings(generation: &GenerationConfig) -> GenerationSettings {
    GenerationSettings {
        temperature: generation.temperature,
        top_p: generation.top_p,
        top_k: generation.top_k,
        max_output_tokens: generation.max_output_tokens,
    }
}

/// Build the agent factory from the sampling and prompt settings.
pub(crate) fn build_factory(config: &Config) -> AgentFactory {
    let generation = generation_settings(&config.generation);
    let routing = GenerationSettings {
        temperature: config.orchestrator.temperature,
        max_output_tokens: config.orchestrator.max_output_tokens,
        ..generation
    };
    let prompt_mode = if config.agents.prompt_as_prefix {
        SystemPromptMode::FirstMessagePrefix
    } else {
        SystemPromptMode::Instruction
    };

    AgentFactory::new(generation)
        .with_routing(routing)
        .with_prompt_mode(prompt_mode)
        .with_model(config.provider.model.clone())
}

/// Register every restaurant tool over one backend client.
pub(crate) fn build_tools(config: &Config) -> Result<ToolRegistry, Box<dyn std::error::Error>> {
    let timeout = Duration::from_secs(config.backend.timeout_seconds);
    let backend = Arc::new(BackendClient::new(&config.backend.base_url, timeout)?);

    let registry = ToolRegistry::new().with_timeout(timeout);
    for tool in restaurant_tools(backend) {
        registry.register(tool)?;
    }
    info!(
        "Registered {} tools against {}",
        registry.len(),
        config.backend.base_url
    );
    Ok(registry)
}

/// Create the Gemini provider. Fails without an API key.
pub(crate) fn build_provider(
    config: &Config,
) -> Result<Arc<dyn LLMProvider>, Box<dyn std::error::Error>> {
    let api_key = config
        .provider
        .api_key
        .as_deref()
        .filter(|key| !key.is_empty())
        .ok_or("Gemini API key is not set (provider.api_key or GEMINI_API_KEY)")?;

    let mut options = GeminiOptions {
        default_model: config.provider.model.clone(),
        request_timeout: Duration::from_secs(config.provider.request_timeout_seconds),
        ..GeminiOptions::default()
    };
    if let Some(ref base_url) = config.provider.base_url {
        options.base_url = base_url.clone();
    }

    let provider = GeminiProvider::new(api_key, options)?;
    info!("Gemini provider ready (model {})", config.provider.model);
    Ok(Arc::new(provider))
}

/// Assemble the specialists, the orchestrator and the coordinator.
pub(crate) fn build_coordinator(
    config: &Config,
    provider: Arc<dyn LLMProvider>,
) -> Result<Arc<MultiAgentCoordinator>, Box<dyn std::error::Error>> {
    let catalogue = build_tools(config)?;
    let factory = build_factory(config);
    let max_rounds = config.agents.max_tool_rounds;

    let orchestrator_agent = AgentRunner::new(factory.orchestrator(), provider.clone(), &catalogue)
        .with_max_tool_rounds(max_rounds);
    let orchestrator = Orchestrator::new(
        Arc::new(orchestrator_agent),
        config.orchestrator.default_agent.clone(),
    );

    let coordinator =
        MultiAgentCoordinator::new(orchestrator).with_apology(config.agents.apology.clone());
    for agent_config in factory.specialists() {
        let runner = AgentRunner::new(agent_config, provider.clone(), &catalogue)
            .with_max_tool_rounds(max_rounds);
        coordinator.register(Arc::new(runner))?;
    }
    coordinator.check_fallback()?;

    Ok(Arc::new(coordinator))
}
