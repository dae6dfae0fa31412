//! Configuration schema definitions.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub generation: GenerationConfig,

    #[serde(default)]
    pub orchestrator: OrchestratorConfig,

    #[serde(default)]
    pub agents: AgentsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

/// Reservation backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the REST API, including the `/api` prefix.
    #[serde(default = "default_backend_url")]
    pub base_url: String,

    /// Timeout applied to every tool call.
    #[serde(default = "default_backend_timeout")]
    pub timeout_seconds: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_backend_url(),
            timeout_seconds: default_backend_timeout(),
        }
    }
}

fn default_backend_url() -> String {
    "http://localhost:3000/api".to_string()
}

fn default_backend_timeout() -> u64 {
    10
}

/// Model provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Override of the Gemini REST endpoint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    #[serde(default = "default_model")]
    pub model: String,

    /// Transport timeout for a single model call.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            model: default_model(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_request_timeout() -> u64 {
    120
}

/// Sampling parameters for the specialist agents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_top_p")]
    pub top_p: f32,

    #[serde(default = "default_top_k")]
    pub top_k: u32,

    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            top_p: default_top_p(),
            top_k: default_top_k(),
            max_output_tokens: default_max_output_tokens(),
        }
    }
}

fn default_temperature() -> f32 {
    0.7
}

fn default_top_p() -> f32 {
    0.95
}

fn default_top_k() -> u32 {
    40
}

fn default_max_output_tokens() -> u32 {
    2048
}

/// Routing agent configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    #[serde(default = "default_orchestrator_temperature")]
    pub temperature: f32,

    #[serde(default = "default_orchestrator_max_tokens")]
    pub max_output_tokens: u32,

    /// Agent used when no routing decision can be made.
    #[serde(default = "default_fallback_agent")]
    pub default_agent: String,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            temperature: default_orchestrator_temperature(),
            max_output_tokens: default_orchestrator_max_tokens(),
            default_agent: default_fallback_agent(),
        }
    }
}

fn default_orchestrator_temperature() -> f32 {
    0.3
}

fn default_orchestrator_max_tokens() -> u32 {
    512
}

fn default_fallback_agent() -> String {
    "info_agent".to_string()
}

/// Shared agent behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentsConfig {
    /// Upper bound on tool-call rounds within one execution.
    #[serde(default = "default_max_tool_rounds")]
    pub max_tool_rounds: u32,

    /// Reply used when no agent produced an answer.
    #[serde(default = "default_apology")]
    pub apology: String,

    /// Prefix the first message of a session with the system prompt instead
    /// of sending a system instruction.
    #[serde(default)]
    pub prompt_as_prefix: bool,
}

impl Default for AgentsConfig {
    fn default() -> Self {
        Self {
            max_tool_rounds: default_max_tool_rounds(),
            apology: default_apology(),
            prompt_as_prefix: false,
        }
    }
}

fn default_max_tool_rounds() -> u32 {
    10
}

fn default_apology() -> String {
    "Sorry, I could not process your request right now.".to_string()
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for rolling log files. Defaults to `~/.mesa/logs`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.backend.base_url, "http://localhost:3000/api");
        assert_eq!(config.backend.timeout_seconds, 10);
        assert_eq!(config.provider.model, "gemini-2.5-flash");
        assert!(config.provider.api_key.is_none());
        assert_eq!(config.agents.max_tool_rounds, 10);
        assert!(!config.agents.prompt_as_prefix);
    }

    #[test]
    fn test_generation_defaults() {
        let generation = GenerationConfig::default();
        assert_eq!(generation.temperature, 0.7);
        assert_eq!(generation.top_p, 0.95);
        assert_eq!(generation.top_k, 40);
        assert_eq!(generation.max_output_tokens, 2048);
    }

    #[test]
    fn test_orchestrator_defaults() {
        let orchestrator = OrchestratorConfig::default();
        assert_eq!(orchestrator.temperature, 0.3);
        assert_eq!(orchestrator.max_output_tokens, 512);
        assert_eq!(orchestrator.default_agent, "info_agent");
    }

    #[test]
    fn test_partial_section_keeps_defaults() {
        let config: Config = toml::from_str("[generation]\ntemperature = 0.2\n").unwrap();
        assert_eq!(config.generation.temperature, 0.2);
        assert_eq!(config.generation.top_k, 40);
    }
}
