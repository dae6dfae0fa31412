//! Configuration validation.

use crate::schema::Config;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_server(config, &mut result);
        Self::validate_backend(config, &mut result);
        Self::validate_provider(config, &mut result);
        Self::validate_sampling(config, &mut result);
        Self::validate_agents(config, &mut result);

        result
    }

    fn validate_server(config: &Config, result: &mut ValidationResult) {
        if config.server.port == 0 {
            result.add_error(ValidationError::new("server.port", "Port cannot be 0"));
        }

        if config.server.host.is_empty() {
            result.add_error(ValidationError::new("server.host", "Host cannot be empty"));
        }
    }

    fn validate_backend(config: &Config, result: &mut ValidationResult) {
        Self::check_http_url("backend.base_url", &config.backend.base_url, result);

        if config.backend.timeout_seconds == 0 {
            result.add_error(ValidationError::new(
                "backend.timeout_seconds",
                "timeout_seconds must be greater than 0",
            ));
        }
    }

    fn validate_provider(config: &Config, result: &mut ValidationResult) {
        if config.provider.api_key.is_none() {
            result.add_warning(ValidationWarning::new(
                "provider.api_key",
                "API key is not set, set GEMINI_API_KEY before serving requests",
            ));
        }

        if let Some(ref url) = config.provider.base_url {
            Self::check_http_url("provider.base_url", url, result);
        }

        if config.provider.model.is_empty() {
            result.add_error(ValidationError::new("provider.model", "Model cannot be empty"));
        }
    }

    fn validate_sampling(config: &Config, result: &mut ValidationResult) {
        let temperatures = [
            ("generation.temperature", config.generation.temperature),
            ("orchestrator.temperature", config.orchestrator.temperature),
        ];
        for (path, value) in temperatures {
            if !(0.0..=2.0).contains(&value) {
                result.add_error(ValidationError::new(
                    path,
                    format!("temperature {} is outside [0, 2]", value),
                ));
            }
        }

        if !(0.0..=1.0).contains(&config.generation.top_p) {
            result.add_error(ValidationError::new(
                "generation.top_p",
                "top_p must be within [0, 1]",
            ));
        }

        if config.generation.max_output_tokens == 0 || config.orchestrator.max_output_tokens == 0 {
            result.add_error(ValidationError::new(
                "max_output_tokens",
                "max_output_tokens must be greater than 0",
            ));
        }
    }

    fn validate_agents(config: &Config, result: &mut ValidationResult) {
        if config.agents.max_tool_rounds == 0 {
            result.add_error(ValidationError::new(
                "agents.max_tool_rounds",
                "max_tool_rounds must be greater than 0",
            ));
        }

        if config.agents.max_tool_rounds > 50 {
            result.add_warning(ValidationWarning::new(
                "agents.max_tool_rounds",
                "max_tool_rounds is very high (>50), a looping model will burn quota",
            ));
        }

        if config.orchestrator.default_agent.is_empty() {
            result.add_error(ValidationError::new(
                "orchestrator.default_agent",
                "Default agent cannot be empty",
            ));
        }
    }

    fn check_http_url(path: &str, value: &str, result: &mut ValidationResult) {
        match url::Url::parse(value) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(_) => result.add_error(ValidationError::new(
                path,
                "URL must start with http:// or https://",
            )),
            Err(e) => result.add_error(ValidationError::new(path, format!("Invalid URL: {}", e))),
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
