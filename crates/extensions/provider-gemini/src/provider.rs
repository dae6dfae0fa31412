//! Gemini LLM provider implementation.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::{debug, warn};

use mesa_protocols::error::ProviderError;
use mesa_protocols::provider::{CompletionRequest, CompletionResponse, LLMProvider};
use mesa_protocols::types::{Message, MessageRole, StopReason, ToolCall, Usage};

use crate::client::{DEFAULT_BASE_URL, GeminiClient};
use crate::types::*;

/// Connection and safety options for [`GeminiProvider`].
#[derive(Debug, Clone)]
pub struct GeminiOptions {
    pub base_url: String,
    pub default_model: String,
    pub request_timeout: Duration,
    pub safety_settings: Vec<SafetySetting>,
}

impl Default for GeminiOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            default_model: "gemini-2.5-flash".to_string(),
            request_timeout: Duration::from_secs(120),
            safety_settings: SafetySetting::block_medium_and_above(),
        }
    }
}

/// Gemini LLM provider.
pub struct GeminiProvider {
    client: GeminiClient,
    default_model: String,
    safety_settings: Vec<SafetySetting>,
}

impl GeminiProvider {
    /// Create a new Gemini provider.
    pub fn new(api_key: impl Into<String>, options: GeminiOptions) -> Result<Self, ProviderError> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(ProviderError::AuthenticationFailed(
                "Gemini API key is empty".to_string(),
            ));
        }
        Ok(Self {
            client: GeminiClient::new(api_key, options.base_url, options.request_timeout)?,
            default_model: options.default_model,
            safety_settings: options.safety_settings,
        })
    }

    /// Convert conversation messages into Gemini turns.
    ///
    /// Consecutive tool results are merged into one turn so that every batch
    /// of function calls is answered by a single turn of function responses.
    fn convert_messages(&self, messages: &[Message]) -> Vec<Content> {
        let mut contents: Vec<Content> = Vec::with_capacity(messages.len());

        for msg in messages {
            match msg.role {
                MessageRole::User => {
                    contents.push(Content::new(
                        "user",
                        vec![Part::Text {
                            text: msg.content.clone(),
                        }],
                    ));
                }
                MessageRole::Assistant => {
                    let mut parts = Vec::new();
                    if !msg.content.is_empty() {
                        parts.push(Part::Text {
                            text: msg.content.clone(),
                        });
                    }
                    parts.extend(msg.tool_calls.iter().map(|tc| Part::FunctionCall {
                        function_call: FunctionCall {
                            name: tc.name.clone(),
                            args: tc.arguments.clone(),
                        },
                    }));
                    contents.push(Content::new("model", parts));
                }
                MessageRole::Tool => {
                    let part = Part::FunctionResponse {
                        function_response: FunctionResponse {
                            name: msg.name.clone().unwrap_or_default(),
                            response: json!({ "result": decode_payload(&msg.content) }),
                        },
                    };
                    match contents.last_mut() {
                        Some(last) if is_function_response_turn(last) => last.parts.push(part),
                        _ => contents.push(Content::new("user", vec![part])),
                    }
                }
            }
        }

        contents
    }

    fn convert_system(&self, request: &CompletionRequest) -> Option<Content> {
        request.system.as_ref().map(|system| Content {
            role: None,
            parts: vec![Part::Text {
                text: system.clone(),
            }],
        })
    }

    fn convert_tools(&self, request: &CompletionRequest) -> Option<Vec<GeminiTool>> {
        if request.tools.is_empty() {
            return None;
        }

        Some(vec![GeminiTool {
            function_declarations: request
                .tools
                .iter()
                .map(|tool| FunctionDeclaration {
                    name: tool.name.clone(),
                    description: tool.description.clone(),
                    parameters: tool.parameters_schema.clone(),
                })
                .collect(),
        }])
    }

    fn build_request(&self, request: &CompletionRequest) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: self.convert_messages(&request.messages),
            system_instruction: self.convert_system(request),
            generation_config: Some(GenerationConfig {
                temperature: request.temperature,
                top_p: request.top_p,
                top_k: request.top_k,
                max_output_tokens: request.max_tokens,
            }),
            safety_settings: self.safety_settings.clone(),
            tools: self.convert_tools(request),
        }
    }

    fn convert_response(
        &self,
        response: GenerateContentResponse,
        model: &str,
    ) -> Result<CompletionResponse, ProviderError> {
        let Some(candidate) = response.candidates.into_iter().next() else {
            let reason = response
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .map(|r| format!("prompt blocked: {}", r));
            return Err(match reason {
                Some(reason) => ProviderError::ContentFiltered(reason),
                None => ProviderError::EmptyResponse("no candidates returned".to_string()),
            });
        };

        let finish_reason = candidate.finish_reason.as_deref();
        let parts = candidate.content.map(|c| c.parts).unwrap_or_default();

        let mut text_parts = Vec::new();
        let mut tool_calls = Vec::new();

        for part in parts {
            match part {
                Part::Text { text } => text_parts.push(text),
                Part::FunctionCall { function_call } => {
                    let arguments = if function_call.args.is_null() {
                        json!({})
                    } else {
                        function_call.args
                    };
                    tool_calls.push(ToolCall::new(function_call.name, arguments));
                }
                other => debug!("Ignoring unsupported Gemini part: {:?}", other),
            }
        }

        if text_parts.is_empty() && tool_calls.is_empty() {
            return Err(match finish_reason {
                Some(reason @ ("SAFETY" | "PROHIBITED_CONTENT" | "BLOCKLIST" | "SPII")) => {
                    ProviderError::ContentFiltered(format!("response blocked: {}", reason))
                }
                Some(reason) => {
                    ProviderError::EmptyResponse(format!("no content, finish reason {}", reason))
                }
                None => ProviderError::EmptyResponse("candidate has no content".to_string()),
            });
        }

        let stop_reason = if !tool_calls.is_empty() {
            StopReason::ToolUse
        } else {
            match finish_reason {
                Some("MAX_TOKENS") => StopReason::MaxTokens,
                Some("SAFETY") | Some("PROHIBITED_CONTENT") => StopReason::ContentFiltered,
                _ => StopReason::EndTurn,
            }
        };

        let usage = response
            .usage_metadata
            .map(|u| Usage {
                prompt_tokens: u.prompt_token_count,
                completion_tokens: u.candidates_token_count,
                total_tokens: u.total_token_count,
            })
            .unwrap_or_default();

        Ok(CompletionResponse {
            id: format!("gemini-{}", uuid::Uuid::new_v4()),
            model: response.model_version.unwrap_or_else(|| model.to_string()),
            message: Message::assistant(text_parts.join("")).with_tool_calls(tool_calls),
            stop_reason,
            usage,
            metadata: HashMap::new(),
        })
    }
}

fn decode_payload(content: &str) -> Value {
    serde_json::from_str(content).unwrap_or_else(|_| Value::String(content.to_string()))
}

fn is_function_response_turn(content: &Content) -> bool {
    !content.parts.is_empty()
        && content
            .parts
            .iter()
            .all(|p| matches!(p, Part::FunctionResponse { .. }))
}

#[async_trait]
impl LLMProvider for GeminiProvider {
    fn id(&self) -> &str {
        "gemini"
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, ProviderError> {
        let model = if request.model.is_empty() {
            self.default_model.as_str()
        } else {
            request.model.as_str()
        };
        debug!(
            "Gemini complete: model={}, messages={}, tools={}",
            model,
            request.messages.len(),
            request.tools.len()
        );

        let gemini_request = self.build_request(&request);
        let response = self.client.generate_content(model, &gemini_request).await?;
        let completion = self.convert_response(response, model);
        if let Err(ref e) = completion {
            warn!("Gemini returned no usable candidate: {}", e);
        }
        completion
    }
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;
