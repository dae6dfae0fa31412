//! In-process LLM provider for runtime tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use mesa_protocols::error::ProviderError;
use mesa_protocols::provider::{CompletionRequest, CompletionResponse, LLMProvider};
use mesa_protocols::types::{Message, StopReason, ToolCall, Usage};

type Responder =
    Box<dyn Fn(&CompletionRequest, usize) -> Result<CompletionResponse, ProviderError> + Send + Sync>;

pub fn text_reply(text: &str) -> CompletionResponse {
    CompletionResponse {
        id: "scripted".to_string(),
        model: "scripted-model".to_string(),
        message: Message::assistant(text),
        stop_reason: StopReason::EndTurn,
        usage: Usage::default(),
        metadata: HashMap::new(),
    }
}

pub fn tool_reply(calls: Vec<ToolCall>) -> CompletionResponse {
    CompletionResponse {
        stop_reason: StopReason::ToolUse,
        message: Message::assistant("").with_tool_calls(calls),
        ..text_reply("")
    }
}

/// Text of the newest user message in `request`.
pub fn last_user_text(request: &CompletionRequest) -> String {
    request
        .messages
        .iter()
        .rev()
        .find(|m| m.role == mesa_protocols::types::MessageRole::User)
        .map(|m| m.content.clone())
        .unwrap_or_default()
}

/// Provider answering from a closure and recording every request.
pub struct ScriptedProvider {
    responder: Responder,
    calls: AtomicUsize,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedProvider {
    pub fn from_fn<F>(responder: F) -> Self
    where
        F: Fn(&CompletionRequest, usize) -> Result<CompletionResponse, ProviderError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            responder: Box::new(responder),
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Replay `replies` in order, then fail.
    pub fn replies(replies: Vec<CompletionResponse>) -> Self {
        Self::from_fn(move |_, n| {
            replies
                .get(n)
                .cloned()
                .ok_or_else(|| ProviderError::EmptyResponse("script exhausted".to_string()))
        })
    }

    pub fn always(text: &str) -> Self {
        let text = text.to_string();
        Self::from_fn(move |_, _| Ok(text_reply(&text)))
    }

    pub fn failing(message: &str) -> Self {
        let message = message.to_string();
        Self::from_fn(move |_, _| Err(ProviderError::Network(message.clone())))
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl LLMProvider for ScriptedProvider {
    fn id(&self) -> &str {
        "scripted"
    }

    fn default_model(&self) -> &str {
        "scripted-model"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, ProviderError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        let reply = (self.responder)(&request, n);
        self.requests.lock().push(request);
        reply
    }
}
