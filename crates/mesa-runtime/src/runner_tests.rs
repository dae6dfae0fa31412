use super::*;
use crate::test_support::{ScriptedProvider, last_user_text, text_reply, tool_reply};
use async_trait::async_trait;
use mesa_protocols::error::ToolError;
use mesa_protocols::tool::{Tool, ToolContext, ToolDefinition, ToolResult};
use mesa_protocols::types::{MessageRole, ToolCall};
use serde_json::{Value, json};

struct BestMenuTool {
    definition: ToolDefinition,
}

impl BestMenuTool {
    fn new() -> Self {
        Self {
            definition: ToolDefinition::new("get_best_rated_menu", "Best rated menu"),
        }
    }
}

#[async_trait]
impl Tool for BestMenuTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, _params: Value, _ctx: ToolContext) -> Result<ToolResult, ToolError> {
        Ok(ToolResult::success().with("menu", json!({"nombre": "Degustación"})))
    }
}

fn catalogue() -> ToolRegistry {
    let registry = ToolRegistry::new();
    registry.register(Arc::new(BestMenuTool::new())).unwrap();
    registry
}

fn config() -> AgentConfig {
    AgentConfig::new("menus_agent", AgentRole::Menus, "You recommend menus")
        .with_tools(["get_best_rated_menu"])
}

fn runner(provider: Arc<ScriptedProvider>) -> AgentRunner {
    AgentRunner::new(config(), provider, &catalogue())
}

#[tokio::test]
async fn test_new_agent_is_idle() {
    let agent = runner(Arc::new(ScriptedProvider::always("ok")));
    let status = agent.status();
    assert_eq!(status.status, AgentStatus::Idle);
    assert_eq!(status.execution_count, 0);
    assert_eq!(status.history_length, 0);
    assert!(status.last_execution.is_none());
    assert_eq!(agent.registry_id(), "menus_agent");
}

#[tokio::test]
async fn test_execute_success() {
    let agent = runner(Arc::new(ScriptedProvider::always("Te recomiendo el menú degustación")));

    let result = agent.execute("¿Qué menú recomiendan?", None).await;

    assert!(result.success);
    assert_eq!(result.agent_id, "menus_agent");
    assert_eq!(result.role, AgentRole::Menus);
    assert_eq!(result.response.as_deref(), Some("Te recomiendo el menú degustación"));
    assert!(result.error.is_none());
    assert_eq!(result.execution_count, 1);

    let status = agent.status();
    assert_eq!(status.status, AgentStatus::Completed);
    assert_eq!(status.history_length, 2);
    assert!(status.last_execution.is_some());

    let history = agent.history();
    assert_eq!(history[0], HistoryEntry::user("¿Qué menú recomiendan?"));
    assert_eq!(history[1], HistoryEntry::agent("Te recomiendo el menú degustación"));
}

#[tokio::test]
async fn test_execution_count_counts_every_attempt() {
    let provider = Arc::new(ScriptedProvider::from_fn(|_, n| {
        if n % 2 == 0 {
            Ok(text_reply("ok"))
        } else {
            Err(mesa_protocols::error::ProviderError::Network("flaky".to_string()))
        }
    }));
    let agent = runner(provider);

    for i in 1..=5u64 {
        let result = agent.execute("hola", None).await;
        assert_eq!(result.execution_count, i);
    }
    assert_eq!(agent.status().execution_count, 5);
    // Three successes, two entries each.
    assert_eq!(agent.status().history_length, 6);
}

#[tokio::test]
async fn test_execute_failure_is_data() {
    let agent = runner(Arc::new(ScriptedProvider::failing("quota exhausted")));

    let result = agent.execute("hola", None).await;

    assert!(!result.success);
    assert!(result.response.is_none());
    assert!(result.error.unwrap().contains("quota exhausted"));
    assert_eq!(result.execution_count, 1);

    let status = agent.status();
    assert_eq!(status.status, AgentStatus::Error);
    assert_eq!(status.history_length, 0);
}

#[tokio::test]
async fn test_tool_round_trip() {
    let provider = Arc::new(ScriptedProvider::replies(vec![
        tool_reply(vec![ToolCall::new("get_best_rated_menu", json!({}))]),
        text_reply("El mejor es el Degustación"),
    ]));
    let agent = runner(provider.clone());

    let result = agent.execute("¿Cuál es el mejor menú?", None).await;
    assert_eq!(result.response.as_deref(), Some("El mejor es el Degustación"));

    let requests = provider.requests();
    assert_eq!(requests[0].tools.len(), 1);
    let tool_msg = requests[1].messages.last().unwrap();
    assert_eq!(tool_msg.role, MessageRole::Tool);
    assert!(tool_msg.content.contains("Degustación"));
}

#[tokio::test]
async fn test_tools_outside_subset_are_not_declared() {
    let config = AgentConfig::new("info_agent", AgentRole::Info, "General info");
    let provider = Arc::new(ScriptedProvider::always("Abrimos a las 9"));
    let agent = AgentRunner::new(config, provider.clone(), &catalogue());

    agent.execute("horario", None).await;
    assert!(provider.requests()[0].tools.is_empty());
}

#[tokio::test]
async fn test_context_block_prepended() {
    let provider = Arc::new(ScriptedProvider::always("ok"));
    let agent = runner(provider.clone());

    let mut context = BTreeMap::new();
    context.insert("customer".to_string(), "Ana".to_string());
    context.insert("table".to_string(), "7".to_string());
    agent.execute("hola", Some(&context)).await;

    assert_eq!(
        last_user_text(&provider.requests()[0]),
        "[Context: customer: Ana\ntable: 7]\n\nhola"
    );
}

#[tokio::test]
async fn test_session_continues_between_calls() {
    let provider = Arc::new(ScriptedProvider::always("ok"));
    let agent = runner(provider.clone());

    agent.execute("uno", None).await;
    agent.execute("dos", None).await;

    let second = &provider.requests()[1];
    let contents: Vec<_> = second.messages.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["uno", "ok", "dos"]);
}

#[tokio::test]
async fn test_failed_turn_is_dropped_from_session() {
    let provider = Arc::new(ScriptedProvider::from_fn(|request, _| {
        if last_user_text(request) == "falla" {
            Err(mesa_protocols::error::ProviderError::Network("down".to_string()))
        } else {
            Ok(text_reply("ok"))
        }
    }));
    let agent = runner(provider.clone());

    agent.execute("uno", None).await;
    agent.execute("falla", None).await;
    agent.execute("tres", None).await;

    let last = provider.requests().pop().unwrap();
    let contents: Vec<_> = last.messages.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["uno", "ok", "tres"]);
}

#[tokio::test]
async fn test_reset_clears_history_but_not_count() {
    let provider = Arc::new(ScriptedProvider::always("ok"));
    let agent = runner(provider.clone());

    agent.execute("uno", None).await;
    agent.reset().await;

    let status = agent.status();
    assert_eq!(status.status, AgentStatus::Idle);
    assert_eq!(status.history_length, 0);
    assert_eq!(status.execution_count, 1);

    // Resetting twice is harmless.
    agent.reset().await;
    assert_eq!(agent.status().status, AgentStatus::Idle);

    // The next call starts a new session with no prior turns.
    agent.execute("dos", None).await;
    let last = provider.requests().pop().unwrap();
    assert_eq!(last.messages.len(), 1);
}

#[tokio::test]
async fn test_first_message_prefix_mode() {
    let provider = Arc::new(ScriptedProvider::always("ok"));
    let config = config().with_prompt_mode(SystemPromptMode::FirstMessagePrefix);
    let agent = AgentRunner::new(config, provider.clone(), &catalogue());

    agent.execute("uno", None).await;
    agent.execute("dos", None).await;

    let requests = provider.requests();
    assert!(requests[0].system.is_none());
    assert_eq!(last_user_text(&requests[0]), "You recommend menus\n\nuno");
    assert_eq!(last_user_text(&requests[1]), "dos");
    // History keeps the customer's words only.
    assert_eq!(agent.history()[0], HistoryEntry::user("uno"));
}

#[tokio::test]
async fn test_tool_loop_limit_fails_execution() {
    let provider = Arc::new(ScriptedProvider::from_fn(|_, _| {
        Ok(tool_reply(vec![ToolCall::new("get_best_rated_menu", json!({}))]))
    }));
    let agent = runner(provider).with_max_tool_rounds(2);

    let result = agent.execute("loop", None).await;
    assert!(!result.success);
    assert!(result.error.unwrap().contains("tool-call loop exceeded"));
    assert_eq!(agent.status().status, AgentStatus::Error);
}

#[tokio::test]
async fn test_concurrent_calls_are_serialized() {
    let provider = Arc::new(ScriptedProvider::always("ok"));
    let agent = Arc::new(runner(provider.clone()));

    let a = {
        let agent = agent.clone();
        tokio::spawn(async move { agent.execute("a", None).await })
    };
    let b = {
        let agent = agent.clone();
        tokio::spawn(async move { agent.execute("b", None).await })
    };
    let (a, b) = (a.await.unwrap(), b.await.unwrap());

    let mut counts = vec![a.execution_count, b.execution_count];
    counts.sort();
    assert_eq!(counts, vec![1, 2]);
    assert_eq!(agent.status().history_length, 4);

    // The second request saw the whole first turn.
    assert_eq!(provider.requests()[1].messages.len(), 3);
}
