use super::*;
use crate::test_support::{ScriptedProvider, last_user_text};
use mesa_core::ToolRegistry;
use mesa_protocols::agent::{AgentConfig, AgentStatus};
use mesa_protocols::error::ProviderError;

/// Keyword router standing in for the routing model.
fn routing_provider() -> ScriptedProvider {
    ScriptedProvider::from_fn(|request, _| {
        let query = last_user_text(request).to_lowercase();
        let mut agents = Vec::new();
        if query.contains("reserva") || query.contains("token") {
            agents.push("\"reservations_agent\"");
        }
        if query.contains("menú") || query.contains("precio") {
            agents.push("\"menus_agent\"");
        }
        if query.contains("horario") || agents.is_empty() {
            agents.push("\"info_agent\"");
        }
        Ok(crate::test_support::text_reply(&format!(
            "```json\n{{\"agents\": [{}], \"reasoning\": \"keywords\"}}\n```",
            agents.join(", ")
        )))
    })
}

fn agent(id: &str, role: AgentRole, provider: ScriptedProvider) -> Arc<AgentRunner> {
    let config = AgentConfig::new(id, role, format!("You are {}", id));
    Arc::new(AgentRunner::new(config, Arc::new(provider), &ToolRegistry::new()))
}

fn coordinator_with(
    router: ScriptedProvider,
    reservations: ScriptedProvider,
    menus: ScriptedProvider,
    info: ScriptedProvider,
) -> MultiAgentCoordinator {
    let orchestrator = Orchestrator::new(
        agent("orchestrator", AgentRole::Orchestrator, router),
        "info_agent",
    );
    let coordinator = MultiAgentCoordinator::new(orchestrator);
    coordinator
        .register(agent("reservations_agent", AgentRole::Reservations, reservations))
        .unwrap();
    coordinator
        .register(agent("menus_agent", AgentRole::Menus, menus))
        .unwrap();
    coordinator
        .register(agent("info_agent", AgentRole::Info, info))
        .unwrap();
    coordinator
}

fn coordinator() -> MultiAgentCoordinator {
    coordinator_with(
        routing_provider(),
        ScriptedProvider::always("Necesito tu nombre y teléfono"),
        ScriptedProvider::always("El menú degustación"),
        ScriptedProvider::always("Abrimos de 9 a 23"),
    )
}

#[test]
fn test_agent_label() {
    assert_eq!(agent_label("menus_agent"), "Menus");
    assert_eq!(agent_label("info_agent"), "Info");
    assert_eq!(agent_label("orchestrator"), "Orchestrator");
    assert_eq!(agent_label("wine_list_agent"), "Wine_List");
}

#[test]
fn test_merge_keeps_successes_in_order() {
    let results = vec![
        ExecutionResult::succeeded("menus_agent", AgentRole::Menus, "Menú A", 1),
        ExecutionResult::failed("reservations_agent", AgentRole::Reservations, "boom", 1),
        ExecutionResult::succeeded("info_agent", AgentRole::Info, "9 a 23", 1),
    ];
    assert_eq!(
        merge_responses(&results).unwrap(),
        "**Menus**: Menú A\n\n**Info**: 9 a 23"
    );

    let failures = vec![ExecutionResult::failed("menus_agent", AgentRole::Menus, "x", 1)];
    assert!(merge_responses(&failures).is_none());
}

#[tokio::test]
async fn test_registration() {
    let coordinator = coordinator();
    assert_eq!(
        coordinator.agent_ids(),
        vec!["orchestrator", "reservations_agent", "menus_agent", "info_agent"]
    );
    assert_eq!(coordinator.agents_by_role(AgentRole::Menus).len(), 1);
    assert_eq!(coordinator.specialist_ids().len(), 3);

    let duplicate = agent("menus_agent", AgentRole::Menus, ScriptedProvider::always(""));
    assert!(coordinator.register(duplicate).is_err());
}

#[tokio::test]
async fn test_reservation_query_routes_to_reservations_only() {
    let coordinator = coordinator();
    let outcome = coordinator
        .process("Quiero hacer una reserva para mañana", Some("s1".to_string()))
        .await;

    assert!(outcome.success);
    assert_eq!(outcome.agents_used, vec!["reservations_agent"]);
    assert_eq!(outcome.response.as_deref(), Some("Necesito tu nombre y teléfono"));
    assert_eq!(outcome.routing_reasoning.as_deref(), Some("keywords"));
    assert_eq!(outcome.session_id.as_deref(), Some("s1"));

    let status = coordinator.system_status();
    assert_eq!(status.agents["reservations_agent"].execution_count, 1);
    assert_eq!(status.agents["menus_agent"].execution_count, 0);
}

#[tokio::test]
async fn test_menu_and_hours_query_runs_two_agents() {
    let coordinator = coordinator();
    let outcome = coordinator
        .process("¿Qué menú recomiendan y cuál es el horario?", None)
        .await;

    assert!(outcome.success);
    assert_eq!(outcome.agents_used, vec!["menus_agent", "info_agent"]);
    assert_eq!(
        outcome.response.as_deref(),
        Some("**Menus**: El menú degustación\n\n**Info**: Abrimos de 9 a 23")
    );
}

#[tokio::test]
async fn test_partial_failure_is_omitted() {
    let coordinator = coordinator_with(
        routing_provider(),
        ScriptedProvider::always("Reserva creada"),
        ScriptedProvider::failing("menus down"),
        ScriptedProvider::always("Abrimos de 9 a 23"),
    );
    let outcome = coordinator
        .process("Reserva, menú y horario por favor", None)
        .await;

    assert!(outcome.success);
    assert_eq!(
        outcome.agents_used,
        vec!["reservations_agent", "menus_agent", "info_agent"]
    );
    assert_eq!(
        outcome.response.as_deref(),
        Some("**Reservations**: Reserva creada\n\n**Info**: Abrimos de 9 a 23")
    );
    assert_eq!(
        coordinator.system_status().agents["menus_agent"].status,
        AgentStatus::Error
    );
}

#[tokio::test]
async fn test_total_failure_returns_apology() {
    let coordinator = coordinator_with(
        routing_provider(),
        ScriptedProvider::failing("down"),
        ScriptedProvider::failing("down"),
        ScriptedProvider::always("unused"),
    )
    .with_apology("Lo siento");
    let outcome = coordinator.process("reserva y menú", None).await;

    assert!(outcome.success);
    assert_eq!(outcome.response.as_deref(), Some("Lo siento"));
}

#[tokio::test]
async fn test_single_agent_failure_returns_apology() {
    let coordinator = coordinator_with(
        routing_provider(),
        ScriptedProvider::always("unused"),
        ScriptedProvider::always("unused"),
        ScriptedProvider::failing("down"),
    );
    let outcome = coordinator.process("Hola", None).await;

    assert!(outcome.success);
    assert_eq!(outcome.response.as_deref(), Some(DEFAULT_APOLOGY));
}

#[tokio::test]
async fn test_unparseable_routing_uses_info() {
    let coordinator = coordinator_with(
        ScriptedProvider::always("no idea"),
        ScriptedProvider::always("unused"),
        ScriptedProvider::always("unused"),
        ScriptedProvider::always("Bienvenido"),
    );
    let outcome = coordinator.process("asdf", None).await;

    assert!(outcome.success);
    assert_eq!(outcome.agents_used, vec!["info_agent"]);
    assert_eq!(outcome.routing_reasoning.as_deref(), Some("fallback"));
    assert_eq!(outcome.response.as_deref(), Some("Bienvenido"));
}

#[tokio::test]
async fn test_routing_failure_uses_info() {
    let coordinator = coordinator_with(
        ScriptedProvider::from_fn(|_, _| Err(ProviderError::RateLimited("slow down".to_string()))),
        ScriptedProvider::always("unused"),
        ScriptedProvider::always("unused"),
        ScriptedProvider::always("Bienvenido"),
    );
    let outcome = coordinator.process("Hola", None).await;
    assert_eq!(outcome.agents_used, vec!["info_agent"]);
    assert_eq!(outcome.response.as_deref(), Some("Bienvenido"));
}

#[tokio::test]
async fn test_empty_message_fails() {
    let coordinator = coordinator();
    let outcome = coordinator.process("   ", Some("s9".to_string())).await;

    assert!(!outcome.success);
    assert!(outcome.response.is_none());
    assert!(outcome.error.is_some());
    assert_eq!(outcome.session_id.as_deref(), Some("s9"));
    assert_eq!(coordinator.system_status().agents["orchestrator"].execution_count, 0);
}

#[tokio::test]
async fn test_reset_session_resets_every_agent() {
    let coordinator = coordinator();
    coordinator.process("¿Qué menú y horario?", None).await;
    coordinator.reset_session(Some("s1")).await;

    for (_, snapshot) in coordinator.system_status().agents {
        assert_eq!(snapshot.status, AgentStatus::Idle);
        assert_eq!(snapshot.history_length, 0);
    }
}

#[tokio::test]
async fn test_reset_agent() {
    let coordinator = coordinator();
    coordinator.process("Hola", None).await;

    coordinator.reset_agent("info_agent").await.unwrap();
    let status = coordinator.system_status();
    assert_eq!(status.agents["info_agent"].history_length, 0);
    assert_eq!(status.agents["orchestrator"].history_length, 2);

    assert!(matches!(
        coordinator.reset_agent("chef_agent").await,
        Err(AgentError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_system_status() {
    let coordinator = coordinator();
    let status = coordinator.system_status();
    assert_eq!(status.total_agents, 4);
    assert!(status.agents.contains_key("orchestrator"));
    assert_eq!(status.agents["menus_agent"].role, AgentRole::Menus);
}

#[tokio::test]
async fn test_outcome_serialization() {
    let coordinator = coordinator();
    let outcome = coordinator.process("Hola", None).await;
    let value = serde_json::to_value(&outcome).unwrap();
    assert_eq!(value["success"], true);
    assert!(value.get("error").is_none());
    assert_eq!(value["agents_used"][0], "info_agent");
}

fn coordinator_with_fallback(fallback: &str, router: ScriptedProvider) -> MultiAgentCoordinator {
    let orchestrator = Orchestrator::new(agent("orchestrator", AgentRole::Orchestrator, router), fallback);
    let coordinator = MultiAgentCoordinator::new(orchestrator);
    coordinator
        .register(agent("info_agent", AgentRole::Info, ScriptedProvider::always("Bienvenido")))
        .unwrap();
    coordinator
}

#[test]
fn test_check_fallback() {
    let ok = coordinator_with_fallback("info_agent", ScriptedProvider::always(""));
    assert!(ok.check_fallback().is_ok());

    for fallback in ["ghost_agent", "orchestrator"] {
        let coordinator = coordinator_with_fallback(fallback, ScriptedProvider::always(""));
        assert!(matches!(
            coordinator.check_fallback(),
            Err(AgentError::NotFound(id)) if id == fallback
        ));
    }
}

#[tokio::test]
async fn test_unregistered_fallback_is_refused() {
    for fallback in ["ghost_agent", "orchestrator"] {
        let coordinator = coordinator_with_fallback(fallback, ScriptedProvider::always("no idea"));
        let outcome = coordinator.process("asdf", Some("s2".to_string())).await;

        assert!(!outcome.success, "fallback {} was accepted", fallback);
        assert!(outcome.response.is_none());
        assert!(outcome.error.unwrap().contains(fallback));
        assert_eq!(outcome.session_id.as_deref(), Some("s2"));
        assert_eq!(coordinator.system_status().agents["info_agent"].execution_count, 0);
    }
}

/// Answers after `delay` of (virtual) time.
struct SlowProvider {
    delay: std::time::Duration,
    reply: &'static str,
}

#[async_trait::async_trait]
impl mesa_protocols::provider::LLMProvider for SlowProvider {
    fn id(&self) -> &str {
        "slow"
    }

    fn default_model(&self) -> &str {
        "slow-model"
    }

    async fn complete(
        &self,
        _request: mesa_protocols::provider::CompletionRequest,
    ) -> Result<mesa_protocols::provider::CompletionResponse, ProviderError> {
        tokio::time::sleep(self.delay).await;
        Ok(crate::test_support::text_reply(self.reply))
    }
}

#[tokio::test(start_paused = true)]
async fn test_selected_agents_run_concurrently() {
    let delay = std::time::Duration::from_millis(300);
    let slow = |id: &str, role: AgentRole, reply: &'static str| {
        Arc::new(AgentRunner::new(
            AgentConfig::new(id, role, format!("You are {}", id)),
            Arc::new(SlowProvider { delay, reply }),
            &ToolRegistry::new(),
        ))
    };

    let orchestrator = Orchestrator::new(
        agent("orchestrator", AgentRole::Orchestrator, routing_provider()),
        "info_agent",
    );
    let coordinator = MultiAgentCoordinator::new(orchestrator);
    coordinator
        .register(slow("menus_agent", AgentRole::Menus, "Menú del día"))
        .unwrap();
    coordinator
        .register(slow("info_agent", AgentRole::Info, "Abrimos a las 9"))
        .unwrap();

    let started = tokio::time::Instant::now();
    let outcome = coordinator.process("¿Qué menú y cuál es el horario?", None).await;
    let elapsed = started.elapsed();

    assert_eq!(outcome.agents_used, vec!["menus_agent", "info_agent"]);
    assert_eq!(
        outcome.response.as_deref(),
        Some("**Menus**: Menú del día\n\n**Info**: Abrimos a las 9")
    );
    assert!(elapsed >= delay, "finished in {:?}", elapsed);
    assert!(elapsed < delay * 2, "agents ran one after another: {:?}", elapsed);
}
