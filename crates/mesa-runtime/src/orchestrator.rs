//! Routing orchestrator.
//!
//! Wraps the routing agent and turns its free-form reply into a
//! [`RoutingDecision`] restricted to known specialist ids.

use std::sync::Arc;

use tracing::{info, warn};

use mesa_protocols::agent::RoutingDecision;

use crate::runner::AgentRunner;

/// Routing agent plus the fallback used when it gives no usable answer.
pub struct Orchestrator {
    agent: Arc<AgentRunner>,
    fallback: String,
}

impl Orchestrator {
    pub fn new(agent: Arc<AgentRunner>, fallback: impl Into<String>) -> Self {
        Self {
            agent,
            fallback: fallback.into(),
        }
    }

    pub fn agent(&self) -> &Arc<AgentRunner> {
        &self.agent
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    /// Decide which of `known` agents should answer `message`.
    pub async fn route<S: AsRef<str>>(&self, message: &str, known: &[S]) -> RoutingDecision {
        let prompt = format!(
            "Analyze this query and decide which agent(s) should answer:\n\n{}",
            message
        );
        let result = self.agent.execute(&prompt, None).await;

        let Some(reply) = result.response.filter(|_| result.success) else {
            warn!("Orchestrator failed, falling back to {}", self.fallback);
            return RoutingDecision::fallback(&self.fallback);
        };

        let decision = match parse_routing(&reply) {
            Some(decision) => restrict(decision, known),
            None => None,
        };

        match decision {
            Some(decision) => {
                info!(
                    "Orchestrator chose {:?}: {}",
                    decision.agents, decision.reasoning
                );
                decision
            }
            None => {
                warn!(
                    "Unusable routing reply, falling back to {}: {}",
                    self.fallback, reply
                );
                RoutingDecision::fallback(&self.fallback)
            }
        }
    }
}

/// Parse the first balanced `{...}` block of `text` that is a routing decision.
pub fn parse_routing(text: &str) -> Option<RoutingDecision> {
    text.char_indices()
        .filter(|(_, c)| *c == '{')
        .filter_map(|(start, _)| balanced_object(&text[start..]))
        .find_map(|candidate| serde_json::from_str::<RoutingDecision>(candidate).ok())
}

/// The shortest prefix of `text` (which starts with `{`) whose braces balance.
/// Braces inside JSON strings are ignored.
fn balanced_object(text: &str) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(&text[..=i]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Keep known ids in order without duplicates. `None` when nothing is left.
fn restrict<S: AsRef<str>>(decision: RoutingDecision, known: &[S]) -> Option<RoutingDecision> {
    let mut agents: Vec<String> = Vec::with_capacity(decision.agents.len());
    for id in decision.agents {
        if !known.iter().any(|k| k.as_ref() == id) {
            warn!("Orchestrator named unknown agent {}", id);
            continue;
        }
        if !agents.contains(&id) {
            agents.push(id);
        }
    }

    if agents.is_empty() {
        None
    } else {
        Some(RoutingDecision::new(agents, decision.reasoning))
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
