//! # Mesa Runtime
//!
//! Agent execution: per-agent conversations, the tool-call resolution loop,
//! routing and multi-agent coordination.

pub mod coordinator;
pub mod orchestrator;
pub mod resolution;
pub mod runner;

#[cfg(test)]
mod test_support;

pub use coordinator::{DEFAULT_APOLOGY, MultiAgentCoordinator, ProcessOutcome, SystemStatus};
pub use orchestrator::{Orchestrator, parse_routing};
pub use resolution::{DEFAULT_MAX_TOOL_ROUNDS, ResolutionLoop};
pub use runner::AgentRunner;
