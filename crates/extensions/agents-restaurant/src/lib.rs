//! Restaurant agents for Mesa.
//!
//! Prompts and tool subsets for the reservations, menus and info
//! specialists plus the routing orchestrator.

mod factory;
pub mod prompts;

pub use factory::{AgentFactory, INFO_AGENT, MENUS_AGENT, ORCHESTRATOR_AGENT, RESERVATIONS_AGENT};
