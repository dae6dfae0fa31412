//! # Mesa Core
//!
//! Registries shared by the runtime.
//!
//! ## Components
//!
//! - [`BaseRegistry`] - Ordered, thread-safe id to item map
//! - [`ToolRegistry`] - Tool catalogue with soft-failing dispatch

pub mod error;
pub mod registry;

pub use error::RegistryError;
pub use registry::{BaseRegistry, Registerable, ToolRegistry};
