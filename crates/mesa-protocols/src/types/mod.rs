//! Common types shared by providers, tools and agents.

mod common;
mod message;

pub use common::*;
pub use message::*;
