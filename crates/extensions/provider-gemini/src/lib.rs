//! # Mesa Provider - Gemini
//!
//! Google Gemini `generateContent` provider with function calling.

mod client;
mod provider;
mod types;

pub use provider::{GeminiOptions, GeminiProvider};
pub use types::*;
