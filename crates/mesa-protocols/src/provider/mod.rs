//! LLM provider protocol definitions.
//!
//! Providers connect to a hosted model API and turn a conversation into
//! either final text or a set of tool-call requests.

mod request;
mod response;
mod traits;

pub use request::*;
pub use response::*;
pub use traits::*;
