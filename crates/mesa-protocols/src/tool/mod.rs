//! Tool protocol definitions.
//!
//! Tools are the only way agents reach the reservation backend.

mod context;
mod definition;
mod result;
mod traits;

pub use context::*;
pub use definition::*;
pub use result::*;
pub use traits::*;
