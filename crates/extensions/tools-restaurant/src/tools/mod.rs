//! Tool implementations.

mod menus;
mod reservations;

pub use menus::{GetBestRatedMenuTool, ListAvailableMenusTool};
pub use reservations::{
    CancelReservationTool, CreateReservationTool, GetReservationTool, ModifyReservationDateTool,
};

use mesa_protocols::tool::ToolResult;

use crate::backend::BackendError;

/// Payload for a call that never got an HTTP status back.
fn transport_failure(action: &str, err: BackendError) -> ToolResult {
    tracing::warn!("{} failed: {}", action, err);
    ToolResult::error(format!("{} failed: {}", action, err))
}
