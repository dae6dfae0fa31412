//! Restaurant tools for Mesa.
//!
//! Six tools over the reservation backend: two menu lookups and four
//! token-keyed reservation operations. Every tool maps HTTP outcomes to a
//! `{success, ...}` payload and never surfaces transport errors as `Err`.

mod backend;
mod tools;

use std::sync::Arc;

use mesa_protocols::tool::Tool;

pub use backend::{BackendClient, BackendError, BackendResponse};
pub use tools::{
    CancelReservationTool, CreateReservationTool, GetBestRatedMenuTool, GetReservationTool,
    ListAvailableMenusTool, ModifyReservationDateTool,
};

/// Names of the menu tools.
pub const MENU_TOOLS: [&str; 2] = ["get_best_rated_menu", "list_available_menus"];

/// Names of the reservation tools.
pub const RESERVATION_TOOLS: [&str; 4] = [
    "create_reservation",
    "modify_reservation_date",
    "cancel_reservation",
    "get_reservation",
];

/// Every restaurant tool, sharing one backend client.
pub fn restaurant_tools(backend: Arc<BackendClient>) -> Vec<Arc<dyn Tool>> {
    vec![
        Arc::new(GetBestRatedMenuTool::new(backend.clone())),
        Arc::new(CreateReservationTool::new(backend.clone())),
        Arc::new(ModifyReservationDateTool::new(backend.clone())),
        Arc::new(CancelReservationTool::new(backend.clone())),
        Arc::new(GetReservationTool::new(backend.clone())),
        Arc::new(ListAvailableMenusTool::new(backend)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_restaurant_tools_names_match_groups() {
        let backend =
            Arc::new(BackendClient::new("http://localhost:3000/api", Duration::from_secs(10)).unwrap());
        let names: Vec<String> = restaurant_tools(backend)
            .iter()
            .map(|t| t.definition().name.clone())
            .collect();

        assert_eq!(names.len(), 6);
        for name in MENU_TOOLS.iter().chain(RESERVATION_TOOLS.iter()) {
            assert!(names.iter().any(|n| n == name), "missing {}", name);
        }
    }
}
