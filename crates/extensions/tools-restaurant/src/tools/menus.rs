//! Menu lookup tools.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use mesa_protocols::error::ToolError;
use mesa_protocols::tool::{Tool, ToolContext, ToolDefinition, ToolResult};

use super::transport_failure;
use crate::backend::{BackendClient, BackendResponse};

const MENU_FIELDS: [&str; 6] = [
    "id",
    "nombre",
    "descripcion",
    "precio",
    "valoracion_promedio",
    "disponible",
];

/// Fetch `/menus` and return the list, or the payload to hand back on failure.
async fn fetch_menus(backend: &BackendClient, action: &str) -> Result<Vec<Value>, ToolResult> {
    let response = backend
        .get(&["menus"])
        .await
        .map_err(|e| transport_failure(action, e))?;

    if response.status != 200 {
        return Err(ToolResult::error(status_error(action, &response)));
    }

    menu_list(response.body)
        .ok_or_else(|| ToolResult::error(format!("{} failed: unexpected menus payload", action)))
}

fn status_error(action: &str, response: &BackendResponse) -> String {
    let fallback = format!("backend returned status {}", response.status);
    format!("{} failed: {}", action, response.error_message(&fallback))
}

/// Accept a bare array or an envelope with a `menus` array.
fn menu_list(body: Value) -> Option<Vec<Value>> {
    match body {
        Value::Array(menus) => Some(menus),
        Value::Object(mut map) => match map.remove("menus") {
            Some(Value::Array(menus)) => Some(menus),
            _ => None,
        },
        _ => None,
    }
}

/// Average rating; numeric columns may arrive as strings. Non-finite
/// values count as unrated.
fn rating(menu: &Value) -> f64 {
    let value = match menu.get("valoracion_promedio") {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    value.filter(|r| r.is_finite()).unwrap_or(0.0)
}

fn is_available(menu: &Value) -> bool {
    match menu.get("disponible") {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_i64().is_some_and(|n| n != 0),
        Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
        _ => false,
    }
}

fn project(menu: &Value) -> Value {
    let mut out = Map::new();
    for field in MENU_FIELDS {
        let value = match field {
            "valoracion_promedio" => Value::from(rating(menu)),
            "disponible" => Value::Bool(is_available(menu)),
            _ => menu.get(field).cloned().unwrap_or(Value::Null),
        };
        out.insert(field.to_string(), value);
    }
    Value::Object(out)
}

/// Highest-rated menu; ties keep the earliest in source order.
fn best_rated(menus: &[Value]) -> Option<&Value> {
    menus.iter().fold(None, |best: Option<&Value>, menu| match best {
        Some(current) if rating(menu) <= rating(current) => Some(current),
        _ => Some(menu),
    })
}

/// `get_best_rated_menu`: the menu with the highest average rating.
pub struct GetBestRatedMenuTool {
    definition: ToolDefinition,
    backend: Arc<BackendClient>,
}

impl GetBestRatedMenuTool {
    pub fn new(backend: Arc<BackendClient>) -> Self {
        let definition = ToolDefinition::new(
            "get_best_rated_menu",
            "Get the restaurant menu with the highest average customer rating. \
             Use it when the customer asks for the most popular, best rated or recommended menu.",
        );
        Self { definition, backend }
    }
}

#[async_trait]
impl Tool for GetBestRatedMenuTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, _params: Value, _ctx: ToolContext) -> Result<ToolResult, ToolError> {
        let menus = match fetch_menus(&self.backend, "get best rated menu").await {
            Ok(menus) => menus,
            Err(failure) => return Ok(failure),
        };

        Ok(match best_rated(&menus) {
            Some(menu) => ToolResult::success().with("menu", project(menu)),
            None => ToolResult::error("no menus available"),
        })
    }
}

/// `list_available_menus`: every menu flagged as available.
pub struct ListAvailableMenusTool {
    definition: ToolDefinition,
    backend: Arc<BackendClient>,
}

impl ListAvailableMenusTool {
    pub fn new(backend: Arc<BackendClient>) -> Self {
        let definition = ToolDefinition::new(
            "list_available_menus",
            "List every menu currently available at the restaurant with prices, \
             descriptions and ratings.",
        );
        Self { definition, backend }
    }
}

#[async_trait]
impl Tool for ListAvailableMenusTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, _params: Value, _ctx: ToolContext) -> Result<ToolResult, ToolError> {
        let menus = match fetch_menus(&self.backend, "list menus").await {
            Ok(menus) => menus,
            Err(failure) => return Ok(failure),
        };

        let available: Vec<Value> = menus.into_iter().filter(is_available).collect();
        let total = available.len();
        Ok(ToolResult::success()
            .with("menus", Value::Array(available))
            .with("total", total))
    }
}

#[cfg(test)]
#[path = "menus_tests.rs"]
mod tests;
