//! Reservation tools.
//!
//! Pass-through wrappers over the token-keyed reservation endpoints. The
//! backend owns every business rule (opening hours, party size, formats);
//! these tools only shape requests and normalize replies.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Deserializer};
use serde_json::{Value, json};

use mesa_protocols::error::ToolError;
use mesa_protocols::tool::{Tool, ToolContext, ToolDefinition, ToolResult};

use super::transport_failure;
use crate::backend::BackendClient;

fn parse_params<T: for<'de> Deserialize<'de>>(params: Value) -> Result<T, ToolError> {
    serde_json::from_value(params).map_err(|e| ToolError::InvalidParameters(e.to_string()))
}

/// Models sometimes send integers as `4.0` or `"4"`.
fn de_party_size<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    use serde::de::Error;

    let value = Value::deserialize(deserializer)?;
    let number = match &value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match number {
        Some(n) if n.fract() == 0.0 && n >= 0.0 && n <= u32::MAX as f64 => Ok(n as u32),
        _ => Err(D::Error::custom(format!(
            "party_size must be a whole number, got {}",
            value
        ))),
    }
}

fn token_schema(description: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            "token": {
                "type": "string",
                "description": description
            }
        },
        "required": ["token"]
    })
}

#[derive(Debug, Deserialize)]
struct TokenParams {
    token: String,
}

#[derive(Debug, Deserialize)]
struct CreateParams {
    name: String,
    phone: String,
    email: String,
    datetime: String,
    #[serde(deserialize_with = "de_party_size")]
    party_size: u32,
    #[serde(default)]
    notes: Option<String>,
}

impl CreateParams {
    fn into_body(self) -> Value {
        let mut body = json!({
            "nombre_cliente": self.name,
            "telefono_cliente": self.phone,
            "email_cliente": self.email,
            "fecha_reserva": self.datetime,
            "num_personas": self.party_size,
        });
        if let Some(notes) = self.notes.filter(|n| !n.trim().is_empty()) {
            body["notas"] = Value::String(notes);
        }
        body
    }
}

#[derive(Debug, Deserialize)]
struct ModifyParams {
    token: String,
    new_datetime: String,
}

/// `create_reservation`: book a table; the backend emails a token.
pub struct CreateReservationTool {
    definition: ToolDefinition,
    backend: Arc<BackendClient>,
}

impl CreateReservationTool {
    pub fn new(backend: Arc<BackendClient>) -> Self {
        let definition = ToolDefinition::new(
            "create_reservation",
            "Create a new reservation. Only call it once the customer has given ALL required \
             details (name, phone, email, date and time, party size). The date must use the \
             format YYYY-MM-DDTHH:mm (e.g. 2025-11-25T19:30) and fall between 09:00 and 23:00.",
        )
        .with_parameters_schema(json!({
            "type": "object",
            "properties": {
                "name": {
                    "type": "string",
                    "description": "Customer's full name"
                },
                "phone": {
                    "type": "string",
                    "description": "Customer phone number (9-15 digits, may include +)"
                },
                "email": {
                    "type": "string",
                    "description": "Customer email address"
                },
                "datetime": {
                    "type": "string",
                    "description": "Reservation date and time, format YYYY-MM-DDTHH:mm"
                },
                "party_size": {
                    "type": "integer",
                    "description": "Number of guests (1 to 20)"
                },
                "notes": {
                    "type": "string",
                    "description": "Optional notes or special requests"
                }
            },
            "required": ["name", "phone", "email", "datetime", "party_size"]
        }));
        Self { definition, backend }
    }
}

#[async_trait]
impl Tool for CreateReservationTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, params: Value, _ctx: ToolContext) -> Result<ToolResult, ToolError> {
        let params: CreateParams = parse_params(params)?;
        let body = params.into_body();

        let response = match self.backend.post(&["reservas"], Some(&body)).await {
            Ok(response) => response,
            Err(e) => return Ok(transport_failure("create reservation", e)),
        };

        if response.status != 201 {
            return Ok(ToolResult::error(
                response.error_message("could not create the reservation"),
            ));
        }

        let reservation = response.body.get("reserva").cloned().unwrap_or(Value::Null);
        let token = response
            .body
            .get("token")
            .or_else(|| reservation.get("token"))
            .cloned()
            .unwrap_or(Value::Null);

        Ok(ToolResult::success()
            .with("reserva", reservation)
            .with("token", token)
            .with(
                "message",
                "Reservation created. A confirmation email with the reservation token has been sent.",
            ))
    }
}

/// `modify_reservation_date`: move a confirmed reservation.
pub struct ModifyReservationDateTool {
    definition: ToolDefinition,
    backend: Arc<BackendClient>,
}

impl ModifyReservationDateTool {
    pub fn new(backend: Arc<BackendClient>) -> Self {
        let definition = ToolDefinition::new(
            "modify_reservation_date",
            "Change the date and time of an existing reservation. Requires the reservation \
             token and the new date. The reservation must still be confirmed.",
        )
        .with_parameters_schema(json!({
            "type": "object",
            "properties": {
                "token": {
                    "type": "string",
                    "description": "Unique reservation token"
                },
                "new_datetime": {
                    "type": "string",
                    "description": "New date and time, format YYYY-MM-DDTHH:mm"
                }
            },
            "required": ["token", "new_datetime"]
        }));
        Self { definition, backend }
    }
}

#[async_trait]
impl Tool for ModifyReservationDateTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, params: Value, _ctx: ToolContext) -> Result<ToolResult, ToolError> {
        let params: ModifyParams = parse_params(params)?;
        let body = json!({ "fecha_reserva": params.new_datetime });

        let response = match self
            .backend
            .patch(&["reservas", "token", &params.token, "fecha"], &body)
            .await
        {
            Ok(response) => response,
            Err(e) => return Ok(transport_failure("modify reservation date", e)),
        };

        if response.status != 200 {
            return Ok(ToolResult::error(
                response.error_message("could not change the reservation date"),
            ));
        }

        Ok(ToolResult::success()
            .with("reserva", response.body)
            .with("message", "Reservation date updated."))
    }
}

/// `cancel_reservation`: irreversible cancellation by token.
pub struct CancelReservationTool {
    definition: ToolDefinition,
    backend: Arc<BackendClient>,
}

impl CancelReservationTool {
    pub fn new(backend: Arc<BackendClient>) -> Self {
        let definition = ToolDefinition::new(
            "cancel_reservation",
            "Cancel an existing reservation. Requires the reservation token. \
             This cannot be undone.",
        )
        .with_parameters_schema(token_schema("Unique token of the reservation to cancel"));
        Self { definition, backend }
    }
}

#[async_trait]
impl Tool for CancelReservationTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, params: Value, _ctx: ToolContext) -> Result<ToolResult, ToolError> {
        let params: TokenParams = parse_params(params)?;

        let response = match self
            .backend
            .post(&["reservas", "token", &params.token, "cancelar"], None)
            .await
        {
            Ok(response) => response,
            Err(e) => return Ok(transport_failure("cancel reservation", e)),
        };

        Ok(match response.status {
            200 => ToolResult::success().with("message", "Reservation cancelled."),
            404 => ToolResult::error("token not found"),
            _ => ToolResult::error(response.error_message("could not cancel the reservation")),
        })
    }
}

/// `get_reservation`: current state of a reservation.
pub struct GetReservationTool {
    definition: ToolDefinition,
    backend: Arc<BackendClient>,
}

impl GetReservationTool {
    pub fn new(backend: Arc<BackendClient>) -> Self {
        let definition = ToolDefinition::new(
            "get_reservation",
            "Look up a reservation by its token. Returns status, date, customer and \
             every other stored detail.",
        )
        .with_parameters_schema(token_schema("Unique reservation token"));
        Self { definition, backend }
    }
}

#[async_trait]
impl Tool for GetReservationTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, params: Value, _ctx: ToolContext) -> Result<ToolResult, ToolError> {
        let params: TokenParams = parse_params(params)?;

        let response = match self
            .backend
            .get(&["reservas", "token", &params.token])
            .await
        {
            Ok(response) => response,
            Err(e) => return Ok(transport_failure("get reservation", e)),
        };

        Ok(if response.status == 200 {
            ToolResult::success().with("reserva", response.body)
        } else {
            ToolResult::error("not found")
        })
    }
}

#[cfg(test)]
#[path = "reservations_tests.rs"]
mod tests;
