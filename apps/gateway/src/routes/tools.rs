use axum::{
    body::Bytes,
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};

use crate::errors::GatewayError;
use crate::gateway::ToolOutput;
use crate::state::AppState;
use crate::tools::{call_tool, tool_catalog, ToolDescriptor};

#[derive(Serialize)]
pub struct ToolListResponse {
    pub tools: Vec<ToolDescriptor>,
}

/// GET /api/v1/tools
pub async fn handle_list_tools() -> Json<ToolListResponse> {
    Json(ToolListResponse {
        tools: tool_catalog(),
    })
}

/// POST /api/v1/tools/:name
/// A soft failure reported by the remote API is a 200 with a `message` body.
pub async fn handle_call_tool(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Bytes,
) -> Result<Json<Value>, GatewayError> {
    let arguments = parse_arguments(&body)?;
    let output = call_tool(&state.gateway, &name, arguments).await?;
    Ok(Json(match output {
        ToolOutput::Message(message) => json!({ "message": message }),
        ToolOutput::Data(result) => json!({ "result": result }),
    }))
}

/// An empty body means no arguments; anything else must be valid JSON.
fn parse_arguments(body: &[u8]) -> Result<Value, GatewayError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body)
        .map_err(|e| GatewayError::InvalidArguments(format!("request body is not valid JSON: {e}")))
}
