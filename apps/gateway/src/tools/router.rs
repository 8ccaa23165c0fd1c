//! Name-based dispatch from JSON arguments to typed gateway operations.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::info;

use crate::errors::GatewayError;
use crate::gateway::{ResumeGateway, ToolOutput};

use super::catalog::{self, canonical_name};

fn parse_args<T: DeserializeOwned>(arguments: Value) -> Result<T, GatewayError> {
    let arguments = match arguments {
        Value::Null => Value::Object(Default::default()),
        other => other,
    };
    serde_json::from_value(arguments).map_err(|e| GatewayError::InvalidArguments(e.to_string()))
}

/// Invokes the tool called `name` with a JSON argument object.
pub async fn call_tool(
    gateway: &ResumeGateway,
    name: &str,
    arguments: Value,
) -> Result<ToolOutput, GatewayError> {
    let tool = canonical_name(name).ok_or_else(|| GatewayError::UnknownTool(name.to_string()))?;
    info!("Calling tool {tool}");

    match tool {
        catalog::CHECK => Ok(ToolOutput::Data(
            gateway
                .check_credential()
                .map(|key| Value::String(key.to_string()))
                .unwrap_or(Value::Null),
        )),
        catalog::BUILD_RESUME => gateway.build_resume(parse_args(arguments)?).await,
        catalog::MATCH => gateway.match_resume(parse_args(arguments)?).await,
        catalog::INFO => gateway.info(parse_args(arguments)?).await,
        catalog::WRITE => gateway.write(parse_args(arguments)?).await,
        catalog::RECOGNIZE => gateway.recognize(parse_args(arguments)?).await,
        catalog::ANALYSE => gateway.analyse(parse_args(arguments)?).await,
        catalog::RESUME_STYLE_WRITE => gateway.resume_style_write(parse_args(arguments)?).await,
        other => Err(GatewayError::UnknownTool(other.to_string())),
    }
}

/// Renders the prompt called `name`. Prompts never touch the network.
pub fn get_prompt(
    gateway: &ResumeGateway,
    name: &str,
    arguments: Value,
) -> Result<ToolOutput, GatewayError> {
    match name {
        catalog::ANALYSE_DATA_PROMPT => Ok(gateway.analyse_prompt(&parse_args(arguments)?)),
        other => Err(GatewayError::UnknownTool(other.to_string())),
    }
}
