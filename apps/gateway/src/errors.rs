use std::path::PathBuf;
use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Every hard failure a tool call can produce.
///
/// Soft failures reported inside a `{code, msg}` envelope are not errors; they
/// come back as `ToolOutput::Message`.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Remote call failed: {0}")]
    RemoteCall(#[source] reqwest::Error),

    #[error("Remote call failed with HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Remote call timed out after {after:?}")]
    Timeout { after: Duration },

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Response is missing `{0}`")]
    MissingField(String),

    #[error("Failed to read {}: {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),
}

impl GatewayError {
    pub fn missing_credential() -> Self {
        GatewayError::Configuration("API_KEY environment variable is not set".to_string())
    }

    /// True for failures that happened on the way to or from the SaaS API.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            GatewayError::RemoteCall(_) | GatewayError::Status { .. } | GatewayError::Timeout { .. }
        )
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            GatewayError::InvalidArguments(_) => (StatusCode::BAD_REQUEST, "INVALID_ARGUMENTS"),
            GatewayError::UnknownTool(_) => (StatusCode::NOT_FOUND, "UNKNOWN_TOOL"),
            GatewayError::Timeout { .. } => (StatusCode::GATEWAY_TIMEOUT, "REMOTE_TIMEOUT"),
            GatewayError::RemoteCall(_) | GatewayError::Status { .. } => {
                tracing::error!("Remote error: {self}");
                (StatusCode::BAD_GATEWAY, "REMOTE_ERROR")
            }
            GatewayError::Decode(_) | GatewayError::MissingField(_) => {
                tracing::error!("Decode error: {self}");
                (StatusCode::BAD_GATEWAY, "DECODE_ERROR")
            }
            GatewayError::Configuration(_) => {
                tracing::error!("{self}");
                (StatusCode::INTERNAL_SERVER_ERROR, "CONFIGURATION_ERROR")
            }
            GatewayError::File { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "FILE_ERROR"),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": self.to_string()
            }
        }));

        (status, body).into_response()
    }
}
