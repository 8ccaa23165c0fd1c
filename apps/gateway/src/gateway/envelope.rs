//! Envelope unwrapping for `{"code", "msg", "data"}` responses.

use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::errors::GatewayError;

const SUCCESS_CODE: i64 = 200;

/// What a tool hands back to its caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ToolOutput {
    /// The documented body or sub-field.
    Data(Value),
    /// A human-readable message: a soft failure or a rendered prompt.
    Message(String),
}

impl ToolOutput {
    /// Text form used by protocol bindings. Strings pass through unquoted,
    /// everything else is pretty-printed JSON.
    pub fn into_text(self) -> String {
        match self {
            ToolOutput::Message(msg) => msg,
            ToolOutput::Data(Value::String(s)) => s,
            ToolOutput::Data(value) => {
                serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
            }
        }
    }
}

/// Returns the envelope's message if `code` is present and not 200.
///
/// A `code` that is neither a whole number nor a numeric string is treated as
/// absent, the same as a body with no envelope at all.
pub fn soft_failure(body: &Value) -> Option<String> {
    let code = body.get("code")?;
    let code = code
        .as_i64()
        .or_else(|| code.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
        .or_else(|| code.as_str().and_then(|s| s.trim().parse::<i64>().ok()))?;
    if code == SUCCESS_CODE {
        return None;
    }

    let msg = body
        .get("msg")
        .and_then(|m| m.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| format!("remote error code {code}"));
    warn!("SaaS API reported code {code}: {msg}");
    Some(msg)
}

/// Soft-failure check, then the whole parsed body.
pub fn unwrap_body(body: Value) -> ToolOutput {
    match soft_failure(&body) {
        Some(msg) => ToolOutput::Message(msg),
        None => ToolOutput::Data(body),
    }
}

/// Soft-failure check, then the sub-field at a dotted path such as `data.tagInfo`.
pub fn unwrap_field(mut body: Value, path: &str) -> Result<ToolOutput, GatewayError> {
    if let Some(msg) = soft_failure(&body) {
        return Ok(ToolOutput::Message(msg));
    }

    let pointer = format!("/{}", path.replace('.', "/"));
    body.pointer_mut(&pointer)
        .map(|v| ToolOutput::Data(v.take()))
        .ok_or_else(|| GatewayError::MissingField(path.to_string()))
}
