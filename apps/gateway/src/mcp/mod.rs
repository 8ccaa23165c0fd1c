//! MCP binding: newline-delimited JSON-RPC 2.0 over a byte stream (stdin/stdout
//! in production). Requests are handled concurrently; responses are written
//! as they complete. Nothing but protocol messages is written to the stream.

pub mod protocol;

use std::sync::Arc;

use anyhow::Result;
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::errors::GatewayError;
use crate::gateway::ResumeGateway;
use crate::tools::{call_tool, get_prompt, prompt_catalog, tool_catalog};

use protocol::{
    JsonRpcRequest, JsonRpcResponse, PromptGetParams, ToolCallParams, ToolResult, INTERNAL_ERROR,
    INVALID_PARAMS, INVALID_REQUEST, METHOD_NOT_FOUND, PARSE_ERROR,
};

pub const MCP_VERSION: &str = "2024-11-05";
pub const SERVER_NAME: &str = "resume-gateway";
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

struct RpcFailure {
    code: i32,
    message: String,
}

impl RpcFailure {
    fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Serves requests from `reader` until EOF, then waits for in-flight calls.
///
/// A line that is not valid UTF-8 gets a parse-error reply; a read failure
/// stops reading but still lets in-flight calls answer.
pub async fn serve<R, W>(gateway: Arc<ResumeGateway>, mut reader: R, mut writer: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut pending: JoinSet<Option<JsonRpcResponse>> = JoinSet::new();
    let mut buf = Vec::new();
    let mut reading = true;

    while reading || !pending.is_empty() {
        tokio::select! {
            read = reader.read_until(b'\n', &mut buf), if reading => {
                match read {
                    Ok(0) => {
                        debug!("MCP input closed; {} call(s) in flight", pending.len());
                        reading = false;
                    }
                    Ok(_) => match String::from_utf8(std::mem::take(&mut buf)) {
                        Ok(line) if !line.trim().is_empty() => {
                            let gateway = gateway.clone();
                            pending.spawn(async move { handle_line(&gateway, &line).await });
                        }
                        Ok(_) => {}
                        Err(e) => {
                            warn!("Non UTF-8 MCP message: {e}");
                            let response = JsonRpcResponse::error(
                                Value::Null,
                                PARSE_ERROR,
                                format!("Parse error: {e}"),
                            );
                            write_message(&mut writer, &response).await?;
                        }
                    },
                    Err(e) => {
                        error!("Reading MCP input failed: {e}");
                        reading = false;
                    }
                }
            }
            Some(joined) = pending.join_next(), if !pending.is_empty() => {
                match joined {
                    Ok(Some(response)) => write_message(&mut writer, &response).await?,
                    Ok(None) => {}
                    Err(e) => error!("MCP handler task failed: {e}"),
                }
            }
        }
    }

    info!("MCP session ended");
    Ok(())
}

async fn write_message<W: AsyncWrite + Unpin>(writer: &mut W, response: &JsonRpcResponse) -> Result<()> {
    let mut line = serde_json::to_vec(response)?;
    line.push(b'\n');
    writer.write_all(&line).await?;
    writer.flush().await?;
    Ok(())
}

/// Handles one raw input line. Returns `None` for notifications.
pub async fn handle_line(gateway: &ResumeGateway, line: &str) -> Option<JsonRpcResponse> {
    let request: JsonRpcRequest = match serde_json::from_str(line) {
        Ok(request) => request,
        Err(e) => {
            warn!("Unparsable MCP message: {e}");
            return Some(JsonRpcResponse::error(Value::Null, PARSE_ERROR, format!("Parse error: {e}")));
        }
    };

    let Some(id) = request.id.clone() else {
        debug!("MCP notification {}", request.method);
        return None;
    };

    if request.jsonrpc != protocol::JSONRPC_VERSION {
        return Some(JsonRpcResponse::error(
            id,
            INVALID_REQUEST,
            "jsonrpc must be \"2.0\"",
        ));
    }

    Some(match dispatch(gateway, request).await {
        Ok(result) => JsonRpcResponse::result(id, result),
        Err(failure) => JsonRpcResponse::error(id, failure.code, failure.message),
    })
}

async fn dispatch(gateway: &ResumeGateway, request: JsonRpcRequest) -> Result<Value, RpcFailure> {
    let params = request.params.unwrap_or(Value::Null);

    match request.method.as_str() {
        "initialize" => Ok(json!({
            "protocolVersion": MCP_VERSION,
            "capabilities": {
                "tools": {"listChanged": false},
                "prompts": {"listChanged": false}
            },
            "serverInfo": {"name": SERVER_NAME, "version": SERVER_VERSION}
        })),
        "ping" => Ok(json!({})),
        "tools/list" => Ok(json!({ "tools": tool_catalog() })),
        "tools/call" => {
            let call: ToolCallParams = serde_json::from_value(params)
                .map_err(|e| RpcFailure::new(INVALID_PARAMS, format!("Invalid params: {e}")))?;
            let result = match call_tool(gateway, &call.name, call.arguments).await {
                Ok(output) => ToolResult::text(output.into_text(), false),
                Err(GatewayError::UnknownTool(name)) => {
                    return Err(RpcFailure::new(INVALID_PARAMS, format!("Unknown tool: {name}")));
                }
                Err(e) if e.is_remote() => {
                    warn!("Tool {} failed upstream: {e}", call.name);
                    ToolResult::text(e.to_string(), true)
                }
                Err(e) => {
                    info!("Tool {} rejected: {e}", call.name);
                    ToolResult::text(e.to_string(), true)
                }
            };
            serde_json::to_value(result).map_err(|e| RpcFailure::new(INTERNAL_ERROR, e.to_string()))
        }
        "prompts/list" => Ok(json!({ "prompts": prompt_catalog() })),
        "prompts/get" => {
            let get: PromptGetParams = serde_json::from_value(params)
                .map_err(|e| RpcFailure::new(INVALID_PARAMS, format!("Invalid params: {e}")))?;
            let description = prompt_catalog()
                .into_iter()
                .find(|p| p.name == get.name)
                .map(|p| p.description)
                .unwrap_or_default();
            let text = get_prompt(gateway, &get.name, Value::Object(get.arguments))
                .map_err(|e| RpcFailure::new(INVALID_PARAMS, e.to_string()))?
                .into_text();
            Ok(json!({
                "description": description,
                "messages": [{
                    "role": "user",
                    "content": {"type": "text", "text": text}
                }]
            }))
        }
        other => Err(RpcFailure::new(METHOD_NOT_FOUND, format!("Method not found: {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::testing::{gateway_with, FakeTransport};
    use serde_json::json;

    async fn roundtrip(gateway: &ResumeGateway, message: Value) -> Value {
        let response = handle_line(gateway, &message.to_string()).await.unwrap();
        serde_json::to_value(response).unwrap()
    }

    #[tokio::test]
    async fn test_initialize_advertises_tools_and_prompts() {
        let gateway = gateway_with(FakeTransport::replying_json(json!({})));
        let resp = roundtrip(
            &gateway,
            json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {}}),
        )
        .await;
        assert_eq!(resp["id"], 1);
        assert_eq!(resp["result"]["protocolVersion"], MCP_VERSION);
        assert_eq!(resp["result"]["serverInfo"]["name"], SERVER_NAME);
        assert!(resp["result"]["capabilities"]["tools"].is_object());
        assert!(resp["result"]["capabilities"]["prompts"].is_object());
    }

    #[tokio::test]
    async fn test_notifications_get_no_reply() {
        let gateway = gateway_with(FakeTransport::replying_json(json!({})));
        let line = json!({"jsonrpc": "2.0", "method": "notifications/initialized"}).to_string();
        assert!(handle_line(&gateway, &line).await.is_none());
    }

    #[tokio::test]
    async fn test_tools_list() {
        let gateway = gateway_with(FakeTransport::replying_json(json!({})));
        let resp = roundtrip(&gateway, json!({"jsonrpc": "2.0", "id": "a", "method": "tools/list"})).await;
        let tools = resp["result"]["tools"].as_array().unwrap();
        let names: Vec<&str> = tools.iter().filter_map(|t| t["name"].as_str()).collect();
        assert!(names.contains(&"recognize"));
        assert!(names.contains(&"resume_style_write"));
        assert!(tools.iter().all(|t| t.get("inputSchema").is_some()));
    }

    #[tokio::test]
    async fn test_tools_call_success_is_text_content() {
        let transport = FakeTransport::replying_json(json!({"code": 200, "data": {"url": "https://r.pdf"}}));
        let gateway = gateway_with(transport);
        let resp = roundtrip(
            &gateway,
            json!({
                "jsonrpc": "2.0", "id": 2, "method": "tools/call",
                "params": {"name": "resume_style_write", "arguments": {"color": "红色", "modules": {"summary": "x"}}}
            }),
        )
        .await;
        assert_eq!(resp["result"]["isError"], false);
        assert_eq!(resp["result"]["content"][0]["type"], "text");
        assert_eq!(resp["result"]["content"][0]["text"], "https://r.pdf");
    }

    #[tokio::test]
    async fn test_tools_call_soft_failure_is_not_error() {
        let transport = FakeTransport::replying_json(json!({"code": 400, "msg": "invalid file"}));
        let gateway = gateway_with(transport);
        let resp = roundtrip(
            &gateway,
            json!({
                "jsonrpc": "2.0", "id": 3, "method": "tools/call",
                "params": {"name": "info", "arguments": {"requestId": "r"}}
            }),
        )
        .await;
        assert_eq!(resp["result"]["isError"], false);
        assert_eq!(resp["result"]["content"][0]["text"], "invalid file");
    }

    #[tokio::test]
    async fn test_tools_call_missing_credential_is_error_result() {
        let transport = FakeTransport::replying_json(json!({}));
        let gateway = ResumeGateway::new(None, transport.clone());
        let resp = roundtrip(
            &gateway,
            json!({
                "jsonrpc": "2.0", "id": 4, "method": "tools/call",
                "params": {"name": "build_resume", "arguments": {"text": "x"}}
            }),
        )
        .await;
        assert_eq!(resp["result"]["isError"], true);
        let text = resp["result"]["content"][0]["text"].as_str().unwrap();
        assert!(text.contains("API_KEY"));
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_tools_call_unknown_tool_is_protocol_error() {
        let gateway = gateway_with(FakeTransport::replying_json(json!({})));
        let resp = roundtrip(
            &gateway,
            json!({"jsonrpc": "2.0", "id": 5, "method": "tools/call", "params": {"name": "nope"}}),
        )
        .await;
        assert_eq!(resp["error"]["code"], INVALID_PARAMS);
        assert!(resp.get("result").is_none());
    }

    #[tokio::test]
    async fn test_prompts_get_renders_analyse_data() {
        let transport = FakeTransport::replying_json(json!({}));
        let gateway = gateway_with(transport.clone());
        let resp = roundtrip(
            &gateway,
            json!({
                "jsonrpc": "2.0", "id": 6, "method": "prompts/get",
                "params": {"name": "analyse_data", "arguments": {"recognize_data": "R", "jd": "J"}}
            }),
        )
        .await;
        let text = resp["result"]["messages"][0]["content"]["text"].as_str().unwrap();
        assert!(text.ends_with("J\n简历内容如下: \nR"));
        assert_eq!(resp["result"]["messages"][0]["role"], "user");
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_unknown_method_and_parse_error() {
        let gateway = gateway_with(FakeTransport::replying_json(json!({})));
        let resp = roundtrip(&gateway, json!({"jsonrpc": "2.0", "id": 7, "method": "resources/list"})).await;
        assert_eq!(resp["error"]["code"], METHOD_NOT_FOUND);

        let resp = handle_line(&gateway, "{not json").await.unwrap();
        assert_eq!(resp.error.unwrap().code, PARSE_ERROR);
        assert_eq!(resp.id, Value::Null);
    }

    #[tokio::test]
    async fn test_serve_survives_invalid_utf8_line() {
        let gateway = Arc::new(gateway_with(FakeTransport::replying_json(json!({}))));

        let mut input = Vec::new();
        input.extend_from_slice(json!({"jsonrpc": "2.0", "id": 1, "method": "ping"}).to_string().as_bytes());
        input.push(b'\n');
        input.extend_from_slice(b"{\"jsonrpc\": \"2.0\", \"id\": 2, \"method\": \"\xff\"}\n");
        input.extend_from_slice(json!({"jsonrpc": "2.0", "id": 3, "method": "ping"}).to_string().as_bytes());
        input.push(b'\n');

        let mut output: Vec<u8> = Vec::new();
        serve(gateway, input.as_slice(), &mut output).await.unwrap();

        let responses: Vec<Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(responses.len(), 3);

        let parse_errors: Vec<&Value> = responses
            .iter()
            .filter(|r| r["error"]["code"] == PARSE_ERROR)
            .collect();
        assert_eq!(parse_errors.len(), 1);
        assert_eq!(parse_errors[0]["id"], Value::Null);

        let mut ids: Vec<i64> = responses.iter().filter_map(|r| r["id"].as_i64()).collect();
        ids.sort();
        assert_eq!(ids, vec![1, 3]);
        assert!(responses
            .iter()
            .filter(|r| r["id"].is_i64())
            .all(|r| r["result"] == json!({})));
    }

    #[tokio::test]
    async fn test_serve_answers_every_request_then_exits() {
        let transport = FakeTransport::replying_json(json!({"code": 200, "data": {"id": "req-1"}}));
        let gateway = Arc::new(gateway_with(transport));

        let input = [
            json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {}}).to_string(),
            json!({"jsonrpc": "2.0", "method": "notifications/initialized"}).to_string(),
            String::new(),
            json!({"jsonrpc": "2.0", "id": 2, "method": "tools/call",
                   "params": {"name": "match", "arguments": {"job_title": "a", "job_desc": "b"}}})
            .to_string(),
            json!({"jsonrpc": "2.0", "id": 3, "method": "ping"}).to_string(),
        ]
        .join("\n");

        let mut output: Vec<u8> = Vec::new();
        serve(gateway, input.as_bytes(), &mut output).await.unwrap();

        let responses: Vec<Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(responses.len(), 3);
        let mut ids: Vec<i64> = responses.iter().filter_map(|r| r["id"].as_i64()).collect();
        ids.sort();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
