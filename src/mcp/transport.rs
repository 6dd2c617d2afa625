//! JSON-RPC 2.0 wire types and the stdio message loop.
//!
//! One JSON object per line on stdin, one per line on stdout. Everything
//! else (logs included) goes to stderr — stdout belongs to the protocol.
//! Requests are handled to completion in arrival order; there is no
//! pipelining, so two calls for the same agent id cannot race through this
//! transport.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, warn};

use super::dispatch::McpDispatcher;
use super::tools::worktreed_tools;

pub const MCP_PARSE_ERROR: i64 = -32700;
pub const MCP_INVALID_REQUEST: i64 = -32600;
pub const MCP_METHOD_NOT_FOUND: i64 = -32601;
pub const MCP_INVALID_PARAMS: i64 = -32602;
pub const MCP_INTERNAL_ERROR: i64 = -32603;

pub const PROTOCOL_VERSION: &str = "2024-11-05";

// ─── Wire types ──────────────────────────────────────────────────────────────

/// An incoming JSON-RPC message. `id: None` marks a notification.
#[derive(Debug, Clone, Deserialize)]
pub struct McpMessage {
    #[allow(dead_code)]
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct McpResponse {
    pub jsonrpc: &'static str,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<McpError>,
}

#[derive(Debug, Clone, Serialize)]
pub struct McpError {
    pub code: i64,
    pub message: String,
}

impl McpError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl McpResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: Value, error: McpError) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(error),
        }
    }
}

// ─── Message handling ────────────────────────────────────────────────────────

/// Handle one decoded message. Returns `None` for notifications.
pub(crate) async fn handle_message(
    dispatcher: &McpDispatcher,
    message: McpMessage,
) -> Option<McpResponse> {
    let Some(id) = message.id else {
        match message.method.as_str() {
            "notifications/initialized" => debug!("MCP client initialized"),
            other => debug!(method = other, "ignoring notification"),
        }
        return None;
    };

    let response = match message.method.as_str() {
        "initialize" => McpResponse::success(
            id,
            json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": { "tools": { "listChanged": false } },
                "serverInfo": {
                    "name": "worktreed",
                    "version": env!("CARGO_PKG_VERSION"),
                },
            }),
        ),
        "ping" => McpResponse::success(id, json!({})),
        "tools/list" => McpResponse::success(id, json!({ "tools": worktreed_tools() })),
        "tools/call" => {
            let tool_name = message
                .params
                .get("name")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string();
            let arguments = message
                .params
                .get("arguments")
                .cloned()
                .unwrap_or_else(|| json!({}));

            if tool_name.is_empty() {
                McpResponse::failure(
                    id,
                    McpError::new(MCP_INVALID_PARAMS, "missing required field 'name'"),
                )
            } else {
                match dispatcher.call_tool(&tool_name, arguments).await {
                    Ok(result) => McpResponse::success(id, result),
                    Err(err) => McpResponse::failure(id, err),
                }
            }
        }
        other => {
            warn!(method = other, "MCP method not found");
            McpResponse::failure(
                id,
                McpError::new(MCP_METHOD_NOT_FOUND, format!("method not found: {other}")),
            )
        }
    };

    Some(response)
}

// ─── Stdio loop ──────────────────────────────────────────────────────────────

/// Serve MCP over stdin/stdout until the peer closes stdin.
pub async fn serve_stdio(dispatcher: McpDispatcher) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<McpMessage>(line) {
            Ok(message) => handle_message(&dispatcher, message).await,
            Err(e) => {
                warn!(error = %e, "unparseable MCP message");
                Some(McpResponse::failure(
                    Value::Null,
                    McpError::new(MCP_PARSE_ERROR, format!("parse error: {e}")),
                ))
            }
        };

        if let Some(response) = response {
            let mut payload = serde_json::to_vec(&response)?;
            payload.push(b'\n');
            stdout.write_all(&payload).await?;
            stdout.flush().await?;
        }
    }

    debug!("stdin closed, shutting down");
    Ok(())
}

// ─── Tests ───────────────────────────────────────────────────────────────────
