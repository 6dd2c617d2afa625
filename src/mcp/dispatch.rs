//! MCP `tools/call` dispatcher — routes tool invocations to the lifecycle
//! operations.
//!
//! Domain failures are not protocol failures: they come back as tool
//! results with `isError: true`, a human-readable message, and the
//! machine-checkable error kind, so the calling agent can react without
//! parsing prose. Protocol-level problems (unknown tool, malformed
//! arguments) surface as JSON-RPC errors instead.

use serde_json::{json, Value};
use tracing::{info, warn};

use crate::error::WorktreeError;
use crate::lifecycle::{
    CreateWorktree, CreateWorktreeRequest, RemoveWorktree, RemoveWorktreeRequest,
};

use super::tools as tool_list;
use super::transport::{McpError, MCP_INVALID_PARAMS};

pub struct McpDispatcher {
    create: CreateWorktree,
    remove: RemoveWorktree,
}

impl McpDispatcher {
    pub fn new(create: CreateWorktree, remove: RemoveWorktree) -> Self {
        Self { create, remove }
    }

    /// Dispatch a `tools/call` invocation.
    ///
    /// Returns the full tool-call result object (including `isError: true`
    /// results for domain failures), or a `McpError` for protocol-level
    /// problems.
    pub async fn call_tool(&self, tool_name: &str, arguments: Value) -> Result<Value, McpError> {
        let known = tool_list::worktreed_tools()
            .into_iter()
            .any(|t| t.name == tool_name);
        if !known {
            warn!(tool = tool_name, "MCP unknown tool");
            return Err(McpError::new(
                MCP_INVALID_PARAMS,
                format!("unknown tool: {tool_name}"),
            ));
        }

        let result = match tool_name {
            "create_worktree" => self.call_create(arguments).await,
            "remove_worktree" => self.call_remove(arguments).await,
            other => {
                return Err(McpError::new(
                    MCP_INVALID_PARAMS,
                    format!("unknown tool: {other}"),
                ));
            }
        }?;

        info!(tool = tool_name, "MCP tool executed");
        Ok(result)
    }

    async fn call_create(&self, arguments: Value) -> Result<Value, McpError> {
        let request: CreateWorktreeRequest = parse_arguments(arguments)?;
        match self.create.execute(request).await {
            Ok(response) => {
                let message = format!(
                    "Successfully created worktree for agent '{}' at '{}' on branch '{}'",
                    response.agent_id, response.worktree_path, response.branch_name
                );
                Ok(success_result(&message, json!(response)))
            }
            Err(err) => Ok(domain_error_result("create worktree", &err)),
        }
    }

    async fn call_remove(&self, arguments: Value) -> Result<Value, McpError> {
        let request: RemoveWorktreeRequest = parse_arguments(arguments)?;
        match self.remove.execute(request).await {
            Ok(response) => {
                let message = match &response.warning {
                    Some(warning) => warning.clone(),
                    None => format!(
                        "Successfully removed worktree for agent '{}'",
                        response.agent_id
                    ),
                };
                Ok(success_result(&message, json!(response)))
            }
            Err(err) => Ok(domain_error_result("remove worktree", &err)),
        }
    }
}

// ─── Result construction ─────────────────────────────────────────────────────

fn parse_arguments<T: serde::de::DeserializeOwned>(arguments: Value) -> Result<T, McpError> {
    serde_json::from_value(arguments)
        .map_err(|e| McpError::new(MCP_INVALID_PARAMS, format!("invalid arguments: {e}")))
}

fn success_result(message: &str, structured: Value) -> Value {
    json!({
        "content": [{ "type": "text", "text": message }],
        "structuredContent": structured,
        "isError": false
    })
}

fn domain_error_result(operation: &str, err: &WorktreeError) -> Value {
    warn!(operation, error = %err, kind = err.kind(), "tool call failed");
    json!({
        "content": [{ "type": "text", "text": format!("Failed to {operation}: {err}") }],
        "structuredContent": { "errorKind": err.kind() },
        "isError": true
    })
}

// ─── Tests ───────────────────────────────────────────────────────────────────
