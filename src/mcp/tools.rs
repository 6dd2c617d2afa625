//! MCP `tools/list` handler — the worktree lifecycle tool catalogue.
//!
//! Each tool definition follows the JSON Schema convention for
//! `inputSchema`. Clients call `tools/list` to discover the tools, then
//! invoke them via `tools/call` (dispatched by `mcp::dispatch`).

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

// ─── Tool definition type ────────────────────────────────────────────────────

/// A single MCP tool definition, as returned in `tools/list`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpToolDef {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

impl McpToolDef {
    fn new(name: &str, description: &str, input_schema: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }
}

// ─── Tool catalogue ──────────────────────────────────────────────────────────

/// Returns the worktree tools available via MCP.
///
/// A function rather than a static because `serde_json::json!` produces a
/// non-`const` `Value`; the list is small and cheap to allocate.
pub fn worktreed_tools() -> Vec<McpToolDef> {
    vec![
        // ── create_worktree ─────────────────────────────────────────────────
        McpToolDef::new(
            "create_worktree",
            "Creates an isolated git worktree for a specific agent with its own branch.",
            json!({
                "type": "object",
                "required": ["agentId"],
                "properties": {
                    "agentId": {
                        "type": "string",
                        "pattern": "^[a-z0-9]+(-[a-z0-9]+)*$",
                        "description": "The unique identifier for the agent. Lowercase alphanumerics and single hyphens."
                    }
                },
                "additionalProperties": false
            }),
        ),
        // ── remove_worktree ─────────────────────────────────────────────────
        McpToolDef::new(
            "remove_worktree",
            "Removes an agent's worktree. Without force, pending uncommitted or unpushed work \
             is reported instead of removed.",
            json!({
                "type": "object",
                "required": ["agentId"],
                "properties": {
                    "agentId": {
                        "type": "string",
                        "pattern": "^[a-z0-9]+(-[a-z0-9]+)*$",
                        "description": "The unique identifier for the agent."
                    },
                    "force": {
                        "type": "boolean",
                        "description": "Remove even when the worktree has uncommitted or unpushed work.",
                        "default": false
                    }
                },
                "additionalProperties": false
            }),
        ),
    ]
}

// ─── Tests ───────────────────────────────────────────────────────────────────
