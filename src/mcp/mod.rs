//! Model Context Protocol (MCP) server for `worktreed`.
//!
//! Exposes the two worktree lifecycle operations as MCP tools over a stdio
//! JSON-RPC 2.0 transport.
//!
//! ## Protocol version
//! MCP 2024-11-05.
//!
//! ## Submodules
//!
//! | Module | Role |
//! |--------|------|
//! | `transport` | JSON-RPC wire types, stdio message loop, lifecycle handshake |
//! | `tools` | `tools/list` response — the two worktree tool definitions |
//! | `dispatch` | `tools/call` dispatcher — routes to the lifecycle operations |

pub mod dispatch;
pub mod tools;
pub mod transport;

// ─── Flat re-exports ─────────────────────────────────────────────────────────

pub use dispatch::McpDispatcher;
pub use tools::{worktreed_tools, McpToolDef};
pub use transport::{
    serve_stdio, McpError, McpMessage, McpResponse, MCP_INTERNAL_ERROR, MCP_INVALID_PARAMS,
    MCP_INVALID_REQUEST, MCP_METHOD_NOT_FOUND, MCP_PARSE_ERROR,
};
