//! `worktreed` — per-agent git worktree lifecycle manager.
//!
//! Provisions an isolated worktree (checked out on its own `agent-<id>`
//! branch under `<repo_root>/.worktrees/`) for each logical agent, refuses
//! to silently drop uncommitted or unpushed work on removal, and keeps a
//! durable record of each agent's lifecycle state. The two operations are
//! exposed as MCP tools over stdio.
//!
//! Core layout:
//! - [`agent_id`] / [`agent`] — validated identifier and lifecycle entity
//! - [`ports`] — the `GitOperations` and `AgentRepository` contracts
//! - [`lifecycle`] — the create / remove operations
//! - [`git`] / [`persistence`] — the concrete adapters
//! - [`mcp`] — the stdio transport shell
//! - [`sweep`] — startup orphan reconciliation

pub mod agent;
pub mod agent_id;
pub mod config;
pub mod error;
pub mod git;
pub mod lifecycle;
pub mod mcp;
pub mod persistence;
pub mod ports;
pub mod sweep;

pub use agent::{Agent, AgentStatus};
pub use agent_id::AgentId;
pub use error::WorktreeError;
pub use lifecycle::{CreateWorktree, RemoveWorktree};
pub use ports::{AgentRepository, GitOperations};
