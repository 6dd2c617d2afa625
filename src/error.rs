//! Error taxonomy for the worktree lifecycle.
//!
//! Every port failure is wrapped with the operation step that produced it
//! and returned to the caller unmodified; nothing here retries. The single
//! deliberate exception lives in `lifecycle::remove`: branch deletion after
//! a successful worktree removal is logged and swallowed.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorktreeError {
    /// Malformed agent identifier — rejected before any port is consulted.
    #[error("invalid agent id {id:?}: expected lowercase alphanumerics and single hyphens")]
    InvalidAgentId { id: String },

    #[error("worktree path cannot be empty")]
    EmptyWorktreePath,

    /// A record for this agent already exists.
    #[error("agent already exists: {0}")]
    AgentExists(String),

    /// The agent's branch already exists in the repository.
    #[error("branch already exists: {0}")]
    BranchExists(String),

    #[error("agent not found: {0}")]
    AgentNotFound(String),

    /// Removal was requested for an agent already in the `removed` state.
    #[error("agent already removed: {0}")]
    AlreadyRemoved(String),

    /// A git operation failed; `op` names the step, `message` carries the
    /// underlying tool's failure verbatim.
    #[error("git {op} failed: {message}")]
    Git { op: &'static str, message: String },

    #[error("storage failure: {0}")]
    Storage(String),
}

impl WorktreeError {
    /// Wrap an underlying git failure with the step that produced it.
    pub fn git(op: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Git {
            op,
            message: err.to_string(),
        }
    }

    /// Stable machine-checkable kind, surfaced alongside the message on the
    /// wire.
    pub fn kind(&self) -> &'static str {
        match self {
            WorktreeError::InvalidAgentId { .. } | WorktreeError::EmptyWorktreePath => "validation",
            WorktreeError::AgentExists(_) | WorktreeError::BranchExists(_) => "conflict",
            WorktreeError::AgentNotFound(_) => "not_found",
            WorktreeError::AlreadyRemoved(_) => "already_removed",
            WorktreeError::Git { .. } => "git",
            WorktreeError::Storage(_) => "storage",
        }
    }
}
