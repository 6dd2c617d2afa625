//! Agent lifecycle entity.
//!
//! One record per agent, owned by the repository. Operations obtain a copy,
//! mutate it, and save it back; no shared mutable reference crosses an
//! operation boundary. Records are tombstoned (`Removed`), never deleted.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::agent_id::AgentId;
use crate::error::WorktreeError;

// ─── Status ──────────────────────────────────────────────────────────────────

/// Lifecycle state machine: `Created → {Merged, Failed, Removed}`, each a
/// one-way transition. `Removed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    Created,
    Merged,
    Failed,
    Removed,
}

impl AgentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentStatus::Created => "created",
            AgentStatus::Merged => "merged",
            AgentStatus::Failed => "failed",
            AgentStatus::Removed => "removed",
        }
    }
}

impl fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Agent ───────────────────────────────────────────────────────────────────

/// An agent with its provisioned worktree and branch.
///
/// `branch_name` always equals `id.branch_name()`; `worktree_path` is
/// non-empty from construction onward.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    id: AgentId,
    status: AgentStatus,
    worktree_path: PathBuf,
    branch_name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Agent {
    /// Construct a fresh agent in status `Created`.
    pub fn new(id: AgentId, worktree_path: impl Into<PathBuf>) -> Result<Self, WorktreeError> {
        let worktree_path = worktree_path.into();
        if worktree_path.as_os_str().is_empty() {
            return Err(WorktreeError::EmptyWorktreePath);
        }

        let now = Utc::now();
        let branch_name = id.branch_name();
        Ok(Self {
            id,
            status: AgentStatus::Created,
            worktree_path,
            branch_name,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn id(&self) -> &AgentId {
        &self.id
    }

    pub fn status(&self) -> AgentStatus {
        self.status
    }

    pub fn worktree_path(&self) -> &Path {
        &self.worktree_path
    }

    pub fn branch_name(&self) -> &str {
        &self.branch_name
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Mark the agent's branch as merged into the base branch.
    pub fn mark_merged(&mut self) -> Result<(), WorktreeError> {
        self.transition(AgentStatus::Merged)
    }

    /// Mark the agent as failed.
    pub fn mark_failed(&mut self) -> Result<(), WorktreeError> {
        self.transition(AgentStatus::Failed)
    }

    /// Mark the agent's worktree as removed. Terminal: a removed agent
    /// refuses every further transition.
    pub fn mark_removed(&mut self) -> Result<(), WorktreeError> {
        self.transition(AgentStatus::Removed)
    }

    fn transition(&mut self, next: AgentStatus) -> Result<(), WorktreeError> {
        if self.status == AgentStatus::Removed {
            return Err(WorktreeError::AlreadyRemoved(self.id.to_string()));
        }
        self.status = next;
        self.updated_at = Utc::now();
        Ok(())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn agent(id: &str) -> Agent {
        Agent::new(AgentId::parse(id).unwrap(), "/tmp/worktrees/x").unwrap()
    }

    #[test]
    fn new_agent_starts_created() {
        let a = agent("test-agent");
        assert_eq!(a.id().as_str(), "test-agent");
        assert_eq!(a.status(), AgentStatus::Created);
        assert_eq!(a.branch_name(), "agent-test-agent");
        assert_eq!(a.worktree_path(), Path::new("/tmp/worktrees/x"));
        assert_eq!(a.created_at(), a.updated_at());
    }

    #[test]
    fn new_agent_rejects_empty_path() {
        let err = Agent::new(AgentId::parse("x").unwrap(), "").unwrap_err();
        assert!(matches!(err, WorktreeError::EmptyWorktreePath));
    }

    #[test]
    fn mark_merged_transitions_and_touches_updated_at() {
        let mut a = agent("test-agent");
        let before = a.updated_at();
        a.mark_merged().unwrap();
        assert_eq!(a.status(), AgentStatus::Merged);
        assert!(a.updated_at() >= before);
    }

    #[test]
    fn mark_failed_transitions() {
        let mut a = agent("test-agent");
        a.mark_failed().unwrap();
        assert_eq!(a.status(), AgentStatus::Failed);
    }

    #[test]
    fn mark_removed_is_terminal() {
        let mut a = agent("test-agent");
        a.mark_removed().unwrap();
        assert_eq!(a.status(), AgentStatus::Removed);

        let err = a.mark_removed().unwrap_err();
        assert!(matches!(err, WorktreeError::AlreadyRemoved(_)));
        let err = a.mark_merged().unwrap_err();
        assert!(matches!(err, WorktreeError::AlreadyRemoved(_)));
        assert_eq!(a.status(), AgentStatus::Removed);
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&AgentStatus::Created).unwrap(),
            "\"created\""
        );
        assert_eq!(AgentStatus::Removed.as_str(), "removed");
    }
}
