//! The two ports the lifecycle operations depend on.
//!
//! Both are object-safe async traits so real adapters (`git::GitClient`,
//! `persistence::InMemoryAgentRepository`) and test doubles are
//! interchangeable behind `Arc<dyn _>`.

use std::path::Path;

use async_trait::async_trait;

use crate::agent::Agent;
use crate::agent_id::AgentId;
use crate::error::WorktreeError;

// ─── GitOperations ───────────────────────────────────────────────────────────

/// Worktree and branch operations against the underlying repository.
#[async_trait]
pub trait GitOperations: Send + Sync {
    /// Create a new worktree at `path` checked out on a newly created
    /// `branch`. Fails if the path or the branch already exists.
    async fn create_worktree(&self, path: &Path, branch: &str) -> Result<(), WorktreeError>;

    /// Delete the worktree directory and its registration. With
    /// `force = false` the adapter refuses when the working tree has
    /// uncommitted modifications; callers do not duplicate that check.
    async fn remove_worktree(&self, path: &Path, force: bool) -> Result<(), WorktreeError>;

    async fn branch_exists(&self, branch: &str) -> Result<bool, WorktreeError>;

    /// Whether the working tree at `path` has any modified, added, deleted,
    /// or untracked files relative to its index, and how many.
    async fn has_uncommitted_changes(&self, path: &Path) -> Result<(bool, usize), WorktreeError>;

    /// Number of commits reachable from `branch` but not from `base_branch`.
    async fn has_unpushed_commits(
        &self,
        base_branch: &str,
        branch: &str,
    ) -> Result<usize, WorktreeError>;

    /// Delete a local branch. Best-effort from the caller's perspective:
    /// failure here must not be treated as fatal.
    async fn delete_branch(&self, branch: &str, force: bool) -> Result<(), WorktreeError>;
}

// ─── AgentRepository ─────────────────────────────────────────────────────────

/// Persistence contract for agent records.
///
/// `save` is an idempotent upsert keyed by the agent id and overwrites any
/// prior record, tombstones included. Uniqueness beyond id equality is a
/// lifecycle-operation concern, not a repository one.
#[async_trait]
pub trait AgentRepository: Send + Sync {
    async fn save(&self, agent: &Agent) -> Result<(), WorktreeError>;

    async fn find_by_id(&self, id: &AgentId) -> Result<Agent, WorktreeError>;

    async fn exists(&self, id: &AgentId) -> Result<bool, WorktreeError>;
}
