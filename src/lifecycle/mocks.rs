//! Configurable port doubles for lifecycle tests.
//!
//! Flags flip individual operations into failure; `Mutex`-guarded vectors
//! record what the use cases actually invoked.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::agent::Agent;
use crate::agent_id::AgentId;
use crate::error::WorktreeError;
use crate::ports::{AgentRepository, GitOperations};

// ─── MockGit ─────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MockGit {
    pub branch_exists: bool,
    /// Returned by `has_uncommitted_changes`.
    pub uncommitted: (bool, usize),
    /// Returned by `has_unpushed_commits`.
    pub unpushed_commits: usize,
    pub fail_create_worktree: bool,
    pub fail_remove_worktree: bool,
    pub fail_delete_branch: bool,
    pub fail_status_checks: bool,
    pub created_worktrees: Mutex<Vec<(PathBuf, String)>>,
    pub removed_worktrees: Mutex<Vec<(PathBuf, bool)>>,
    pub deleted_branches: Mutex<Vec<(String, bool)>>,
    /// Names of the pending-work checks that were consulted.
    pub status_checks: Mutex<Vec<&'static str>>,
}

#[async_trait]
impl GitOperations for MockGit {
    async fn create_worktree(&self, path: &Path, branch: &str) -> Result<(), WorktreeError> {
        if self.fail_create_worktree {
            return Err(WorktreeError::git("worktree add", "mock failure"));
        }
        self.created_worktrees
            .lock()
            .unwrap()
            .push((path.to_path_buf(), branch.to_string()));
        Ok(())
    }

    async fn remove_worktree(&self, path: &Path, force: bool) -> Result<(), WorktreeError> {
        if self.fail_remove_worktree {
            return Err(WorktreeError::git("worktree remove", "mock failure"));
        }
        self.removed_worktrees
            .lock()
            .unwrap()
            .push((path.to_path_buf(), force));
        Ok(())
    }

    async fn branch_exists(&self, _branch: &str) -> Result<bool, WorktreeError> {
        Ok(self.branch_exists)
    }

    async fn has_uncommitted_changes(
        &self,
        _path: &Path,
    ) -> Result<(bool, usize), WorktreeError> {
        if self.fail_status_checks {
            return Err(WorktreeError::git("status", "mock failure"));
        }
        self.status_checks.lock().unwrap().push("uncommitted");
        Ok(self.uncommitted)
    }

    async fn has_unpushed_commits(
        &self,
        _base_branch: &str,
        _branch: &str,
    ) -> Result<usize, WorktreeError> {
        if self.fail_status_checks {
            return Err(WorktreeError::git("rev-list", "mock failure"));
        }
        self.status_checks.lock().unwrap().push("unpushed");
        Ok(self.unpushed_commits)
    }

    async fn delete_branch(&self, branch: &str, force: bool) -> Result<(), WorktreeError> {
        if self.fail_delete_branch {
            return Err(WorktreeError::git("branch delete", "mock failure"));
        }
        self.deleted_branches
            .lock()
            .unwrap()
            .push((branch.to_string(), force));
        Ok(())
    }
}

// ─── MockAgentRepository ─────────────────────────────────────────────────────

#[derive(Default)]
pub struct MockAgentRepository {
    pub fail_save: bool,
    pub(crate) agents: Mutex<HashMap<String, Agent>>,
}

impl MockAgentRepository {
    pub fn with_agent(agent: Agent) -> Self {
        let repo = Self::default();
        repo.insert(agent);
        repo
    }

    /// Seed a record directly, bypassing the `fail_save` switch.
    pub fn insert(&self, agent: Agent) {
        self.agents
            .lock()
            .unwrap()
            .insert(agent.id().to_string(), agent);
    }

    pub fn get(&self, id: &str) -> Option<Agent> {
        self.agents.lock().unwrap().get(id).cloned()
    }
}

#[async_trait]
impl AgentRepository for MockAgentRepository {
    async fn save(&self, agent: &Agent) -> Result<(), WorktreeError> {
        if self.fail_save {
            return Err(WorktreeError::Storage("mock save failure".into()));
        }
        self.insert(agent.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &AgentId) -> Result<Agent, WorktreeError> {
        self.get(id.as_str())
            .ok_or_else(|| WorktreeError::AgentNotFound(id.to_string()))
    }

    async fn exists(&self, id: &AgentId) -> Result<bool, WorktreeError> {
        Ok(self.agents.lock().unwrap().contains_key(id.as_str()))
    }
}
