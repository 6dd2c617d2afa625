//! Create-worktree operation.
//!
//! Validates the id, rejects duplicates (agent record first, then branch),
//! provisions the worktree, and persists the new agent. Short-circuits on
//! the first failure. There is no compensating action: if the save fails
//! after the worktree was provisioned, the worktree stays on disk
//! unrecorded until the startup sweep reports it, and a retried create
//! fails on the branch conflict until an operator reconciles.

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::agent::{Agent, AgentStatus};
use crate::agent_id::AgentId;
use crate::config::WORKTREE_DIR;
use crate::error::WorktreeError;
use crate::ports::{AgentRepository, GitOperations};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorktreeRequest {
    pub agent_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorktreeResponse {
    pub agent_id: String,
    pub worktree_path: String,
    pub branch_name: String,
    pub status: AgentStatus,
}

pub struct CreateWorktree {
    git: Arc<dyn GitOperations>,
    agents: Arc<dyn AgentRepository>,
    worktree_root: PathBuf,
}

impl CreateWorktree {
    pub fn new(
        git: Arc<dyn GitOperations>,
        agents: Arc<dyn AgentRepository>,
        repo_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            git,
            agents,
            worktree_root: repo_root.into().join(WORKTREE_DIR),
        }
    }

    pub async fn execute(
        &self,
        request: CreateWorktreeRequest,
    ) -> Result<CreateWorktreeResponse, WorktreeError> {
        let agent_id = AgentId::parse(&request.agent_id)?;

        if self.agents.exists(&agent_id).await? {
            return Err(WorktreeError::AgentExists(agent_id.to_string()));
        }

        let branch_name = agent_id.branch_name();
        if self.git.branch_exists(&branch_name).await? {
            return Err(WorktreeError::BranchExists(branch_name));
        }

        let worktree_path = self.worktree_root.join(agent_id.worktree_dir_name());
        self.git.create_worktree(&worktree_path, &branch_name).await?;

        // The worktree now exists on disk; a failure past this point leaves
        // it unrecorded.
        let agent = Agent::new(agent_id, worktree_path)?;
        self.agents.save(&agent).await?;

        info!(
            agent_id = %agent.id(),
            branch = agent.branch_name(),
            path = %agent.worktree_path().display(),
            "worktree created"
        );

        Ok(CreateWorktreeResponse {
            agent_id: agent.id().to_string(),
            worktree_path: agent.worktree_path().display().to_string(),
            branch_name: agent.branch_name().to_string(),
            status: agent.status(),
        })
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
