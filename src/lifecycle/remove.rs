//! Remove-worktree operation.
//!
//! Without `force`, pending work (uncommitted files or commits not on the
//! base branch) short-circuits into a dry-run outcome: the caller gets the
//! counts and a warning, and neither git nor storage is touched. That
//! outcome is a successful result, not an error — it carries what the
//! caller needs to decide on `force = true`.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::agent::AgentStatus;
use crate::agent_id::AgentId;
use crate::error::WorktreeError;
use crate::ports::{AgentRepository, GitOperations};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveWorktreeRequest {
    pub agent_id: String,
    #[serde(default)]
    pub force: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveWorktreeResponse {
    pub agent_id: String,
    /// Present iff removal actually occurred.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub removed_at: Option<DateTime<Utc>>,
    pub has_unmerged_changes: bool,
    pub unmerged_commits: usize,
    pub uncommitted_files: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

pub struct RemoveWorktree {
    git: Arc<dyn GitOperations>,
    agents: Arc<dyn AgentRepository>,
    base_branch: String,
}

impl RemoveWorktree {
    pub fn new(
        git: Arc<dyn GitOperations>,
        agents: Arc<dyn AgentRepository>,
        base_branch: impl Into<String>,
    ) -> Self {
        Self {
            git,
            agents,
            base_branch: base_branch.into(),
        }
    }

    pub async fn execute(
        &self,
        request: RemoveWorktreeRequest,
    ) -> Result<RemoveWorktreeResponse, WorktreeError> {
        let agent_id = AgentId::parse(&request.agent_id)?;
        let mut agent = self.agents.find_by_id(&agent_id).await?;

        if agent.status() == AgentStatus::Removed {
            return Err(WorktreeError::AlreadyRemoved(agent_id.to_string()));
        }

        if !request.force {
            let (has_uncommitted, uncommitted_files) = self
                .git
                .has_uncommitted_changes(agent.worktree_path())
                .await?;
            let unmerged_commits = self
                .git
                .has_unpushed_commits(&self.base_branch, agent.branch_name())
                .await?;

            if has_uncommitted || unmerged_commits > 0 {
                // Dry run: report, touch nothing.
                return Ok(RemoveWorktreeResponse {
                    agent_id: request.agent_id,
                    removed_at: None,
                    has_unmerged_changes: true,
                    unmerged_commits,
                    uncommitted_files,
                    warning: Some(unmerged_warning(unmerged_commits, uncommitted_files)),
                });
            }
        }

        self.git
            .remove_worktree(agent.worktree_path(), request.force)
            .await?;

        // Branch cleanup is cosmetic once the worktree is gone; a failure
        // here is logged and swallowed.
        if let Err(err) = self.git.delete_branch(agent.branch_name(), true).await {
            warn!(agent_id = %agent_id, error = %err, "branch deletion failed after worktree removal");
        }

        agent.mark_removed()?;
        self.agents.save(&agent).await?;

        info!(agent_id = %agent_id, "worktree removed");

        Ok(RemoveWorktreeResponse {
            agent_id: request.agent_id,
            removed_at: Some(agent.updated_at()),
            has_unmerged_changes: false,
            unmerged_commits: 0,
            uncommitted_files: 0,
            warning: None,
        })
    }
}

fn unmerged_warning(unmerged_commits: usize, uncommitted_files: usize) -> String {
    format!(
        "Agent has {unmerged_commits} unpushed commits and {uncommitted_files} uncommitted files. \
         Call with force=true to remove anyway."
    )
}

// ─── Tests ───────────────────────────────────────────────────────────────────
