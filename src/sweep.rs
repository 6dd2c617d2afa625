//! Startup reconciliation sweep.
//!
//! Create is not atomic across "worktree provisioned" and "record saved":
//! a crash or storage failure in between leaves a directory on disk with no
//! live agent record. The sweep makes that gap visible — it lists the
//! worktree root and reports every directory with no matching record in a
//! non-removed state. It never deletes anything; that stays an operator
//! decision.

use std::path::{Path, PathBuf};

use crate::agent::AgentStatus;
use crate::agent_id::AgentId;
use crate::error::WorktreeError;
use crate::ports::AgentRepository;

/// Directories under `worktree_root` with no live agent record.
///
/// A directory is an orphan when its name does not follow the
/// `agent-<id>` convention, when no record exists for the id, or when the
/// record is a `removed` tombstone.
pub async fn find_orphaned_worktrees(
    worktree_root: &Path,
    agents: &dyn AgentRepository,
) -> Result<Vec<PathBuf>, WorktreeError> {
    let mut orphans = Vec::new();

    let mut entries = match tokio::fs::read_dir(worktree_root).await {
        Ok(entries) => entries,
        // No worktree root yet — nothing to reconcile.
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(orphans),
        Err(e) => return Err(WorktreeError::Storage(format!("reading worktree root: {e}"))),
    };

    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| WorktreeError::Storage(format!("reading worktree root: {e}")))?
    {
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().into_owned();
        let Some(agent_id) = AgentId::from_worktree_dir_name(&name) else {
            orphans.push(path);
            continue;
        };

        match agents.find_by_id(&agent_id).await {
            Ok(agent) if agent.status() != AgentStatus::Removed => {}
            Ok(_) | Err(WorktreeError::AgentNotFound(_)) => orphans.push(path),
            Err(other) => return Err(other),
        }
    }

    orphans.sort();
    Ok(orphans)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
