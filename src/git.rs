//! git2-backed implementation of the `GitOperations` port.
//!
//! Every operation opens the repository and does all of its libgit2 work
//! inside `tokio::task::spawn_blocking` — repository handles are not `Send`
//! and must never cross an await point.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use git2::{
    BranchType, ErrorCode, Repository, StatusOptions, WorktreeAddOptions, WorktreePruneOptions,
};
use tracing::debug;

use crate::error::WorktreeError;
use crate::ports::GitOperations;

pub struct GitClient {
    repo_root: PathBuf,
}

impl GitClient {
    pub fn new(repo_root: impl Into<PathBuf>) -> Self {
        Self {
            repo_root: repo_root.into(),
        }
    }
}

async fn run_blocking<T, F>(job: F) -> Result<T, WorktreeError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, WorktreeError> + Send + 'static,
{
    tokio::task::spawn_blocking(job)
        .await
        .map_err(|e| WorktreeError::git("blocking task", e))?
}

fn open_repo(repo_root: &Path) -> Result<Repository, WorktreeError> {
    Repository::open(repo_root).map_err(|e| WorktreeError::git("open repository", e))
}

#[async_trait]
impl GitOperations for GitClient {
    async fn create_worktree(&self, path: &Path, branch: &str) -> Result<(), WorktreeError> {
        let repo_root = self.repo_root.clone();
        let path = path.to_path_buf();
        let branch = branch.to_string();
        run_blocking(move || {
            let repo = open_repo(&repo_root)?;
            create_worktree_blocking(&repo, &path, &branch)
        })
        .await
    }

    async fn remove_worktree(&self, path: &Path, force: bool) -> Result<(), WorktreeError> {
        let repo_root = self.repo_root.clone();
        let path = path.to_path_buf();
        run_blocking(move || {
            let repo = open_repo(&repo_root)?;
            remove_worktree_blocking(&repo, &path, force)
        })
        .await
    }

    async fn branch_exists(&self, branch: &str) -> Result<bool, WorktreeError> {
        let repo_root = self.repo_root.clone();
        let branch = branch.to_string();
        run_blocking(move || {
            let repo = open_repo(&repo_root)?;
            let result = match repo.find_branch(&branch, BranchType::Local) {
                Ok(_) => Ok(true),
                Err(e) if e.code() == ErrorCode::NotFound => Ok(false),
                Err(e) => Err(WorktreeError::git("branch lookup", e)),
            };
            result
        })
        .await
    }

    async fn has_uncommitted_changes(&self, path: &Path) -> Result<(bool, usize), WorktreeError> {
        let path = path.to_path_buf();
        run_blocking(move || uncommitted_changes_at(&path)).await
    }

    async fn has_unpushed_commits(
        &self,
        base_branch: &str,
        branch: &str,
    ) -> Result<usize, WorktreeError> {
        let repo_root = self.repo_root.clone();
        let base_branch = base_branch.to_string();
        let branch = branch.to_string();
        run_blocking(move || {
            let repo = open_repo(&repo_root)?;
            let tip = branch_tip(&repo, &branch)?;
            let base_tip = branch_tip(&repo, &base_branch)?;
            let (ahead, _behind) = repo
                .graph_ahead_behind(tip, base_tip)
                .map_err(|e| WorktreeError::git("rev-list", e))?;
            Ok(ahead)
        })
        .await
    }

    async fn delete_branch(&self, branch: &str, force: bool) -> Result<(), WorktreeError> {
        let repo_root = self.repo_root.clone();
        let branch = branch.to_string();
        run_blocking(move || {
            let repo = open_repo(&repo_root)?;
            delete_branch_blocking(&repo, &branch, force)
        })
        .await
    }
}

// ─── Blocking helpers ────────────────────────────────────────────────────────

fn create_worktree_blocking(
    repo: &Repository,
    path: &Path,
    branch_name: &str,
) -> Result<(), WorktreeError> {
    if path.exists() {
        return Err(WorktreeError::git(
            "worktree add",
            format!("path already exists: {}", path.display()),
        ));
    }

    let head_commit = repo
        .head()
        .and_then(|head| head.peel_to_commit())
        .map_err(|e| WorktreeError::git("resolve HEAD", e))?;

    // force = false: creation is exclusive, an existing branch is an error.
    let branch = repo
        .branch(branch_name, &head_commit, false)
        .map_err(|e| WorktreeError::git("branch create", e))?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| WorktreeError::git("worktree add", e))?;
    }

    // The worktree registration name is the directory basename, matching
    // what `git worktree add` would pick.
    let worktree_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| branch_name.to_string());

    let mut opts = WorktreeAddOptions::new();
    opts.reference(Some(branch.get()));
    repo.worktree(&worktree_name, path, Some(&opts))
        .map_err(|e| WorktreeError::git("worktree add", e))?;

    debug!(branch = branch_name, path = %path.display(), "worktree added");
    Ok(())
}

fn remove_worktree_blocking(
    repo: &Repository,
    path: &Path,
    force: bool,
) -> Result<(), WorktreeError> {
    if !force && path.exists() {
        let (dirty, count) = uncommitted_changes_at(path)?;
        if dirty {
            return Err(WorktreeError::git(
                "worktree remove",
                format!(
                    "worktree at {} has {} uncommitted change(s)",
                    path.display(),
                    count
                ),
            ));
        }
    }

    // Find the registered worktree (by path, falling back to the basename
    // it was registered under) and prune it, working tree included.
    let basename = path.file_name().map(|n| n.to_string_lossy().into_owned());
    let names = repo
        .worktrees()
        .map_err(|e| WorktreeError::git("worktree list", e))?;
    for name in names.iter().flatten() {
        let Ok(worktree) = repo.find_worktree(name) else {
            continue;
        };
        if worktree.path() != path && basename.as_deref() != Some(name) {
            continue;
        }

        let mut opts = WorktreePruneOptions::new();
        opts.valid(true).working_tree(true);
        if force {
            opts.locked(true);
        }
        worktree
            .prune(Some(&mut opts))
            .map_err(|e| WorktreeError::git("worktree prune", e))?;
        if path.exists() {
            std::fs::remove_dir_all(path)
                .map_err(|e| WorktreeError::git("worktree remove", e))?;
        }
        return Ok(());
    }

    // Not registered — clean up a leftover directory if there is one.
    if path.exists() {
        std::fs::remove_dir_all(path).map_err(|e| WorktreeError::git("worktree remove", e))?;
    }
    Ok(())
}

fn uncommitted_changes_at(path: &Path) -> Result<(bool, usize), WorktreeError> {
    let repo = Repository::open(path).map_err(|e| WorktreeError::git("open worktree", e))?;

    let mut opts = StatusOptions::new();
    opts.include_untracked(true)
        .include_ignored(false)
        .recurse_untracked_dirs(true);

    let statuses = repo
        .statuses(Some(&mut opts))
        .map_err(|e| WorktreeError::git("status", e))?;

    let count = statuses
        .iter()
        .filter(|entry| entry.status() != git2::Status::CURRENT)
        .count();
    Ok((count > 0, count))
}

fn branch_tip(repo: &Repository, branch_name: &str) -> Result<git2::Oid, WorktreeError> {
    let branch = repo
        .find_branch(branch_name, BranchType::Local)
        .map_err(|e| WorktreeError::git("branch lookup", e))?;
    branch
        .get()
        .peel_to_commit()
        .map(|commit| commit.id())
        .map_err(|e| WorktreeError::git("branch lookup", e))
}

fn delete_branch_blocking(
    repo: &Repository,
    branch_name: &str,
    force: bool,
) -> Result<(), WorktreeError> {
    let mut branch = repo
        .find_branch(branch_name, BranchType::Local)
        .map_err(|e| WorktreeError::git("branch lookup", e))?;

    if !force {
        // Mirror the porcelain -d guard: refuse to drop commits not
        // reachable from HEAD.
        let tip = branch
            .get()
            .peel_to_commit()
            .map_err(|e| WorktreeError::git("branch delete", e))?
            .id();
        let head = repo
            .head()
            .and_then(|h| h.peel_to_commit())
            .map_err(|e| WorktreeError::git("branch delete", e))?
            .id();
        let (ahead, _) = repo
            .graph_ahead_behind(tip, head)
            .map_err(|e| WorktreeError::git("branch delete", e))?;
        if ahead > 0 {
            return Err(WorktreeError::git(
                "branch delete",
                format!("branch {branch_name} is not fully merged"),
            ));
        }
    }

    branch
        .delete()
        .map_err(|e| WorktreeError::git("branch delete", e))
}
