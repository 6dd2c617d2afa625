//! End-to-end lifecycle tests against a real temporary git repository.
//!
//! These exercise the git2 adapter for real: worktrees appear on disk,
//! branches exist, dirty trees block non-forced removal.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use worktreed::agent::AgentStatus;
use worktreed::agent_id::AgentId;
use worktreed::error::WorktreeError;
use worktreed::git::GitClient;
use worktreed::lifecycle::{
    CreateWorktree, CreateWorktreeRequest, RemoveWorktree, RemoveWorktreeRequest,
};
use worktreed::persistence::InMemoryAgentRepository;
use worktreed::ports::{AgentRepository, GitOperations};

struct Harness {
    _dir: tempfile::TempDir,
    repo_root: PathBuf,
    agents: Arc<InMemoryAgentRepository>,
    create: CreateWorktree,
    remove: RemoveWorktree,
}

impl Harness {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let repo_root = dir.path().canonicalize().unwrap();

        let repo = git2::Repository::init(&repo_root).unwrap();
        let mut config = repo.config().unwrap();
        config.set_str("user.name", "tester").unwrap();
        config.set_str("user.email", "tester@example.com").unwrap();

        std::fs::write(repo_root.join("README.md"), "# fixture\n").unwrap();
        let mut index = repo.index().unwrap();
        index.add_path(Path::new("README.md")).unwrap();
        index.write().unwrap();
        let tree_id = index.write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        let sig = git2::Signature::now("tester", "tester@example.com").unwrap();
        repo.commit(Some("HEAD"), &sig, &sig, "initial commit", &tree, &[])
            .unwrap();

        // Whatever libgit2 named the default branch is our base branch.
        let base_branch = repo.head().unwrap().shorthand().unwrap().to_string();

        let git: Arc<dyn GitOperations> = Arc::new(GitClient::new(&repo_root));
        let agents = Arc::new(InMemoryAgentRepository::new());
        let agents_port: Arc<dyn AgentRepository> = agents.clone();

        let create = CreateWorktree::new(git.clone(), agents_port.clone(), &repo_root);
        let remove = RemoveWorktree::new(git, agents_port, base_branch);

        Self {
            _dir: dir,
            repo_root,
            agents,
            create,
            remove,
        }
    }

    fn worktree_path(&self, agent_id: &str) -> PathBuf {
        self.repo_root.join(".worktrees").join(format!("agent-{agent_id}"))
    }

    fn branch_exists(&self, name: &str) -> bool {
        let repo = git2::Repository::open(&self.repo_root).unwrap();
        let exists = repo.find_branch(name, git2::BranchType::Local).is_ok();
        exists
    }

    async fn stored_status(&self, agent_id: &str) -> AgentStatus {
        self.agents
            .find_by_id(&AgentId::parse(agent_id).unwrap())
            .await
            .unwrap()
            .status()
    }

    async fn create_agent(&self, agent_id: &str) -> worktreed::lifecycle::CreateWorktreeResponse {
        self.create
            .execute(CreateWorktreeRequest {
                agent_id: agent_id.to_string(),
            })
            .await
            .unwrap()
    }

    async fn remove_agent(
        &self,
        agent_id: &str,
        force: bool,
    ) -> Result<worktreed::lifecycle::RemoveWorktreeResponse, WorktreeError> {
        self.remove
            .execute(RemoveWorktreeRequest {
                agent_id: agent_id.to_string(),
                force,
            })
            .await
    }
}

/// Commit one new file on the worktree's branch.
fn commit_file(worktree: &Path, name: &str) {
    let repo = git2::Repository::open(worktree).unwrap();
    std::fs::write(worktree.join(name), "change\n").unwrap();
    let mut index = repo.index().unwrap();
    index.add_path(Path::new(name)).unwrap();
    index.write().unwrap();
    let tree_id = index.write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();
    let sig = git2::Signature::now("tester", "tester@example.com").unwrap();
    let parent = repo.head().unwrap().peel_to_commit().unwrap();
    repo.commit(Some("HEAD"), &sig, &sig, "work", &tree, &[&parent])
        .unwrap();
}

#[tokio::test]
async fn create_provisions_directory_and_branch() {
    let h = Harness::new();

    let response = h.create_agent("copilot").await;

    assert_eq!(response.agent_id, "copilot");
    assert_eq!(response.branch_name, "agent-copilot");
    assert_eq!(response.status, AgentStatus::Created);

    let path = h.worktree_path("copilot");
    assert!(path.is_dir(), "worktree directory should exist");
    assert!(path.join("README.md").is_file(), "worktree should be checked out");
    assert!(h.branch_exists("agent-copilot"));
    assert_eq!(h.stored_status("copilot").await, AgentStatus::Created);

    // The worktree is checked out on the agent branch.
    let wt = git2::Repository::open(&path).unwrap();
    assert_eq!(wt.head().unwrap().shorthand().unwrap(), "agent-copilot");
}

#[tokio::test]
async fn create_is_not_idempotent() {
    let h = Harness::new();
    h.create_agent("copilot").await;

    let err = h
        .create
        .execute(CreateWorktreeRequest {
            agent_id: "copilot".to_string(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, WorktreeError::AgentExists(_)));
}

#[tokio::test]
async fn create_conflicts_with_a_preexisting_branch() {
    let h = Harness::new();
    {
        let repo = git2::Repository::open(&h.repo_root).unwrap();
        let head = repo.head().unwrap().peel_to_commit().unwrap();
        repo.branch("agent-squatter", &head, false).unwrap();
    }

    let err = h
        .create
        .execute(CreateWorktreeRequest {
            agent_id: "squatter".to_string(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, WorktreeError::BranchExists(_)));
    assert!(!h.worktree_path("squatter").exists());
}

#[tokio::test]
async fn clean_remove_tears_everything_down() {
    let h = Harness::new();
    h.create_agent("copilot").await;

    let response = h.remove_agent("copilot", false).await.unwrap();

    assert!(!response.has_unmerged_changes);
    assert!(response.removed_at.is_some());
    assert_eq!(response.unmerged_commits, 0);
    assert_eq!(response.uncommitted_files, 0);
    assert!(!h.worktree_path("copilot").exists());
    assert!(!h.branch_exists("agent-copilot"));
    assert_eq!(h.stored_status("copilot").await, AgentStatus::Removed);
}

#[tokio::test]
async fn untracked_file_blocks_non_forced_removal() {
    let h = Harness::new();
    h.create_agent("test-agent").await;
    std::fs::write(h.worktree_path("test-agent").join("scratch.txt"), "wip\n").unwrap();

    let response = h.remove_agent("test-agent", false).await.unwrap();

    assert!(response.has_unmerged_changes);
    assert_eq!(response.uncommitted_files, 1);
    assert_eq!(response.unmerged_commits, 0);
    assert!(response.removed_at.is_none());
    assert_eq!(
        response.warning.as_deref(),
        Some(
            "Agent has 0 unpushed commits and 1 uncommitted files. \
             Call with force=true to remove anyway."
        )
    );

    // Nothing was removed and the record is untouched.
    assert!(h.worktree_path("test-agent").is_dir());
    assert_eq!(h.stored_status("test-agent").await, AgentStatus::Created);
}

#[tokio::test]
async fn force_removes_a_dirty_worktree() {
    let h = Harness::new();
    h.create_agent("test-agent").await;
    std::fs::write(h.worktree_path("test-agent").join("scratch.txt"), "wip\n").unwrap();

    let response = h.remove_agent("test-agent", true).await.unwrap();

    assert!(!response.has_unmerged_changes);
    assert!(response.removed_at.is_some());
    assert!(!h.worktree_path("test-agent").exists());
    assert_eq!(h.stored_status("test-agent").await, AgentStatus::Removed);
}

#[tokio::test]
async fn commits_ahead_of_base_block_non_forced_removal() {
    let h = Harness::new();
    h.create_agent("busy").await;
    commit_file(&h.worktree_path("busy"), "feature.rs");

    let response = h.remove_agent("busy", false).await.unwrap();

    assert!(response.has_unmerged_changes);
    assert_eq!(response.unmerged_commits, 1);
    assert_eq!(response.uncommitted_files, 0);
    assert!(response.removed_at.is_none());
    assert!(h.worktree_path("busy").is_dir());
}

#[tokio::test]
async fn remove_before_create_is_not_found() {
    let h = Harness::new();
    let err = h.remove_agent("nonexistent", false).await.unwrap_err();
    assert!(matches!(err, WorktreeError::AgentNotFound(_)));
}

#[tokio::test]
async fn second_remove_hits_the_tombstone() {
    let h = Harness::new();
    h.create_agent("copilot").await;
    h.remove_agent("copilot", false).await.unwrap();

    for force in [false, true] {
        let err = h.remove_agent("copilot", force).await.unwrap_err();
        assert!(matches!(err, WorktreeError::AlreadyRemoved(_)));
    }
}
