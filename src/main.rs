use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use clap::Parser;
use tracing::{info, warn};

use worktreed::config::WorktreedConfig;
use worktreed::git::GitClient;
use worktreed::lifecycle::{CreateWorktree, RemoveWorktree};
use worktreed::mcp::{serve_stdio, McpDispatcher};
use worktreed::persistence::InMemoryAgentRepository;
use worktreed::ports::{AgentRepository, GitOperations};
use worktreed::sweep;

#[derive(Parser)]
#[command(
    name = "worktreed",
    about = "Agent worktree manager — MCP server over stdio",
    version
)]
struct Args {
    /// Path to the managed git repository (defaults to the current directory)
    #[arg(long, env = "WORKTREED_REPO")]
    repo: Option<PathBuf>,

    /// Branch unpushed commits are counted against
    #[arg(long, env = "WORKTREED_BASE_BRANCH")]
    base_branch: Option<String>,

    /// Log level filter (trace, debug, info, warn, error)
    #[arg(long, env = "WORKTREED_LOG")]
    log: Option<String>,

    /// Write logs to this file path (rotated daily). Optional.
    #[arg(long, env = "WORKTREED_LOG_FILE")]
    log_file: Option<PathBuf>,

    /// Optional TOML config file
    #[arg(long, env = "WORKTREED_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = WorktreedConfig::load(args.config.as_deref())?;
    if let Some(repo) = args.repo {
        config.repo_root = Some(repo);
    }
    if let Some(base_branch) = args.base_branch {
        config.base_branch = base_branch;
    }
    if let Some(log) = args.log {
        config.log = log;
    }
    if let Some(log_file) = args.log_file {
        config.log_file = Some(log_file);
    }

    let _log_guard = setup_logging(&config.log, config.log_file.as_deref());

    let repo_root = config
        .resolve_repo_root()?
        .canonicalize()
        .context("resolving repository root")?;

    // Fail fast on a directory that is not a git repository.
    git2::Repository::open(&repo_root)
        .with_context(|| format!("opening git repository at {}", repo_root.display()))?;

    info!(
        repo = %repo_root.display(),
        base_branch = %config.base_branch,
        "starting worktreed"
    );

    let git: Arc<dyn GitOperations> = Arc::new(GitClient::new(&repo_root));
    let agents: Arc<dyn AgentRepository> = Arc::new(InMemoryAgentRepository::new());

    // Records live in memory only: after a restart every worktree directory
    // left on disk is unaccounted for. Report them, do not delete them.
    let worktree_root = WorktreedConfig::worktree_root(&repo_root);
    match sweep::find_orphaned_worktrees(&worktree_root, agents.as_ref()).await {
        Ok(orphans) => {
            for path in orphans {
                warn!(path = %path.display(), "worktree directory has no live agent record");
            }
        }
        Err(e) => warn!(error = %e, "orphan sweep failed"),
    }

    let dispatcher = McpDispatcher::new(
        CreateWorktree::new(git.clone(), agents.clone(), &repo_root),
        RemoveWorktree::new(git, agents, config.base_branch.clone()),
    );

    serve_stdio(dispatcher).await
}

/// Initialise tracing. Console output goes to stderr — stdout carries the
/// MCP wire protocol. If the log directory cannot be created, falls back to
/// stderr-only logging with a warning; never panics.
fn setup_logging(
    log_level: &str,
    log_file: Option<&std::path::Path>,
) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    if let Some(path) = log_file {
        let dir = path.parent().unwrap_or_else(|| std::path::Path::new("."));
        let filename = path
            .file_name()
            .unwrap_or_else(|| std::ffi::OsStr::new("worktreed.log"));

        // Ensure the directory exists before tracing-appender tries to open it.
        if let Err(e) = std::fs::create_dir_all(dir) {
            eprintln!(
                "warn: could not create log directory '{}': {e} — falling back to stderr",
                dir.display()
            );
            tracing_subscriber::fmt()
                .with_env_filter(EnvFilter::new(log_level))
                .with_writer(std::io::stderr)
                .compact()
                .init();
            return None;
        }

        let appender = tracing_appender::rolling::daily(dir, filename);
        let (non_blocking, guard) = tracing_appender::non_blocking(appender);

        tracing_subscriber::registry()
            .with(EnvFilter::new(log_level))
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .with(fmt::layer().with_writer(non_blocking))
            .init();

        Some(guard)
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new(log_level))
            .with_writer(std::io::stderr)
            .compact()
            .init();
        None
    }
}
