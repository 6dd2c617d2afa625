//! Runtime configuration.
//!
//! Defaults < optional `worktreed.toml` < CLI flags / environment. The
//! worktree root is not configurable: worktrees always live under
//! `<repo_root>/.worktrees/`.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use serde::{Deserialize, Serialize};

const DEFAULT_BASE_BRANCH: &str = "main";
const DEFAULT_LOG: &str = "info";

/// Directory under the repository root that holds all agent worktrees.
pub const WORKTREE_DIR: &str = ".worktrees";

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WorktreedConfig {
    /// Path to the managed git repository. `None` falls back to the
    /// current directory.
    pub repo_root: Option<PathBuf>,
    /// Branch unpushed commits are counted against.
    pub base_branch: String,
    /// Log level filter (tracing `EnvFilter` syntax).
    pub log: String,
    /// Optional log file (rotated daily).
    pub log_file: Option<PathBuf>,
}

impl Default for WorktreedConfig {
    fn default() -> Self {
        Self {
            repo_root: None,
            base_branch: DEFAULT_BASE_BRANCH.to_string(),
            log: DEFAULT_LOG.to_string(),
            log_file: None,
        }
    }
}

impl WorktreedConfig {
    /// Load from a TOML file, or defaults when `path` is `None` or the
    /// file does not exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("parsing config file {}", path.display()))
    }

    /// Resolve the repository root: explicit config, else the current
    /// directory.
    pub fn resolve_repo_root(&self) -> Result<PathBuf> {
        match &self.repo_root {
            Some(root) => Ok(root.clone()),
            None => std::env::current_dir().context("resolving current directory"),
        }
    }

    pub fn worktree_root(repo_root: &Path) -> PathBuf {
        repo_root.join(WORKTREE_DIR)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
