//! Validated agent identifier.
//!
//! An `AgentId` names the logical consumer a worktree is provisioned for.
//! The id deterministically derives both the branch name and the worktree
//! directory name, so a directory listing under the worktree root maps
//! one-to-one onto branches.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::error::WorktreeError;

/// Lowercase alphanumerics separated by single hyphens. No leading,
/// trailing, or doubled hyphens; never empty.
static AGENT_ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").expect("agent id pattern compiles"));

/// Prefix shared by agent branch names and worktree directory names.
const AGENT_PREFIX: &str = "agent-";

// ─── AgentId ─────────────────────────────────────────────────────────────────

/// A validated, immutable agent identifier.
///
/// Construction goes through [`AgentId::parse`]; a value that exists is
/// guaranteed to match the id pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct AgentId(String);

impl AgentId {
    /// Parse and validate a raw identifier string.
    pub fn parse(raw: &str) -> Result<Self, WorktreeError> {
        if AGENT_ID_PATTERN.is_match(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(WorktreeError::InvalidAgentId { id: raw.to_string() })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Branch checked out in the agent's worktree: `agent-<id>`.
    pub fn branch_name(&self) -> String {
        format!("{AGENT_PREFIX}{}", self.0)
    }

    /// Directory name under the worktree root: `agent-<id>`.
    ///
    /// Kept identical to the branch name.
    pub fn worktree_dir_name(&self) -> String {
        format!("{AGENT_PREFIX}{}", self.0)
    }

    /// Reverse of [`AgentId::worktree_dir_name`]: recover the id from a
    /// directory name. Returns `None` for names that do not follow the
    /// `agent-<id>` convention. Used by the startup orphan sweep.
    pub fn from_worktree_dir_name(name: &str) -> Option<Self> {
        let raw = name.strip_prefix(AGENT_PREFIX)?;
        Self::parse(raw).ok()
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
