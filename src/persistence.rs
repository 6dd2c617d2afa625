//! In-memory implementation of the `AgentRepository` port.
//!
//! A `HashMap` behind a `tokio::sync::RwLock`: concurrent readers, one
//! writer, last write wins on the same key. Lock sections never span a git
//! call. Records survive only for the process lifetime — after a restart
//! the startup sweep reports any worktree directories left on disk.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::agent::Agent;
use crate::agent_id::AgentId;
use crate::error::WorktreeError;
use crate::ports::AgentRepository;

#[derive(Default)]
pub struct InMemoryAgentRepository {
    agents: RwLock<HashMap<String, Agent>>,
}

impl InMemoryAgentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AgentRepository for InMemoryAgentRepository {
    async fn save(&self, agent: &Agent) -> Result<(), WorktreeError> {
        self.agents
            .write()
            .await
            .insert(agent.id().to_string(), agent.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &AgentId) -> Result<Agent, WorktreeError> {
        self.agents
            .read()
            .await
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| WorktreeError::AgentNotFound(id.to_string()))
    }

    async fn exists(&self, id: &AgentId) -> Result<bool, WorktreeError> {
        Ok(self.agents.read().await.contains_key(id.as_str()))
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
