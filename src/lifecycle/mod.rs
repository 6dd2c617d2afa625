//! The two worktree lifecycle operations.
//!
//! `create` and `remove` never call each other; they share only the two
//! ports and the `Agent`/`AgentId` types. Each runs synchronously end to
//! end for one request — no internal parallelism, no retries.

pub mod create;
pub mod remove;

#[cfg(test)]
pub(crate) mod mocks;

pub use create::{CreateWorktree, CreateWorktreeRequest, CreateWorktreeResponse};
pub use remove::{RemoveWorktree, RemoveWorktreeRequest, RemoveWorktreeResponse};
