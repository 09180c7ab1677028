//! Contracts for the coordinator's external collaborators.
//!
//! The coordinator delegates all heavy work: repository analysis at
//! initialization, context exploration for questions, and patch synthesis.
//! Each collaborator is constructed once, when the coordinator is built, and
//! held for the coordinator's entire lifetime. Calls are stateless from the
//! coordinator's point of view; any memoization lives inside the
//! collaborator.

use std::path::PathBuf;

use async_trait::async_trait;

/// Shared session facts handed to collaborator constructors.
///
/// Collaborators get this snapshot instead of a reference back into the
/// coordinator, so there is no shared mutable state across the seam.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub session_name: String,
    pub storage_dir: PathBuf,
    /// Whether the session failed to obtain the write role. Collaborators
    /// that keep their own durable state can use this to avoid clobbering a
    /// concurrent writer's files.
    pub read_only: bool,
}

/// Analyzes the target repository during session initialization.
///
/// Side-effecting only: results land in the analyzer's own store, not the
/// coordinator's memory.
#[async_trait]
pub trait RepositoryAnalyzer: Send + Sync {
    async fn analyze(&self, repo: &str) -> anyhow::Result<()>;
}

/// Explores code context to answer a free-text query.
#[async_trait]
pub trait ContextExplorer: Send + Sync {
    async fn explore(&self, query: &str) -> anyhow::Result<String>;
}

/// Synthesizes a patch from previously explored context.
#[async_trait]
pub trait PatchGenerator: Send + Sync {
    async fn generate(&self, context: &str, query: &str) -> anyhow::Result<String>;
}

/// The full collaborator set a coordinator owns.
pub struct Collaborators {
    pub analyzer: Box<dyn RepositoryAnalyzer>,
    pub explorer: Box<dyn ContextExplorer>,
    pub patcher: Box<dyn PatchGenerator>,
}
