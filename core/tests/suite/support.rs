//! Recording collaborator doubles shared by the integration suite.

use std::path::Path;
use std::sync::Arc;
use std::sync::Mutex;

use anyhow::anyhow;
use async_trait::async_trait;
use repomind_core::Collaborators;
use repomind_core::ContextExplorer;
use repomind_core::PatchGenerator;
use repomind_core::RepositoryAnalyzer;
use repomind_core::SessionConfig;
use repomind_core::SessionCoordinator;

pub const EXPLORED_CONTEXT: &str = "explored context";
pub const GENERATED_PATCH: &str = "generated patch";

/// Invocation log shared between a session's collaborator doubles.
#[derive(Default)]
pub struct Calls {
    analyzed: Mutex<Vec<String>>,
    explored: Mutex<Vec<String>>,
    generated: Mutex<Vec<(String, String)>>,
}

impl Calls {
    pub fn analyzed(&self) -> Vec<String> {
        self.analyzed.lock().unwrap().clone()
    }

    pub fn explored(&self) -> Vec<String> {
        self.explored.lock().unwrap().clone()
    }

    pub fn generated(&self) -> Vec<(String, String)> {
        self.generated.lock().unwrap().clone()
    }
}

pub struct RecordingAnalyzer(pub Arc<Calls>);

#[async_trait]
impl RepositoryAnalyzer for RecordingAnalyzer {
    async fn analyze(&self, repo: &str) -> anyhow::Result<()> {
        self.0.analyzed.lock().unwrap().push(repo.to_string());
        Ok(())
    }
}

pub struct RecordingExplorer(pub Arc<Calls>);

#[async_trait]
impl ContextExplorer for RecordingExplorer {
    async fn explore(&self, query: &str) -> anyhow::Result<String> {
        self.0.explored.lock().unwrap().push(query.to_string());
        Ok(EXPLORED_CONTEXT.to_string())
    }
}

pub struct RecordingPatcher(pub Arc<Calls>);

#[async_trait]
impl PatchGenerator for RecordingPatcher {
    async fn generate(&self, context: &str, query: &str) -> anyhow::Result<String> {
        self.0
            .generated
            .lock()
            .unwrap()
            .push((context.to_string(), query.to_string()));
        Ok(GENERATED_PATCH.to_string())
    }
}

pub struct FailingExplorer;

#[async_trait]
impl ContextExplorer for FailingExplorer {
    async fn explore(&self, _query: &str) -> anyhow::Result<String> {
        Err(anyhow!("exploration backend unavailable"))
    }
}

pub struct FailingPatcher;

#[async_trait]
impl PatchGenerator for FailingPatcher {
    async fn generate(&self, _context: &str, _query: &str) -> anyhow::Result<String> {
        Err(anyhow!("patch backend unavailable"))
    }
}

pub fn recording_collaborators(calls: &Arc<Calls>) -> Collaborators {
    Collaborators {
        analyzer: Box::new(RecordingAnalyzer(calls.clone())),
        explorer: Box::new(RecordingExplorer(calls.clone())),
        patcher: Box::new(RecordingPatcher(calls.clone())),
    }
}

pub async fn spawn_session_with_config(
    config: SessionConfig,
) -> (SessionCoordinator, Arc<Calls>) {
    let calls = Arc::new(Calls::default());
    let hooks = calls.clone();
    let coordinator = SessionCoordinator::new(config, move |_context| {
        recording_collaborators(&hooks)
    })
    .await
    .expect("construct coordinator");
    (coordinator, calls)
}

pub async fn spawn_session(storage: &Path) -> (SessionCoordinator, Arc<Calls>) {
    spawn_session_with_config(SessionConfig::new(storage)).await
}
