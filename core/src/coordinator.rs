//! The session coordinator: owns the lock, the memory store, and the
//! collaborators, and routes every inbound request.

use repomind_protocol::AgentResponse;
use repomind_protocol::UserRequest;
use strum_macros::Display;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::collaborators::Collaborators;
use crate::collaborators::ContextExplorer;
use crate::collaborators::PatchGenerator;
use crate::collaborators::RepositoryAnalyzer;
use crate::collaborators::SessionContext;
use crate::config::SessionConfig;
use crate::error::Result;
use crate::error::SessionError;
use crate::memory::SessionMemory;
use crate::session_lock::SessionLock;

const INITIALIZE_COMMAND: &str = "initialize";
const QUESTION_MARKER: &str = "question";
const GENERATE_PATCH_MARKER: &str = "generate patch";

const INITIALIZED_REPLY: &str = "Initialization complete.";
const TARGET_PROMPT_REPLY: &str =
    "Please provide the repository to analyze: `initialize <repository-url>`.";
const FALLBACK_REPLY: &str = "I'm sorry, I didn't understand that request.";

/// Where the session is in its lifecycle. `Initializing` is not modeled as a
/// state: initialization runs synchronously inside one `handle` call, so no
/// second request can observe it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionPhase {
    Uninitialized,
    Ready,
}

/// What the dispatch state machine decided to do with a request.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
enum Intent {
    Initialize { target: Option<String> },
    Question,
    GeneratePatch,
    Unknown,
}

impl Intent {
    /// Fixed-priority keyword classification over the request text.
    ///
    /// The initialization command is an exact (case-insensitive) first word
    /// with the target riding behind it; the question marker outranks the
    /// patch marker when both appear.
    fn classify(content: &str) -> Self {
        let trimmed = content.trim();
        if trimmed.eq_ignore_ascii_case(INITIALIZE_COMMAND) {
            return Self::Initialize { target: None };
        }
        if let Some((first, rest)) = trimmed.split_once(char::is_whitespace)
            && first.eq_ignore_ascii_case(INITIALIZE_COMMAND)
        {
            let target = rest.trim();
            return Self::Initialize {
                target: (!target.is_empty()).then(|| target.to_string()),
            };
        }

        let lowered = trimmed.to_lowercase();
        if lowered.contains(QUESTION_MARKER) {
            Self::Question
        } else if lowered.contains(GENERATE_PATCH_MARKER) {
            Self::GeneratePatch
        } else {
            Self::Unknown
        }
    }
}

/// Coordinates one logical session of the repository assistant.
///
/// At most one coordinator across all processes sharing a storage directory
/// holds the write role; the rest degrade to read-only at construction and
/// keep serving requests from their loaded memory snapshot.
pub struct SessionCoordinator {
    name: String,
    phase: SessionPhase,
    read_only: bool,
    lock: SessionLock,
    memory: SessionMemory,
    analyzer: Box<dyn RepositoryAnalyzer>,
    explorer: Box<dyn ContextExplorer>,
    patcher: Box<dyn PatchGenerator>,
}

impl SessionCoordinator {
    /// Build a coordinator: take (or fail to take) the write role, load the
    /// memory snapshot, and construct the collaborators.
    ///
    /// Lock contention degrades the session to read-only; a lock subsystem
    /// failure or an unreadable/corrupt memory artifact is a construction
    /// error.
    pub async fn new<F>(config: SessionConfig, collaborators: F) -> Result<Self>
    where
        F: FnOnce(&SessionContext) -> Collaborators,
    {
        let lock_path = config.lock_path();
        let memory_path = config.memory_path();
        let SessionConfig {
            session_name,
            storage_dir,
            lock_timeout,
        } = config;

        let lock = SessionLock::acquire(&lock_path, lock_timeout)
            .await
            .map_err(|err| SessionError::lock(&lock_path, err))?;
        let read_only = !lock.is_held();
        if read_only {
            warn!("another session is active, starting in read-only mode");
        } else {
            info!("session started in write mode");
        }

        let memory = SessionMemory::load(memory_path).await?;

        let context = SessionContext {
            session_name: session_name.clone(),
            storage_dir,
            read_only,
        };
        let Collaborators {
            analyzer,
            explorer,
            patcher,
        } = collaborators(&context);

        Ok(Self {
            name: session_name,
            phase: SessionPhase::Uninitialized,
            read_only,
            lock,
            memory,
            analyzer,
            explorer,
            patcher,
        })
    }

    /// Handle one inbound request and produce the reply envelope.
    ///
    /// Requests are classified by keyword; question and patch requests are
    /// honored even before initialization, against the session memory as
    /// loaded.
    pub async fn handle(&mut self, request: UserRequest) -> Result<AgentResponse> {
        let intent = Intent::classify(&request.content);
        debug!(%intent, "dispatching request");
        match intent {
            Intent::Initialize { target } => self.initialize(target.as_deref()).await,
            Intent::Question => {
                let context = self.explore(&request.content).await?;
                Ok(self.reply(context))
            }
            Intent::GeneratePatch => {
                let context = self.explore(&request.content).await?;
                let patch = self
                    .patcher
                    .generate(&context, &request.content)
                    .await
                    .map_err(|err| SessionError::collaborator("PatchGenerator", err))?;
                Ok(self.reply(patch))
            }
            Intent::Unknown => Ok(self.reply(FALLBACK_REPLY)),
        }
    }

    /// Run the initialization step at most once per process lifetime.
    ///
    /// Records the target repository, flushes the store, and hands the target
    /// to the analyzer. Re-initialization returns the completion
    /// acknowledgment without re-analyzing or re-persisting.
    async fn initialize(&mut self, target: Option<&str>) -> Result<AgentResponse> {
        if self.phase == SessionPhase::Ready {
            return Ok(self.reply(INITIALIZED_REPLY));
        }
        let Some(target) = target else {
            return Ok(self.reply(TARGET_PROMPT_REPLY));
        };

        info!("welcome to RepoMind, initializing session for {target}");
        self.memory.set_target_repo(target);
        self.persist().await?;
        self.analyzer
            .analyze(target)
            .await
            .map_err(|err| SessionError::collaborator("RepoAnalyzer", err))?;
        info!("repository analysis complete");

        self.phase = SessionPhase::Ready;
        Ok(self.reply(INITIALIZED_REPLY))
    }

    /// Tear the session down: flush the store and give up the write role.
    ///
    /// Safe to call more than once; the lock is released exactly once and a
    /// never-acquired lock is never released.
    pub async fn shutdown(&mut self) -> Result<()> {
        self.persist().await?;
        self.lock.release();
        info!("session ended");
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn is_ready(&self) -> bool {
        self.phase == SessionPhase::Ready
    }

    pub fn memory(&self) -> &SessionMemory {
        &self.memory
    }

    async fn explore(&self, query: &str) -> Result<String> {
        self.explorer
            .explore(query)
            .await
            .map_err(|err| SessionError::collaborator("Explorer", err))
    }

    /// Memory flushes are gated on the write role: a read-only session keeps
    /// its mutations in memory and leaves the shared artifact to the writer.
    async fn persist(&self) -> Result<()> {
        if self.read_only {
            warn!("read-only session, skipping memory flush");
            return Ok(());
        }
        self.memory.save().await
    }

    fn reply(&self, content: impl Into<String>) -> AgentResponse {
        AgentResponse::new(self.name.clone(), content)
    }
}
