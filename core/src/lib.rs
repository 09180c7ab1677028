//! Session coordination core of RepoMind, an interactive repository
//! assistant.
//!
//! The crate guarantees at most one writer to the shared session store across
//! concurrently started processes, persists session state across restarts,
//! and dispatches free-text requests to the analysis, exploration, and patch
//! collaborators. Collaborator internals live behind the traits in
//! [`collaborators`]; the conversational transport is the embedder's concern.

mod collaborators;
mod config;
mod coordinator;
mod error;
mod memory;
mod session_lock;

pub use collaborators::Collaborators;
pub use collaborators::ContextExplorer;
pub use collaborators::PatchGenerator;
pub use collaborators::RepositoryAnalyzer;
pub use collaborators::SessionContext;
pub use config::DEFAULT_SESSION_NAME;
pub use config::SessionConfig;
pub use coordinator::SessionCoordinator;
pub use error::Result;
pub use error::SessionError;
pub use memory::SessionMemory;
pub use memory::TARGET_REPO_KEY;
pub use session_lock::SessionLock;
