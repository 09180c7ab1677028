use std::path::PathBuf;
use std::time::Duration;

/// Session identifier used when the embedder does not pick one. Doubles as
/// the `role` on every reply envelope.
pub const DEFAULT_SESSION_NAME: &str = "repomind";

const MEMORY_FILE_NAME: &str = "memory.json";
const LOCK_FILE_NAME: &str = "session.lock";
const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(1);

/// Configuration for one coordinator session.
///
/// Both backing artifacts live under `storage_dir`; two processes pointed at
/// the same directory share one logical session and contend for its write
/// role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub session_name: String,
    pub storage_dir: PathBuf,
    pub lock_timeout: Duration,
}

impl SessionConfig {
    pub fn new(storage_dir: impl Into<PathBuf>) -> Self {
        Self {
            session_name: DEFAULT_SESSION_NAME.to_string(),
            storage_dir: storage_dir.into(),
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
        }
    }

    pub fn with_session_name(mut self, name: impl Into<String>) -> Self {
        self.session_name = name.into();
        self
    }

    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    pub fn memory_path(&self) -> PathBuf {
        self.storage_dir.join(MEMORY_FILE_NAME)
    }

    pub fn lock_path(&self) -> PathBuf {
        self.storage_dir.join(LOCK_FILE_NAME)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new("storage")
    }
}
