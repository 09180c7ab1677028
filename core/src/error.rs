use std::io;
use std::path::Path;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SessionError>;

/// Failures the session coordinator surfaces to its caller.
///
/// Lock contention is deliberately absent: another process holding the
/// session lock is a normal outcome that degrades the session to read-only
/// mode instead of failing it. Only a lock *subsystem* failure (the lock file
/// cannot be created or locked for reasons other than contention) appears
/// here.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session lock at {path} failed: {source}")]
    Lock {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("session memory at {path} is not valid JSON: {source}")]
    MemoryParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to access session memory at {path}: {source}")]
    MemoryIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("collaborator {name} failed: {source}")]
    Collaborator {
        name: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl SessionError {
    pub(crate) fn lock(path: &Path, source: io::Error) -> Self {
        Self::Lock {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn memory_parse(path: &Path, source: serde_json::Error) -> Self {
        Self::MemoryParse {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn memory_io(path: &Path, source: io::Error) -> Self {
        Self::MemoryIo {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn collaborator(name: &'static str, source: anyhow::Error) -> Self {
        Self::Collaborator { name, source }
    }
}
