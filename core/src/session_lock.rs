//! Cross-process mutual exclusion for the session's write role.
//!
//! The lock is an advisory exclusive lock on a dedicated file. Contention is
//! an expected outcome: a coordinator that cannot obtain the lock within its
//! timeout keeps running in read-only mode rather than failing.

use std::fs::File;
use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;
use std::time::Instant;

use tracing::debug;
use tracing::warn;

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Exclusive lock on the session's lock artifact.
///
/// `acquire` never blocks past its timeout. The three outcomes are kept
/// distinct: held (`is_held() == true`), busy (`is_held() == false`, another
/// process owns the write role), and `Err` for lock subsystem failures, which
/// callers surface instead of treating as contention.
#[derive(Debug)]
pub struct SessionLock {
    path: PathBuf,
    file: Option<File>,
}

impl SessionLock {
    /// Attempt to take the write role within `timeout`.
    ///
    /// Polls a non-blocking exclusive lock until the deadline. A zero
    /// timeout performs exactly one attempt.
    pub async fn acquire(path: impl Into<PathBuf>, timeout: Duration) -> io::Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(&path)?;

        let deadline = Instant::now() + timeout;
        loop {
            match fs2::FileExt::try_lock_exclusive(&file) {
                Ok(()) => {
                    debug!("acquired session lock: {}", path.display());
                    return Ok(Self {
                        path,
                        file: Some(file),
                    });
                }
                Err(err) if is_contention(&err) => {
                    let remaining = deadline.saturating_duration_since(Instant::now());
                    if remaining.is_zero() {
                        return Ok(Self { path, file: None });
                    }
                    tokio::time::sleep(remaining.min(POLL_INTERVAL)).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Whether this instance owns the write role.
    pub fn is_held(&self) -> bool {
        self.file.is_some()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Relinquish the write role.
    ///
    /// A no-op when the lock was never acquired or was already released, so
    /// teardown paths can call it unconditionally.
    pub fn release(&mut self) {
        if let Some(file) = self.file.take() {
            if let Err(err) = fs2::FileExt::unlock(&file) {
                warn!(
                    "failed to unlock session lock at {}: {err}",
                    self.path.display()
                );
            }
            debug!("released session lock: {}", self.path.display());
        }
    }
}

impl Drop for SessionLock {
    fn drop(&mut self) {
        self.release();
    }
}

fn is_contention(err: &io::Error) -> bool {
    err.raw_os_error() == fs2::lock_contended_error().raw_os_error()
}
