//! Durable key/value state backing one session.
//!
//! The backing artifact is a single JSON object with an open schema: readers
//! must tolerate keys they do not know about so future initialization steps
//! can add entries without invalidating existing sessions.

use std::io;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use serde_json::Map;
use serde_json::Value;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::Result;
use crate::error::SessionError;

/// Key under which the target repository identifier is recorded.
pub const TARGET_REPO_KEY: &str = "target_repo";

/// In-memory view of the session's persistent mapping.
///
/// Mutations are not flushed automatically; the coordinator decides when to
/// call [`SessionMemory::save`], so between a mutation and the next save the
/// on-disk artifact may lag behind.
#[derive(Debug)]
pub struct SessionMemory {
    path: PathBuf,
    entries: Map<String, Value>,
}

impl SessionMemory {
    /// Load the mapping from `path`.
    ///
    /// A missing artifact bootstraps an empty mapping. An artifact that
    /// exists but does not parse as a JSON object is a construction error,
    /// never an empty mapping.
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = match tokio::fs::read_to_string(&path).await {
            Ok(text) => serde_json::from_str::<Map<String, Value>>(&text)
                .map_err(|err| SessionError::memory_parse(&path, err))?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!("no session memory at {}, starting empty", path.display());
                Map::new()
            }
            Err(err) => return Err(SessionError::memory_io(&path, err)),
        };
        Ok(Self { path, entries })
    }

    /// Serialize the full mapping and replace the backing artifact.
    ///
    /// The write goes to a temporary file in the artifact's directory which
    /// is then renamed over the artifact, so a crash mid-save leaves the
    /// previous contents intact.
    pub async fn save(&self) -> Result<()> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent).map_err(|err| SessionError::memory_io(&self.path, err))?;

        let json = serde_json::to_string(&self.entries)
            .map_err(|err| SessionError::memory_io(&self.path, io::Error::other(err)))?;

        let mut tmp =
            NamedTempFile::new_in(parent).map_err(|err| SessionError::memory_io(&self.path, err))?;
        tmp.write_all(json.as_bytes())
            .map_err(|err| SessionError::memory_io(&self.path, err))?;
        tmp.persist(&self.path)
            .map_err(|err| SessionError::memory_io(&self.path, err.error))?;

        debug!(
            "flushed {} session memory entries to {}",
            self.entries.len(),
            self.path.display()
        );
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.entries.insert(key.into(), value)
    }

    pub fn target_repo(&self) -> Option<&str> {
        self.get(TARGET_REPO_KEY).and_then(Value::as_str)
    }

    pub fn set_target_repo(&mut self, repo: &str) {
        self.entries
            .insert(TARGET_REPO_KEY.to_string(), Value::String(repo.to_string()));
    }

    pub fn entries(&self) -> &Map<String, Value> {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
