//! API key persistence.
//!
//! The key lives in a single file whose entire contents are the raw key.
//! Reads and writes go straight to the file system; concurrent writers
//! race and the last write wins.

use std::io;
use std::path::{Path, PathBuf};

/// File-backed store for the dashboard's API key.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    /// Creates a store backed by `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the credential file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the stored key.
    ///
    /// Returns `None` if the file is missing or unreadable.
    pub async fn load(&self) -> Option<String> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(key) => Some(key),
            Err(e) => {
                tracing::debug!(path = %self.path.display(), error = %e, "no credential file");
                None
            }
        }
    }

    /// Replaces the stored key.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if the file cannot be written.
    pub async fn save(&self, key: &str) -> io::Result<()> {
        tokio::fs::write(&self.path, key).await
    }
}
