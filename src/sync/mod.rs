//! Remote synchronization of the store.
//!
//! The remote is the authoritative copy before a run (pulled over the
//! local file) and receives the local file after it (force-pushed). The
//! pipeline is assumed to be the only writer, so the last push wins.

mod github;

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error_handling::SyncError;
use crate::store::RecordStore;

pub use github::GitHubRemote;

/// Pull/push contract for the store.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Replaces `local_path` with the latest remote content and returns it.
    async fn pull(&self, local_path: &Path) -> Result<PathBuf, SyncError>;

    /// Publishes `local_path`, overwriting the remote copy.
    async fn push(&self, local_path: &Path) -> Result<(), SyncError>;
}

/// Sync disabled: the local file is the only copy.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalOnly;

#[async_trait]
impl RemoteStore for LocalOnly {
    async fn pull(&self, local_path: &Path) -> Result<PathBuf, SyncError> {
        RecordStore::new(local_path)
            .ensure_exists()
            .map_err(|e| SyncError::Save {
                path: local_path.to_path_buf(),
                source: std::io::Error::other(e.to_string()),
            })?;
        Ok(local_path.to_path_buf())
    }

    async fn push(&self, local_path: &Path) -> Result<(), SyncError> {
        log::debug!("Sync disabled, not pushing {}", local_path.display());
        Ok(())
    }
}
