//! Exclusive run lock next to the store file.
//!
//! Two runs appending to the same store could interleave lines and defeat the
//! membership check, so each run holds an advisory lock for its lifetime.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::error_handling::StoreError;

/// Holds an exclusive lock on `<store>.lock`; released on drop.
#[derive(Debug)]
pub struct StoreLock {
    _file: File,
    path: PathBuf,
}

impl StoreLock {
    /// Attempt to acquire the lock without blocking.
    pub fn acquire(store_path: &Path) -> Result<Self, StoreError> {
        let path = lock_path(store_path);
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|source| StoreError::Unavailable {
                    path: path.clone(),
                    source,
                })?;
            }
        }

        // Open without truncating so an existing lock holder is unaffected
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|source| StoreError::Unavailable {
                path: path.clone(),
                source,
            })?;

        file.try_lock_exclusive()
            .map_err(|_| StoreError::Locked(store_path.to_path_buf()))?;

        log::debug!("Acquired store lock {}", path.display());
        Ok(Self { _file: file, path })
    }

    /// The lock file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn lock_path(store_path: &Path) -> PathBuf {
    let mut name = store_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".lock");
    store_path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_lock_path_appends_suffix() {
        assert_eq!(
            lock_path(Path::new("data/ip_data.txt")),
            PathBuf::from("data/ip_data.txt.lock")
        );
    }

    #[test]
    fn test_second_lock_is_rejected_until_release() {
        let dir = TempDir::new().expect("temp dir");
        let store = dir.path().join("ip_data.txt");

        let first = StoreLock::acquire(&store).expect("first lock");
        let second = StoreLock::acquire(&store);
        assert!(matches!(second, Err(StoreError::Locked(_))));

        drop(first);
        let third = StoreLock::acquire(&store).expect("lock after release");
        assert!(third.path().ends_with("ip_data.txt.lock"));
    }
}
