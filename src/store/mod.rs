//! Append-only record store.
//!
//! The store is a UTF-8 text file: a header row followed by one
//! comma-joined line per successful lookup. It is never rewritten; each
//! append opens the file, writes one complete line, and closes it, so a
//! crash loses at most the lookup in flight.
//!
//! The IP column of every data line is the membership index used to skip
//! addresses that were already looked up.

mod lock;
mod record;

use std::collections::HashSet;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::config::STORE_HEADER;
use crate::error_handling::StoreError;

pub use lock::StoreLock;
pub use record::{ip_column, EnrichmentRecord};

#[cfg(test)]
pub(crate) use record::tests::sample_record;

/// Result of reading the store.
#[derive(Debug, Default)]
pub struct StoreSnapshot {
    /// Every IP that already has a record
    pub existing_ips: HashSet<String>,
    /// Number of data lines (header and blank lines excluded)
    pub record_count: usize,
}

/// Handle to the persisted store file.
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    /// Handle for the store at `path`; nothing is opened yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The store file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes a header-only store when the file is missing or empty.
    ///
    /// Returns `true` when the header was written.
    pub fn ensure_exists(&self) -> Result<bool, StoreError> {
        match std::fs::metadata(&self.path) {
            Ok(meta) if meta.len() > 0 => return Ok(false),
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(self.unavailable(e)),
        }
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| self.unavailable(e))?;
            }
        }
        std::fs::write(&self.path, format!("{STORE_HEADER}\n")).map_err(|e| self.unavailable(e))?;
        info!("Created new store at {}", self.path.display());
        Ok(true)
    }

    /// Reads the store and builds the membership set.
    ///
    /// The first line is treated as a header regardless of its content.
    pub fn load(&self) -> Result<StoreSnapshot, StoreError> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| self.unavailable(e))?;

        let mut snapshot = StoreSnapshot::default();
        for line in content.lines().skip(1) {
            if line.trim().is_empty() {
                continue;
            }
            snapshot.record_count += 1;
            if let Some(ip) = ip_column(line) {
                snapshot.existing_ips.insert(ip.to_string());
            } else {
                debug!("Store line without IP column: {line}");
            }
        }

        info!(
            "Loaded {} records ({} distinct IPs) from {}",
            snapshot.record_count,
            snapshot.existing_ips.len(),
            self.path.display()
        );
        Ok(snapshot)
    }

    /// Appends one record as a single line.
    ///
    /// An empty file gets the header first, so the record is never read
    /// back as the header row.
    pub fn append(&self, ip: &str, record: &EnrichmentRecord) -> Result<(), StoreError> {
        let mut line = record.to_line(ip);
        line.push('\n');

        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .map_err(|e| self.unavailable(e))?;

        line.insert_str(0, &append_prefix(&self.path)?);

        file.write_all(line.as_bytes())
            .map_err(|e| self.unavailable(e))?;
        file.flush().map_err(|e| self.unavailable(e))?;
        debug!("Appended record for {ip} to {}", self.path.display());
        Ok(())
    }

    fn unavailable(&self, source: std::io::Error) -> StoreError {
        StoreError::Unavailable {
            path: self.path.clone(),
            source,
        }
    }
}

/// Text that must precede the next appended line.
fn append_prefix(path: &Path) -> Result<String, StoreError> {
    use std::io::{Read, Seek, SeekFrom};

    let mut file = std::fs::File::open(path).map_err(|source| StoreError::Unavailable {
        path: path.to_path_buf(),
        source,
    })?;
    let len = file
        .metadata()
        .map_err(|source| StoreError::Unavailable {
            path: path.to_path_buf(),
            source,
        })?
        .len();
    if len == 0 {
        return Ok(format!("{STORE_HEADER}\n"));
    }
    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1))
        .and_then(|_| file.read_exact(&mut last))
        .map_err(|source| StoreError::Unavailable {
            path: path.to_path_buf(),
            source,
        })?;
    // A store without a trailing newline would glue this record onto the last line
    if last[0] != b'\n' {
        Ok("\n".to_string())
    } else {
        Ok(String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> RecordStore {
        RecordStore::new(dir.path().join("ip_data.txt"))
    }

    #[test]
    fn test_load_missing_store_is_unavailable() {
        let dir = TempDir::new().expect("temp dir");
        let result = store_in(&dir).load();
        assert!(matches!(result, Err(StoreError::Unavailable { .. })));
    }

    #[test]
    fn test_ensure_exists_writes_header_once() {
        let dir = TempDir::new().expect("temp dir");
        let store = store_in(&dir);
        assert!(store.ensure_exists().expect("create"));
        assert!(!store.ensure_exists().expect("second call"));

        let content = std::fs::read_to_string(store.path()).expect("read");
        assert_eq!(content, format!("{STORE_HEADER}\n"));
        let snapshot = store.load().expect("load");
        assert_eq!(snapshot.record_count, 0);
        assert!(snapshot.existing_ips.is_empty());
    }

    #[test]
    fn test_ensure_exists_fills_empty_file_with_header() {
        let dir = TempDir::new().expect("temp dir");
        let store = store_in(&dir);
        std::fs::write(store.path(), "").expect("write");

        assert!(store.ensure_exists().expect("header written"));
        assert_eq!(
            std::fs::read_to_string(store.path()).expect("read"),
            format!("{STORE_HEADER}\n")
        );
    }

    #[test]
    fn test_append_to_empty_file_keeps_first_record() {
        let dir = TempDir::new().expect("temp dir");
        let store = store_in(&dir);
        std::fs::write(store.path(), "").expect("write");

        store
            .append("8.8.8.8", &sample_record("8.8.8.8"))
            .expect("append");

        let content = std::fs::read_to_string(store.path()).expect("read");
        assert_eq!(content.lines().next(), Some(STORE_HEADER));
        let snapshot = store.load().expect("load");
        assert_eq!(snapshot.record_count, 1);
        assert!(snapshot.existing_ips.contains("8.8.8.8"));
    }

    #[test]
    fn test_load_reads_ip_column_and_skips_header() {
        let dir = TempDir::new().expect("temp dir");
        let store = store_in(&dir);
        std::fs::write(
            store.path(),
            "timestamp,ipAddress,rest\n\
             2024-01-01 00:00:00,1.1.1.1,True\n\
             \n\
             2024-01-02 00:00:00,9.9.9.9,False\n\
             2024-01-03 00:00:00,1.1.1.1,True\n",
        )
        .expect("write");

        let snapshot = store.load().expect("load");
        assert_eq!(snapshot.record_count, 3);
        assert_eq!(snapshot.existing_ips.len(), 2);
        assert!(snapshot.existing_ips.contains("1.1.1.1"));
        assert!(snapshot.existing_ips.contains("9.9.9.9"));
        // Header column value never becomes a member
        assert!(!snapshot.existing_ips.contains("ipAddress"));
    }

    #[test]
    fn test_append_preserves_prior_content() {
        let dir = TempDir::new().expect("temp dir");
        let store = store_in(&dir);
        store.ensure_exists().expect("create");

        store
            .append("8.8.8.8", &sample_record("8.8.8.8"))
            .expect("append first");
        store
            .append("1.0.0.1", &sample_record("1.0.0.1"))
            .expect("append second");

        let content = std::fs::read_to_string(store.path()).expect("read");
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], STORE_HEADER);
        assert_eq!(ip_column(lines[1]), Some("8.8.8.8"));
        assert_eq!(ip_column(lines[2]), Some("1.0.0.1"));
    }

    #[test]
    fn test_append_after_missing_trailing_newline() {
        let dir = TempDir::new().expect("temp dir");
        let store = store_in(&dir);
        std::fs::write(store.path(), "header\nts,1.1.1.1,x").expect("write");

        store
            .append("2.2.2.2", &sample_record("2.2.2.2"))
            .expect("append");

        let snapshot = store.load().expect("load");
        assert_eq!(snapshot.record_count, 2);
        assert!(snapshot.existing_ips.contains("1.1.1.1"));
        assert!(snapshot.existing_ips.contains("2.2.2.2"));
    }
}
