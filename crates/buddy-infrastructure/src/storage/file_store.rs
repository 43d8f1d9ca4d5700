//! File-backed key-value store with atomic writes.

use std::fs::{self, File};
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};

use buddy_core::error::{BuddyError, Result};
use buddy_core::storage::KeyValueStore;

/// Stores each key as `<dir>/<key>.json`.
///
/// Provides:
/// - **Atomicity**: Updates are all-or-nothing via tmp file + atomic rename
/// - **Durability**: Explicit fsync before rename
///
/// A missing or blank file reads as "absent".
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the file backing `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    fn temp_path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!(".{}.json.tmp", key))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path).map_err(|e| {
            BuddyError::io(format!("Failed to read {}: {}", path.display(), e))
        })?;

        if content.trim().is_empty() {
            return Ok(None);
        }

        Ok(Some(content))
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        // Ensure parent directory exists
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
        }

        // Write to temporary file in the same directory
        let tmp_path = self.temp_path_for(key);
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(value.as_bytes())?;

        // Ensure data is written to disk
        tmp_file.sync_all()?;
        drop(tmp_file);

        // Atomic rename
        let path = self.path_for(key);
        fs::rename(&tmp_path, &path).map_err(|e| {
            BuddyError::io(format!("Failed to replace {}: {}", path.display(), e))
        })?;

        tracing::debug!("[FileKeyValueStore] Wrote {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_absent() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::new(temp_dir.path());
        assert!(store.load("ai-buddies").unwrap().is_none());
    }

    #[test]
    fn test_blank_file_is_absent() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::new(temp_dir.path());
        fs::write(store.path_for("ai-buddies"), "  \n").unwrap();
        assert!(store.load("ai-buddies").unwrap().is_none());
    }

    #[test]
    fn test_save_creates_directory_and_replaces() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::new(temp_dir.path().join("nested"));

        store.save("ai-buddies", "[1]").unwrap();
        store.save("ai-buddies", "[2]").unwrap();

        assert_eq!(store.load("ai-buddies").unwrap().as_deref(), Some("[2]"));
        assert!(!store.temp_path_for("ai-buddies").exists());
    }
}
