//! Key-value storage behind the wizard's persisted session.
//!
//! The store never touches the filesystem directly; it goes through
//! [`WizardStorage`] so tests can swap in [`MemoryStorage`]. The
//! production backend keeps one JSON file per key under the data
//! directory.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Minimal string key-value interface. Values are JSON documents; the
/// caller owns serialization.
pub trait WizardStorage: Send {
    /// Returns the stored value, or `None` when the key is absent or the
    /// backend cannot read it.
    fn read(&self, key: &str) -> Option<String>;

    fn write(&mut self, key: &str, value: &str) -> Result<()>;

    /// Removing an absent key is not an error.
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// One file per key under a root directory.
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl WizardStorage for FileStorage {
    fn read(&self, key: &str) -> Option<String> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Some(contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!("Failed to read {}: {}", path.display(), e);
                None
            }
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.root)
            .with_context(|| format!("Failed to create {}", self.root.display()))?;
        let path = self.path_for(key);
        fs::write(&path, value).with_context(|| format!("Failed to write {}", path.display()))
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("Failed to remove {}", path.display())),
        }
    }
}

/// In-memory backend for tests.
#[derive(Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an entry, e.g. a corrupt one.
    pub fn with_entry(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}

impl WizardStorage for MemoryStorage {
    fn read(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_storage_round_trip() {
        let dir = TempDir::new().unwrap();
        let mut storage = FileStorage::new(dir.path().to_path_buf());

        assert!(storage.read("candidash_wizard_1").is_none());

        storage.write("candidash_wizard_1", r#"{"a": 1}"#).unwrap();
        assert_eq!(
            storage.read("candidash_wizard_1").unwrap(),
            r#"{"a": 1}"#
        );

        storage.remove("candidash_wizard_1").unwrap();
        assert!(storage.read("candidash_wizard_1").is_none());
    }

    #[test]
    fn test_file_storage_creates_root_on_write() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("nested").join("wizard");
        let mut storage = FileStorage::new(root.clone());

        storage.write("k", "v").unwrap();
        assert!(root.join("k.json").exists());
    }

    #[test]
    fn test_file_storage_remove_missing_is_ok() {
        let dir = TempDir::new().unwrap();
        let mut storage = FileStorage::new(dir.path().to_path_buf());
        storage.remove("never_written").unwrap();
    }

    #[test]
    fn test_memory_storage_round_trip() {
        let mut storage = MemoryStorage::new();
        storage.write("k", "v").unwrap();
        assert_eq!(storage.read("k").unwrap(), "v");
        assert!(storage.contains("k"));

        storage.remove("k").unwrap();
        assert!(storage.read("k").is_none());
    }
}
