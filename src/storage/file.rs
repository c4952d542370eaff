//! JSON file storage backend
//!
//! Keeps all keys in one JSON object on disk. Every write rewrites the file
//! through a temporary sibling and a rename.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::StoragePort;
use crate::error::{ShellError, ShellResult};

/// Key/value storage persisted as a JSON object
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> ShellResult<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&content).map_err(|e| {
            ShellError::Storage(format!("Corrupt state file {:?}: {}", self.path, e))
        })
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> ShellResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| ShellError::Storage(e.to_string()))?;

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl StoragePort for FileStorage {
    fn get(&self, key: &str) -> ShellResult<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> ShellResult<()> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }

    /// All keys land in a single rewrite of the file
    fn set_all(&self, entries: &[(&str, &str)]) -> ShellResult<()> {
        let mut stored = self.read_all()?;
        for (key, value) in entries {
            stored.insert(key.to_string(), value.to_string());
        }
        self.write_all(&stored)
    }

    fn clear(&self, key: &str) -> ShellResult<()> {
        let mut entries = self.read_all()?;
        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}
