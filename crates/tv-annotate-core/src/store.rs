//! Durable JSON document store behind the exclusion rules and the rolling
//! program window. The filesystem implementation is the default deployment;
//! object-storage backends plug in behind the same trait.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("store serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// A flat namespace of JSON documents addressed by file name.
///
/// `write` must be durable before it returns: callers immediately re-query
/// expecting to see their own writes.
pub trait DocumentStore: Send + Sync {
    fn read(&self, name: &str) -> Result<Option<String>, StoreError>;
    fn write(&self, name: &str, content: &str) -> Result<(), StoreError>;
    fn exists(&self, name: &str) -> bool;
    fn delete(&self, name: &str) -> Result<(), StoreError>;
    /// Names of all JSON documents in the store.
    fn list(&self) -> Result<Vec<String>, StoreError>;
}

pub fn read_json<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    name: &str,
) -> Result<Option<T>, StoreError> {
    match store.read(name)? {
        Some(content) => Ok(Some(serde_json::from_str(&content)?)),
        None => Ok(None),
    }
}

pub fn write_json<T: Serialize>(
    store: &dyn DocumentStore,
    name: &str,
    value: &T,
) -> Result<(), StoreError> {
    let content = serde_json::to_string_pretty(value)?;
    store.write(name, &content)
}

/// Local filesystem store rooted at one directory.
#[derive(Debug, Clone)]
pub struct FsDocumentStore {
    root: PathBuf,
}

impl FsDocumentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

impl DocumentStore for FsDocumentStore {
    fn read(&self, name: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(name);
        if !path.exists() {
            debug!("store miss: {}", name);
            return Ok(None);
        }
        Ok(Some(std::fs::read_to_string(&path)?))
    }

    fn write(&self, name: &str, content: &str) -> Result<(), StoreError> {
        let path = self.path_for(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, content)?;
        debug!("store write: {} ({} bytes)", name, content.len());
        Ok(())
    }

    fn exists(&self, name: &str) -> bool {
        self.path_for(name).exists()
    }

    fn delete(&self, name: &str) -> Result<(), StoreError> {
        std::fs::remove_file(self.path_for(name))?;
        Ok(())
    }

    fn list(&self) -> Result<Vec<String>, StoreError> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if name.ends_with(".json") {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }
}
