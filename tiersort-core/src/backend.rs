//! Key-value media the item store can sit on.
//!
//! `MemoryStore` is "session" storage and lives only as long as the process.
//! `FileStore` is "local" storage: a JSON object of string keys to string
//! values, rewritten through a temp file and rename after every mutation or
//! batch of mutations.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::StoreError;

/// One write in a batch handed to [`KeyValueStore::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Set { key: String, value: String },
    Remove { key: String },
}

/// Read/write/iterate contract over string keys and string values.
pub trait KeyValueStore {
    /// Snapshot of every key currently present.
    fn keys(&self) -> Vec<String>;

    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;

    /// Apply `batch` in order. Stores that persist may write once per batch.
    fn apply(&mut self, batch: Vec<Mutation>) -> Result<(), StoreError> {
        for mutation in batch {
            match mutation {
                Mutation::Set { key, value } => self.set(&key, &value)?,
                Mutation::Remove { key } => self.remove(&key)?,
            }
        }
        Ok(())
    }

    fn len(&self) -> usize {
        self.keys().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    map: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn keys(&self) -> Vec<String> {
        self.map.keys().cloned().collect()
    }

    fn get(&self, key: &str) -> Option<String> {
        self.map.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.map.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.map.remove(key);
        Ok(())
    }

    fn len(&self) -> usize {
        self.map.len()
    }
}

#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    map: BTreeMap<String, String>,
}

impl FileStore {
    /// Open the store at `path`, starting empty if the file does not exist yet.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let map = match fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => serde_json::from_str(&content).map_err(|e| StoreError::Format {
                path: path.clone(),
                source: e,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(StoreError::Io {
                    operation: "read",
                    path,
                    source: e,
                })
            }
        };
        tracing::debug!("Opened {} with {} records", path.display(), map.len());
        Ok(FileStore { path, map })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StoreError::Io {
                operation: "create directory for",
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let temp_path = self.path.with_extension("json.tmp");
        let bytes = serde_json::to_vec_pretty(&self.map).map_err(|e| StoreError::Format {
            path: self.path.clone(),
            source: e,
        })?;

        let mut file = File::create(&temp_path).map_err(|e| StoreError::Io {
            operation: "create",
            path: temp_path.clone(),
            source: e,
        })?;
        file.write_all(&bytes).map_err(|e| StoreError::Io {
            operation: "write",
            path: temp_path.clone(),
            source: e,
        })?;
        file.sync_all().map_err(|e| StoreError::Io {
            operation: "sync",
            path: temp_path.clone(),
            source: e,
        })?;

        fs::rename(&temp_path, &self.path).map_err(|e| StoreError::Io {
            operation: "replace",
            path: self.path.clone(),
            source: e,
        })
    }
}

impl KeyValueStore for FileStore {
    fn keys(&self) -> Vec<String> {
        self.map.keys().cloned().collect()
    }

    fn get(&self, key: &str) -> Option<String> {
        self.map.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.map.insert(key.to_string(), value.to_string());
        self.persist()
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        if self.map.remove(key).is_some() {
            self.persist()?;
        }
        Ok(())
    }

    fn apply(&mut self, batch: Vec<Mutation>) -> Result<(), StoreError> {
        let mut changed = false;
        for mutation in batch {
            changed |= match mutation {
                Mutation::Set { key, value } => self.map.insert(key, value.clone()) != Some(value),
                Mutation::Remove { key } => self.map.remove(&key).is_some(),
            };
        }
        if changed {
            self.persist()?;
        }
        Ok(())
    }

    fn len(&self) -> usize {
        self.map.len()
    }
}
