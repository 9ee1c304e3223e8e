//! String key/value stores standing in for browser local storage.
//!
//! `KeyValueStore` is the seam the contact form writes its draft through:
//! - `MemoryStore` keeps entries in a `HashMap` for the lifetime of the value.
//! - `FileStore` keeps one `<key>.json` file per key under a root directory, so a
//!   draft survives process restarts the way local storage survives a reload.

use log::debug;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::BrokerError;

/// Minimal string key/value storage.
pub trait KeyValueStore {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, BrokerError>;
    /// Stores `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<(), BrokerError>;
    /// Removes `key`. Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), BrokerError>;
}

/// In-memory store.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `key` is currently present.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, BrokerError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), BrokerError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), BrokerError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Directory-backed store, one file per key.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Opens (and creates if needed) a store rooted at `root`.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, BrokerError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Path of the file backing `key`.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, BrokerError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(BrokerError::Format(format!("invalid storage key: {:?}", key)));
        }
        Ok(self.root.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, BrokerError> {
        match fs::read_to_string(self.path_for(key)?) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(BrokerError::Io(e)),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), BrokerError> {
        let path = self.path_for(key)?;
        // Write then rename so a reader never sees a half-written file.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        debug!("Stored {} ({} bytes)", path.display(), value.len());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), BrokerError> {
        match fs::remove_file(self.path_for(key)?) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(BrokerError::Io(e)),
        }
    }
}
