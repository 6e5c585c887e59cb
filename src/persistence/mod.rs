//! Settings persistence
//!
//! Features:
//! - In-memory store for tests and headless runs
//! - JSON file store (flat string map)
//! - Write-through with tmp → rename so a crash never leaves half a file

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::StoreError;
use crate::platform::SettingsStore;

/// Volatile store backed by a map
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }
}

impl SettingsStore for MemoryStore {
    fn get_setting(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set_setting(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store persisted as a JSON object of strings
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Open a store. A missing file starts empty; a corrupt one is an error.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let values = match std::fs::read_to_string(&path) {
            Ok(json) => serde_json::from_str(&json)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No settings at {}, starting fresh", path.display());
                BTreeMap::new()
            }
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&self.values)?;
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl SettingsStore for JsonFileStore {
    fn get_setting(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set_setting(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value.to_string());
        self.flush()
    }
}
