use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::PreferenceStore;
use crate::core::error::Result;

/// Preferences persisted as one JSON object on disk.
///
/// The file is read once on open and rewritten on every `set`.
#[derive(Debug)]
pub struct JsonFilePreferenceStore {
    path: PathBuf,
    values: RwLock<Map<String, Value>>,
}

impl JsonFilePreferenceStore {
    /// Open the store at `path`. A missing file starts empty, a corrupt one is
    /// logged and replaced on the next write.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match Self::load(&path) {
            Ok(values) => values,
            Err(e) => {
                warn!(
                    "Discarding unreadable preferences at {}: {}",
                    path.display(),
                    e
                );
                Map::new()
            }
        };

        debug!(
            "Opened preference store {} ({} keys)",
            path.display(),
            values.len()
        );

        Self {
            path,
            values: RwLock::new(values),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(path: &Path) -> Result<Map<String, Value>> {
        if !path.exists() {
            return Ok(Map::new());
        }

        let raw = std::fs::read_to_string(path)?;
        if raw.trim().is_empty() {
            return Ok(Map::new());
        }

        Ok(serde_json::from_str(&raw)?)
    }

    fn persist(&self, values: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // Write beside the target then rename, so readers never see half a file
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_vec_pretty(values)?)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl PreferenceStore for JsonFilePreferenceStore {
    fn get(&self, key: &str) -> Option<Value> {
        let values = self.values.read().unwrap_or_else(|e| e.into_inner());
        values.get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) -> Result<()> {
        let mut values = self.values.write().unwrap_or_else(|e| e.into_inner());
        values.insert(key.to_string(), value);
        self.persist(&values)
    }

    fn snapshot(&self) -> Map<String, Value> {
        let values = self.values.read().unwrap_or_else(|e| e.into_inner());
        values.clone()
    }
}

/// Non-persistent store for tests and hosts without a preference file
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    values: RwLock<Map<String, Value>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values(values: Map<String, Value>) -> Self {
        Self {
            values: RwLock::new(values),
        }
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Option<Value> {
        let values = self.values.read().unwrap_or_else(|e| e.into_inner());
        values.get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) -> Result<()> {
        let mut values = self.values.write().unwrap_or_else(|e| e.into_inner());
        values.insert(key.to_string(), value);
        Ok(())
    }

    fn snapshot(&self) -> Map<String, Value> {
        let values = self.values.read().unwrap_or_else(|e| e.into_inner());
        values.clone()
    }
}
