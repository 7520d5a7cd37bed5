//! Persistent key-value storage handed to the plugin by its host.
//!
//! `MemoryStore` keeps values for the lifetime of the process; `JsonFileStore`
//! persists them as a single JSON object so they survive restarts.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::{DnsUtilsError, Result};

/// Per-plugin key-value store with explicit sync.
pub trait KvStore: Send + Sync {
    fn get(&self, key: &str) -> Option<Value>;
    fn set(&mut self, key: &str, value: Value);
    /// Flush pending writes to durable storage.
    fn sync(&mut self) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    data: BTreeMap<String, Value>,
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.data.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) {
        self.data.insert(key.to_string(), value);
    }

    fn sync(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Store backed by a JSON object file.
///
/// Values are held in memory and written out on `sync()`. A missing file is
/// an empty store.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    data: BTreeMap<String, Value>,
    dirty: bool,
}

impl JsonFileStore {
    /// Open (or lazily create) the store at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let data = match std::fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => serde_json::from_str(&content)
                .map_err(|e| DnsUtilsError::Store(path.clone(), format!("invalid JSON: {}", e)))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(DnsUtilsError::Store(path, e.to_string())),
        };
        Ok(Self {
            path,
            data,
            dirty: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KvStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.data.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) {
        self.data.insert(key.to_string(), value);
        self.dirty = true;
    }

    fn sync(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }
        let store_err = |e: std::io::Error| DnsUtilsError::Store(self.path.clone(), e.to_string());

        let content = serde_json::to_string_pretty(&self.data)
            .map_err(|e| DnsUtilsError::Store(self.path.clone(), e.to_string()))?;

        // Write next to the target and rename so readers never see a partial file.
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(store_err)?;
        }
        std::fs::write(&tmp, content).map_err(store_err)?;
        std::fs::rename(&tmp, &self.path).map_err(store_err)?;

        tracing::debug!(path = %self.path.display(), keys = self.data.len(), "store synced");
        self.dirty = false;
        Ok(())
    }
}
