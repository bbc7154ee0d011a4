//! Persisted key/value state.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;

/// Namespaced key/value storage that survives restarts.
pub trait StateStore {
    /// Read a value. `Ok(None)` when the key has never been written.
    fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>>;

    /// Write a value, replacing any previous one.
    fn set<T: Serialize>(&mut self, key: &str, value: &T) -> Result<()>;
}

/// State stored as a RON map in a single file.
///
/// ```ron
/// {
///     "history": ["cargo test", "cargo build"],
/// }
/// ```
pub struct RonStateFile {
    path: PathBuf,
}

impl RonStateFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every file a write touches, including the temporary sibling.
    pub fn written_paths(&self) -> [PathBuf; 2] {
        [self.path.clone(), self.tmp_path()]
    }

    fn tmp_path(&self) -> PathBuf {
        self.path.with_extension("ron.tmp")
    }

    fn read_map(&self) -> Result<BTreeMap<String, ron::Value>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        let map: BTreeMap<String, ron::Value> = ron::from_str(&content)?;
        Ok(map)
    }
}

impl StateStore for RonStateFile {
    fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.read_map()?.remove(key) {
            Some(value) => Ok(Some(value.into_rust()?)),
            None => Ok(None),
        }
    }

    fn set<T: Serialize>(&mut self, key: &str, value: &T) -> Result<()> {
        // A corrupt file is replaced rather than blocking every write.
        let mut map = self.read_map().unwrap_or_default();
        let encoded: ron::Value = ron::from_str(&ron::to_string(value)?)?;
        map.insert(key.to_string(), encoded);

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let content = ron::ser::to_string_pretty(&map, ron::ser::PrettyConfig::default())?;

        // Write-then-rename so a crash never leaves a half-written file.
        let tmp = self.tmp_path();
        std::fs::write(&tmp, content)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
