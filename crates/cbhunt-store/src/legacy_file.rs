//! Legacy synchronous medium: a JSON object of key/value strings on disk.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::backend::LegacyStore;
use crate::error::StoreError;

#[derive(Debug, Clone)]
pub struct LegacyFileStore {
    path: PathBuf,
}

impl LegacyFileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<Option<BTreeMap<String, String>>, StoreError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let map = serde_json::from_str(&content)
            .map_err(|e| StoreError::Corrupt(format!("{}: {e}", self.path.display())))?;
        Ok(Some(map))
    }
}

impl LegacyStore for LegacyFileStore {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_map()?.and_then(|mut map| map.remove(key)))
    }

    fn discard(&self, key: &str) -> Result<(), StoreError> {
        let Some(mut map) = self.read_map()? else {
            return Ok(());
        };
        if map.remove(key).is_none() {
            return Ok(());
        }
        if map.is_empty() {
            std::fs::remove_file(&self.path)?;
        } else {
            std::fs::write(&self.path, serde_json::to_string_pretty(&map)?)?;
        }
        Ok(())
    }
}
