//! Named JSON slots on disk.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::Write;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// A string-keyed slot storing a JSON array of `T` at `<dir>/<name>.json`.
#[derive(Debug, Clone)]
pub struct JsonSlot<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T> JsonSlot<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(dir: &Path, name: &str) -> Self {
        Self {
            path: dir.join(format!("{}.json", name)),
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored array.
    ///
    /// A missing slot is empty. Unreadable or corrupt slots are logged and
    /// treated as empty too.
    pub fn load(&self) -> Vec<T> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Slot {} not found, starting empty", self.path.display());
                return Vec::new();
            }
            Err(e) => {
                warn!("Failed to read {}: {}", self.path.display(), e);
                return Vec::new();
            }
        };

        match serde_json::from_str(&content) {
            Ok(items) => items,
            Err(e) => {
                warn!("Failed to parse {}: {}", self.path.display(), e);
                Vec::new()
            }
        }
    }

    /// Replace the stored array.
    pub fn save(&self, items: &[T]) -> std::io::Result<()> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(dir)?;

        let json = serde_json::to_string_pretty(items)?;

        // Sibling temp file, renamed over the slot.
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.flush()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;

        debug!("Saved {} entries to {}", items.len(), self.path.display());
        Ok(())
    }
}
