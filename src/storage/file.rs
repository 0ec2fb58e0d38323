use std::collections::HashMap;
use std::io::{self, Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use file_lock::{FileLock, FileOptions};
use log::warn;

use super::Storage;

/// File-backed storage: one JSON object per store, guarded by a file lock
/// so concurrent processes do not interleave partial writes. A missing
/// file reads as empty; a corrupted file is ignored on read and replaced
/// on the next write.
pub struct FileStorage {
    path: String,
}

impl FileStorage {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_string_lossy().to_string(),
        }
    }

    fn load(&self) -> Result<HashMap<String, String>> {
        let opts = FileOptions::new().read(true);
        let mut file = match FileLock::lock(&self.path, true, opts) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(err) => {
                return Err(err).with_context(|| format!("lock storage file '{}'", self.path))
            }
        };

        let mut data = Vec::new();
        file.file
            .read_to_end(&mut data)
            .with_context(|| format!("read storage file '{}'", self.path))?;

        match serde_json::from_slice(&data) {
            Ok(values) => Ok(values),
            Err(_) => {
                warn!("Storage file '{}' holds invalid data, ignoring it", self.path);
                Ok(HashMap::new())
            }
        }
    }

    fn save(&self, values: &HashMap<String, String>) -> Result<()> {
        let data = serde_json::to_vec(values).context("encode storage values")?;
        let opts = FileOptions::new().write(true).truncate(true).create(true);
        let mut file = FileLock::lock(&self.path, true, opts)
            .with_context(|| format!("lock storage file '{}'", self.path))?;
        file.file
            .write_all(&data)
            .with_context(|| format!("write storage file '{}'", self.path))?;
        Ok(())
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self.load()?;
        values.insert(key.to_string(), value.to_string());
        self.save(&values)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut values = self.load()?;
        if values.remove(key).is_some() {
            self.save(&values)?;
        }
        Ok(())
    }
}
