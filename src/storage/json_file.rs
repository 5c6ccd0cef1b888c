use async_trait::async_trait;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::{MonitorError, Result};
use crate::models::StoredState;
use crate::storage::StateStore;

/// State kept as a pretty-printed JSON object keyed by product id.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        }
    }
}

#[async_trait]
impl StateStore for JsonFileStore {
    async fn load(&self) -> Result<StoredState> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No state file at {}, starting fresh", self.path.display());
                return Ok(StoredState::new());
            }
            Err(e) => return Err(MonitorError::store(&self.path, e)),
        };

        if content.trim().is_empty() {
            return Ok(StoredState::new());
        }

        let state: StoredState = serde_json::from_str(&content)
            .map_err(|e| MonitorError::store(&self.path, format!("corrupt state file: {}", e)))?;

        debug!("Loaded {} product states from {}", state.len(), self.path.display());
        Ok(state)
    }

    async fn save(&self, state: &StoredState) -> Result<()> {
        let mut json = serde_json::to_string_pretty(state)
            .map_err(|e| MonitorError::store(&self.path, e))?;
        json.push('\n');

        // Written next to the target so the final rename stays on one filesystem.
        let mut tmp = NamedTempFile::new_in(self.parent_dir())
            .map_err(|e| MonitorError::store(&self.path, e))?;
        tmp.write_all(json.as_bytes())
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|e| MonitorError::store(&self.path, e))?;
        tmp.persist(&self.path)
            .map_err(|e| MonitorError::store(&self.path, e.error))?;

        debug!("Saved {} product states to {}", state.len(), self.path.display());
        Ok(())
    }
}
