use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{MonitorError, Result};

/// Advisory lock that keeps two monitors from sharing one state file.
///
/// The lock is taken on `<state file>.lock` and held for as long as the guard
/// lives. The kernel drops it when the process exits, however it exits, so a
/// lock file left behind by a killed run never blocks the next one.
#[derive(Debug)]
pub struct InstanceLock {
    path: PathBuf,
    file: File,
}

impl InstanceLock {
    pub fn acquire(state_path: &Path) -> Result<Self> {
        let path = lock_path_for(state_path);

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(&path)
            .map_err(|e| MonitorError::store(state_path, e))?;

        if let Err(e) = file.try_lock_exclusive() {
            if e.kind() == fs2::lock_contended_error().kind() {
                return Err(MonitorError::store(
                    state_path,
                    format!("another instance is running ({} is locked)", path.display()),
                ));
            }
            return Err(MonitorError::store(state_path, e));
        }

        if let Err(e) = file.set_len(0).and_then(|_| writeln!(file, "{}", std::process::id())) {
            warn!("Could not write pid to {}: {}", path.display(), e);
        }

        debug!("Acquired instance lock {}", path.display());
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for InstanceLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            warn!("Failed to release instance lock {}: {}", self.path.display(), e);
        }
    }
}

fn lock_path_for(state_path: &Path) -> PathBuf {
    let mut name = state_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".lock");
    state_path.with_file_name(name)
}
