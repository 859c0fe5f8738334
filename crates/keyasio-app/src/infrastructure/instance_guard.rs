//! Single-instance guard.
//!
//! Two KeyAsio processes would fight over the audio device and both write
//! the settings file on exit.  The first process takes an exclusive advisory
//! lock on a lock file; later processes see the lock held and exit.
//!
//! The lock belongs to the open file handle, so the OS releases it when the
//! process ends, even after a crash.  A stale lock file on disk is harmless.

use std::fs::{self, File, OpenOptions, TryLockError};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

/// Holds the instance lock until dropped.
#[derive(Debug)]
pub struct InstanceGuard {
    path: PathBuf,
    _file: File,
}

impl InstanceGuard {
    /// Tries to become the running instance.
    ///
    /// Returns `Ok(None)` if another process already holds the lock.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the lock file cannot be created or locked.
    pub fn acquire(path: &Path) -> io::Result<Option<Self>> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;

        match file.try_lock() {
            Ok(()) => {}
            Err(TryLockError::WouldBlock) => return Ok(None),
            Err(TryLockError::Error(e)) => return Err(e),
        }

        // Informational only; the lock is what matters.
        file.set_len(0)?;
        write!(file, "{}", std::process::id())?;
        debug!("instance lock acquired at {}", path.display());

        Ok(Some(Self {
            path: path.to_path_buf(),
            _file: file,
        }))
    }

    /// Path of the lock file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}
