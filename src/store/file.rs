//! # Local Filesystem Backend
//!
//! One file per key, `<root>/<key>.json`.
//!
//! Writes are atomic:
//! 1. Write to `<key>.json.tmp`
//! 2. fsync the temp file
//! 3. Rename over the final file (atomic on POSIX)

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use super::backend::KeyValueStore;
use super::errors::{StoreError, StoreResult};

/// Filesystem key-value store rooted at a data directory
#[derive(Debug, Clone)]
pub struct FileKv {
    root: PathBuf,
}

impl FileKv {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> StoreResult<PathBuf> {
        validate_key(key)?;
        Ok(self.root.join(format!("{}.json", key)))
    }
}

/// Keys become file names: ASCII letters, digits, `-`, `_` and `.` only, not
/// starting with `.`.
fn validate_key(key: &str) -> StoreResult<()> {
    let allowed = |c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.';
    if key.is_empty() || key.starts_with('.') || !key.chars().all(allowed) {
        return Err(StoreError::InvalidKey(key.to_string()));
    }
    Ok(())
}

fn io_error(context: &str, path: &Path, e: std::io::Error) -> StoreError {
    StoreError::IoError(format!("{} '{}': {}", context, path.display(), e))
}

impl KeyValueStore for FileKv {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            // Non-UTF-8 bytes are corrupt content, not a backend failure
            Err(e) if e.kind() == ErrorKind::InvalidData => Ok(Some(String::new())),
            Err(e) => Err(io_error("failed to read", &path, e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let path = self.path_for(key)?;
        let temp_path = path.with_extension("json.tmp");

        fs::create_dir_all(&self.root)
            .map_err(|e| io_error("failed to create data directory", &self.root, e))?;

        let write_temp = || -> std::io::Result<()> {
            let mut file = File::create(&temp_path)?;
            file.write_all(value.as_bytes())?;
            file.sync_all()
        };
        if let Err(e) = write_temp() {
            let _ = fs::remove_file(&temp_path);
            return Err(io_error("failed to write", &temp_path, e));
        }

        if let Err(e) = fs::rename(&temp_path, &path) {
            let _ = fs::remove_file(&temp_path);
            return Err(io_error("failed to replace", &path, e));
        }

        // Persist the rename itself; not every platform can open a directory
        if let Ok(dir) = File::open(&self.root) {
            let _ = dir.sync_all();
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error("failed to remove", &path, e)),
        }
    }
}
