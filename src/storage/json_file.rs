//! Whole-document JSON files
//!
//! The credential store and the identifier table are small documents that
//! are read whole and replaced whole. A replacement is written to a sibling
//! `<name>.tmp` and renamed over the target, so after a crash the file holds
//! either the old document or the new one.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{VaultError, VaultResult};

/// One JSON document at a fixed path
#[derive(Debug, Clone)]
pub struct JsonFile {
    path: PathBuf,
}

impl JsonFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the document
    ///
    /// A missing or blank file is `T::default()`. Anything else that does not
    /// deserialize is `PersistenceUnreadable`, naming the file.
    pub fn read_or_default<T>(&self) -> VaultResult<T>
    where
        T: DeserializeOwned + Default,
    {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(T::default()),
            Err(e) => return Err(self.unreadable(e)),
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(T::default());
        }
        serde_json::from_slice(&bytes).map_err(|e| self.unreadable(e))
    }

    /// Replace the document with `value`
    pub fn replace<T: Serialize>(&self, value: &T) -> VaultResult<()> {
        let document = serde_json::to_vec_pretty(value)?;

        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }

        let staging = self.staging_path();
        let mut file = File::create(&staging)?;
        file.write_all(&document)?;
        file.sync_all()?;
        drop(file);

        fs::rename(&staging, &self.path).map_err(|e| {
            let _ = fs::remove_file(&staging);
            VaultError::Storage(format!("Could not replace {}: {}", self.path.display(), e))
        })
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".tmp");
        PathBuf::from(name)
    }

    fn unreadable(&self, cause: impl std::fmt::Display) -> VaultError {
        VaultError::PersistenceUnreadable {
            file: self.path.display().to_string(),
            message: cause.to_string(),
        }
    }
}
