//! Storage layer for ofxvault
//!
//! Provides the credential store and the client identifier registry, both
//! persisted as whole JSON documents replaced by rename.
//!
//! Each store is read at startup and rewritten on change by a single
//! process. Concurrent processes sharing one data directory are not
//! supported; there is no file locking.

pub mod client_uid;
pub mod credentials;
pub mod json_file;

pub use client_uid::{url_authority, ClientUidRegistry, JsonUidStore, UidStore, UidTable};
pub use credentials::{
    decrypt_accounts, encrypt_accounts, CredentialFile, CredentialState, CredentialStore,
    SecretField, StoredAccount,
};
pub use json_file::JsonFile;

use crate::config::paths::VaultPaths;
use crate::error::VaultError;

/// Main storage coordinator that provides access to both stores
pub struct Storage {
    paths: VaultPaths,
    pub credentials: CredentialStore,
    pub client_uids: ClientUidRegistry,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: VaultPaths) -> Result<Self, VaultError> {
        paths.ensure_directories()?;

        Ok(Self {
            credentials: CredentialStore::new(paths.credentials_file()),
            client_uids: ClientUidRegistry::open(paths.client_uid_file()),
            paths,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &VaultPaths {
        &self.paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_storage_creation() {
        let temp_dir = TempDir::new().unwrap();
        let paths = VaultPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();

        assert!(temp_dir.path().join("xfr").exists());
        assert!(storage.credentials.load().accounts.is_empty());
    }
}
