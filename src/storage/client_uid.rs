//! Client identifier registry
//!
//! Some institutions recognise a returning client by a stable identifier.
//! One identifier is kept per (URL host, user name); the table is keyed by a
//! SHA-256 hash of the pair so user names never appear on disk.
//!
//! The table is shared by all profiles and assumes a single writing process.

use std::collections::BTreeMap;
use std::path::PathBuf;

use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::json_file::JsonFile;
use crate::error::VaultResult;

/// Hash key to identifier
pub type UidTable = BTreeMap<String, String>;

/// Backing storage for the identifier table
pub trait UidStore {
    /// Read the whole table; an absent table is empty
    fn load(&self) -> VaultResult<UidTable>;

    /// Replace the whole table
    fn save(&self, table: &UidTable) -> VaultResult<()>;
}

/// Identifier table kept in a JSON file
#[derive(Debug, Clone)]
pub struct JsonUidStore {
    file: JsonFile,
}

impl JsonUidStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: JsonFile::new(path),
        }
    }
}

impl UidStore for JsonUidStore {
    fn load(&self) -> VaultResult<UidTable> {
        self.file.read_or_default()
    }

    fn save(&self, table: &UidTable) -> VaultResult<()> {
        self.file.replace(table)
    }
}

/// Hands out stable client identifiers per (host, user name)
pub struct ClientUidRegistry<S: UidStore = JsonUidStore> {
    store: S,
}

impl ClientUidRegistry<JsonUidStore> {
    /// Registry backed by a JSON file
    pub fn open(path: PathBuf) -> Self {
        Self::new(JsonUidStore::new(path))
    }
}

impl<S: UidStore> ClientUidRegistry<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Return the identifier for (url host, username), creating it if needed
    ///
    /// Only the first call for a pair writes the table.
    pub fn get_or_create(&self, url: &str, username: &str) -> VaultResult<String> {
        let key = host_key(url, username);
        let mut table = self.load_table();

        if let Some(uid) = table.get(&key) {
            debug!(host = url_authority(url), "Using existing client identifier");
            return Ok(uid.clone());
        }

        let uid = Uuid::new_v4().to_string();
        table.insert(key, uid.clone());
        self.store.save(&table)?;
        info!(host = url_authority(url), "Created client identifier");
        Ok(uid)
    }

    /// Look up the identifier without creating one
    pub fn get(&self, url: &str, username: &str) -> Option<String> {
        self.load_table().get(&host_key(url, username)).cloned()
    }

    /// Forget the identifier for (url host, username)
    ///
    /// Deleting an absent entry leaves the table untouched. Returns whether
    /// an entry was removed.
    pub fn delete(&self, url: &str, username: &str) -> VaultResult<bool> {
        let mut table = self.load_table();

        if table.remove(&host_key(url, username)).is_none() {
            return Ok(false);
        }

        self.store.save(&table)?;
        info!(host = url_authority(url), "Removed client identifier");
        Ok(true)
    }

    fn load_table(&self) -> UidTable {
        self.store.load().unwrap_or_else(|e| {
            warn!(error = %e, "Client identifier table unreadable, starting empty");
            UidTable::new()
        })
    }
}

/// Host part (authority) of a URL, or "" when the URL has none
///
/// `https://ofx.example.com:443/a/b?x` gives `ofx.example.com:443`.
pub fn url_authority(url: &str) -> &str {
    let rest = match url.find("://") {
        Some(i) => &url[i + 3..],
        None => match url.strip_prefix("//") {
            Some(rest) => rest,
            None => return "",
        },
    };
    let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    &rest[..end]
}

/// Hex SHA-256 of host followed by user name
fn host_key(url: &str, username: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url_authority(url).as_bytes());
    hasher.update(username.as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}
