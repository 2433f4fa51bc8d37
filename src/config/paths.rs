//! Path management for ofxvault
//!
//! Resolves the user data directory holding the site configuration,
//! the credential store, the client identifier table and the transfer
//! directory for combined statements.
//!
//! ## Path Resolution Order
//!
//! 1. `OFXVAULT_DATA_DIR` environment variable (if set)
//! 2. The platform config directory reported by `directories`

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use crate::error::VaultError;

/// Manages all paths used by ofxvault
#[derive(Debug, Clone)]
pub struct VaultPaths {
    /// Base directory for all ofxvault data
    base_dir: PathBuf,
}

impl VaultPaths {
    /// Create a new VaultPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, VaultError> {
        let base_dir = if let Ok(custom) = std::env::var("OFXVAULT_DATA_DIR") {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create VaultPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Site configuration file
    pub fn sites_file(&self) -> PathBuf {
        self.base_dir.join("sites.dat")
    }

    /// Backup of the site configuration file
    pub fn sites_backup(&self) -> PathBuf {
        self.base_dir.join("sites.bak")
    }

    /// Template used to seed a missing site configuration
    pub fn sites_template(&self) -> PathBuf {
        self.base_dir.join("sites.template")
    }

    /// Credential store
    pub fn credentials_file(&self) -> PathBuf {
        self.base_dir.join("ofx_config.json")
    }

    /// Client identifier table
    pub fn client_uid_file(&self) -> PathBuf {
        self.base_dir.join("connect.key.json")
    }

    /// Output directory for downloaded and combined statements
    pub fn xfr_dir(&self) -> PathBuf {
        self.base_dir.join("xfr")
    }

    /// Ensure the base and transfer directories exist
    pub fn ensure_directories(&self) -> Result<(), VaultError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| VaultError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.xfr_dir())
            .map_err(|e| VaultError::Io(format!("Failed to create xfr directory: {}", e)))?;

        Ok(())
    }
}

fn resolve_default_path() -> Result<PathBuf, VaultError> {
    ProjectDirs::from("", "", "ofxvault")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| VaultError::Config("Could not determine home directory".into()))
}
