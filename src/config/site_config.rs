//! Site configuration loaded from `sites.dat`
//!
//! Holds the parsed sites, tickers and global options. The value is built
//! once at startup and passed by reference afterwards.

use std::collections::BTreeMap;
use std::fs;

use tracing::{debug, info, warn};

use super::options::GlobalOptions;
use super::parser;
use super::paths::VaultPaths;
use crate::error::{VaultError, VaultResult};
use crate::models::{Site, Ticker};

/// Parsed contents of the site configuration file
#[derive(Debug, Clone, Default)]
pub struct SiteConfig {
    /// Sites keyed by upper-cased name
    pub sites: BTreeMap<String, Site>,
    pub stocks: Vec<Ticker>,
    pub funds: Vec<Ticker>,
    pub options: GlobalOptions,
}

impl SiteConfig {
    /// Parse configuration text
    pub fn parse(text: &str) -> Self {
        parser::parse(text)
    }

    /// Load `sites.dat`, seeding it from the backup or template when missing
    ///
    /// A missing configuration with nothing to seed it from yields an empty
    /// configuration with default options.
    pub fn load(paths: &VaultPaths) -> VaultResult<Self> {
        let sites_file = paths.sites_file();

        if !sites_file.exists() {
            let seed = [paths.sites_backup(), paths.sites_template()]
                .into_iter()
                .find(|candidate| candidate.exists());

            match seed {
                Some(seed) => {
                    info!(from = %seed.display(), "Seeding site configuration");
                    fs::copy(&seed, &sites_file).map_err(|e| {
                        VaultError::Io(format!(
                            "Failed to copy {} to {}: {}",
                            seed.display(),
                            sites_file.display(),
                            e
                        ))
                    })?;
                }
                None => {
                    warn!(path = %sites_file.display(), "No site configuration found");
                    return Ok(Self::default());
                }
            }
        }

        let bytes = fs::read(&sites_file).map_err(|e| {
            VaultError::Io(format!("Failed to read {}: {}", sites_file.display(), e))
        })?;

        // Legacy files are Windows-1252; undecodable bytes become U+FFFD
        let text = String::from_utf8_lossy(&bytes);
        let config = Self::parse(&text);
        debug!(
            sites = config.sites.len(),
            stocks = config.stocks.len(),
            funds = config.funds.len(),
            "Loaded site configuration"
        );
        Ok(config)
    }

    /// Look up a site by name, ignoring case
    pub fn site(&self, name: &str) -> Option<&Site> {
        self.sites.get(&name.to_uppercase())
    }

    /// Site names in sorted order
    pub fn site_names(&self) -> Vec<&str> {
        self.sites.keys().map(String::as_str).collect()
    }
}

/// Copy `sites.dat` to `sites.bak` unless the backup is already identical
///
/// Returns true when a backup was written.
pub fn backup_sites(paths: &VaultPaths) -> VaultResult<bool> {
    let sites_file = paths.sites_file();
    let backup = paths.sites_backup();

    if !sites_file.exists() {
        return Ok(false);
    }

    let current = fs::read(&sites_file)?;
    if backup.exists() && fs::read(&backup)? == current {
        return Ok(false);
    }

    fs::write(&backup, current)
        .map_err(|e| VaultError::Io(format!("Failed to write {}: {}", backup.display(), e)))?;
    info!(path = %backup.display(), "Backed up site configuration");
    Ok(true)
}
