//! Configuration module for ofxvault
//!
//! This module provides:
//! - Path resolution for the user data directory
//! - The site configuration language parser
//! - Global options read from the site configuration

pub mod options;
pub mod parser;
pub mod paths;
pub mod site_config;

pub use options::GlobalOptions;
pub use paths::VaultPaths;
pub use site_config::{backup_sites, SiteConfig};
