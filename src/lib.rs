//! ofxvault - site registry, credential store and OFX statement assembler
//!
//! This library provides the core of a statement downloader: it reads the
//! site configuration, keeps the account list (optionally encrypted under a
//! password), hands out stable client identifiers, and validates and
//! combines downloaded statements.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Data paths, the site configuration parser and global options
//! - `crypto`: Password rules, key derivation and field encryption
//! - `error`: Custom error types
//! - `models`: Sites, tickers and accounts
//! - `storage`: Credential store and client identifier registry
//! - `services`: Account lifecycle on top of the stores
//! - `ofx`: Statement rendering, validation, fetching and combining
//! - `cli` / `display`: Command handlers and terminal formatting
//!
//! # Example
//!
//! ```rust,ignore
//! use ofxvault::config::{SiteConfig, VaultPaths};
//! use ofxvault::storage::Storage;
//!
//! let paths = VaultPaths::new()?;
//! let sites = SiteConfig::load(&paths)?;
//! let storage = Storage::new(paths)?;
//! let state = storage.credentials.load().open(Some("password"))?;
//! ```

pub mod cli;
pub mod config;
pub mod crypto;
pub mod display;
pub mod error;
pub mod log;
pub mod models;
pub mod ofx;
pub mod services;
pub mod storage;

pub use error::{VaultError, VaultResult};
