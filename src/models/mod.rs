//! Core data models for ofxvault
//!
//! Sites and tickers come from the site configuration file; accounts come
//! from the credential store.

pub mod account;
pub mod site;
pub mod ticker;

pub use account::{Account, AccountValidationError, BankAccountType};
pub use site::{Capability, Site, DEFAULT_PROTOCOL_VERSION};
pub use ticker::Ticker;
