//! Display formatting for terminal output
//!
//! Provides utilities for formatting accounts, sites and options as plain
//! text tables.

pub mod account;
pub mod site;

pub use account::{format_account_details, format_account_list, KeyCell};
pub use site::{format_options, format_site_list, format_ticker_list};
