//! Quote download switch

use clap::Subcommand;

use super::open_credentials;
use crate::config::SiteConfig;
use crate::error::VaultResult;
use crate::services::AccountService;
use crate::storage::Storage;

/// Quote subcommands
#[derive(Subcommand)]
pub enum QuotesCommands {
    /// Download stock and fund quotes with statements
    Enable,
    /// Stop downloading quotes
    Disable,
}

/// Handle a quotes command
pub fn handle_quotes_command(
    storage: &Storage,
    sites: &SiteConfig,
    cmd: QuotesCommands,
) -> VaultResult<()> {
    let enabled = matches!(cmd, QuotesCommands::Enable);

    let mut state = open_credentials(storage)?;
    AccountService::new(&mut state, sites, &storage.client_uids).set_quotes(enabled);
    storage.credentials.save(&mut state)?;

    if enabled {
        println!("Stock and fund quotes enabled.");
    } else {
        println!("Stock and fund quotes disabled.");
    }
    Ok(())
}
