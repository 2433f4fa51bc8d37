//! Site configuration commands

use crate::config::{SiteConfig, VaultPaths};
use crate::display::site::{format_options, format_site_list, format_ticker_list};
use crate::error::VaultResult;
use crate::storage::Storage;

/// Print the data paths and global options
pub fn show_config(paths: &VaultPaths, sites: &SiteConfig) -> VaultResult<()> {
    println!("ofxvault Configuration");
    println!("======================");
    println!("Data directory:     {}", paths.base_dir().display());
    println!("Site configuration: {}", paths.sites_file().display());
    println!("Credential store:   {}", paths.credentials_file().display());
    println!("Client identifiers: {}", paths.client_uid_file().display());
    println!("Statement output:   {}", paths.xfr_dir().display());
    println!();
    println!("Global options:");
    print!("{}", format_options(&sites.options));
    Ok(())
}

/// Print the parsed sites, stocks and funds
pub fn show_sites(storage: &Storage, sites: &SiteConfig) -> VaultResult<()> {
    println!("Sites ({}):", sites.sites.len());
    print!("{}", format_site_list(sites));
    println!();
    print!("{}", format_ticker_list("Stocks", &sites.stocks));
    print!("{}", format_ticker_list("Funds", &sites.funds));

    let accounts = storage.credentials.load().accounts;
    let orphaned: Vec<_> = accounts
        .iter()
        .filter(|a| sites.site(&a.site).is_none())
        .map(|a| a.site.as_str())
        .collect();
    if !orphaned.is_empty() {
        println!();
        println!("Accounts refer to unknown sites: {}", orphaned.join(", "));
    }
    Ok(())
}
