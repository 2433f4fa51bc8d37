//! Account CLI commands
//!
//! Implements CLI commands for account management. Every mutating command
//! writes the credential store before returning.

use clap::Subcommand;

use super::{open_credentials, prompt_hidden};
use crate::config::SiteConfig;
use crate::display::account::{format_account_details, format_account_list, KeyCell};
use crate::error::{VaultError, VaultResult};
use crate::models::{Account, BankAccountType};
use crate::services::AccountService;
use crate::storage::Storage;

/// Account subcommands
#[derive(Subcommand)]
pub enum AccountCommands {
    /// Add an account, or replace the one with the same site and number
    Add {
        /// Site name from the site configuration
        site: String,
        /// Account number at the institution
        account_number: String,
        /// Bank account type (checking, savings, moneymrkt, creditline)
        #[arg(short = 't', long)]
        account_type: Option<String>,
        /// Login user name
        #[arg(short, long)]
        user: String,
        /// Login password (prompted when omitted)
        #[arg(long, env = "OFXVAULT_ACCOUNT_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// List all accounts
    List {
        /// Show the connection key of each account
        #[arg(short, long)]
        keys: bool,
    },
    /// Show account details
    Show {
        /// Account number as shown by `account list`
        number: usize,
    },
    /// Delete an account
    Delete {
        /// Account number as shown by `account list`
        number: usize,
    },
    /// Reset the connection identifier of an account
    Reset {
        /// Account number as shown by `account list`
        number: usize,
    },
}

/// Handle an account command
pub fn handle_account_command(
    storage: &Storage,
    sites: &SiteConfig,
    cmd: AccountCommands,
) -> VaultResult<()> {
    let mut state = open_credentials(storage)?;
    let mut service = AccountService::new(&mut state, sites, &storage.client_uids);

    match cmd {
        AccountCommands::Add {
            site,
            account_number,
            account_type,
            user,
            password,
        } => {
            let account_type = match account_type {
                Some(value) => Some(BankAccountType::parse(&value).ok_or_else(|| {
                    VaultError::Validation(format!(
                        "Invalid account type: '{}'. Valid types: checking, savings, moneymrkt, creditline",
                        value
                    ))
                })?),
                None => None,
            };
            let password = match password {
                Some(password) => password,
                None => prompt_hidden("Account password: ")?,
            };

            let account = Account::new(site, account_number, account_type, user, password);
            let label = account.to_string();
            let replaced = service.upsert(account)?;
            drop(service);
            storage.credentials.save(&mut state)?;

            if replaced {
                println!("Updated account: {}", label);
            } else {
                println!("Added account: {}", label);
            }
        }

        AccountCommands::List { keys } => {
            let accounts = service.list();
            if keys {
                let mut connection_keys = Vec::with_capacity(accounts.len());
                for account in accounts {
                    let cell = match service.connection_key(account) {
                        Ok(Some(key)) => KeyCell::Key(key),
                        Ok(None) => KeyCell::None,
                        Err(e) if e.is_not_found() => KeyCell::SiteMissing,
                        Err(e) => return Err(e),
                    };
                    connection_keys.push(cell);
                }
                print!("{}", format_account_list(accounts, Some(&connection_keys)));
            } else {
                print!("{}", format_account_list(accounts, None));
            }
        }

        AccountCommands::Show { number } => {
            let account = service.get(index(number)?)?;
            print!("{}", format_account_details(account));
        }

        AccountCommands::Delete { number } => {
            let deleted = service.delete(index(number)?)?;
            drop(service);
            storage.credentials.save(&mut state)?;
            println!("Deleted account: {}", deleted);
        }

        AccountCommands::Reset { number } => {
            let index = index(number)?;
            let label = service.get(index)?.to_string();
            if service.reset_connection(index)? {
                println!("Connection settings reset for {}", label);
            } else {
                println!("No connection settings to reset for {}", label);
            }
        }
    }

    Ok(())
}

/// Convert a 1-based list number to an index
fn index(number: usize) -> VaultResult<usize> {
    number
        .checked_sub(1)
        .ok_or_else(|| VaultError::account_not_found(format!("#{}", number)))
}
