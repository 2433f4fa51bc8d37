use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use ofxvault::cli::{
    combine_statements, handle_account_command, handle_encrypt_command, handle_quotes_command,
    show_config, show_sites, validate_statement, AccountCommands, EncryptCommands,
    QuotesCommands,
};
use ofxvault::config::{backup_sites, SiteConfig, VaultPaths};
use ofxvault::log::init_logging;
use ofxvault::storage::Storage;

#[derive(Parser)]
#[command(
    name = "ofxvault",
    version,
    about = "Site registry, encrypted credential store and OFX statement assembler",
    long_about = "ofxvault keeps the list of financial institution sites and the \
                  accounts used to download statements from them. Credentials \
                  can be protected with a password, and downloaded statements \
                  can be validated and combined into a single file."
)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show data paths and global options
    Config,

    /// List configured sites, stocks and funds
    Sites,

    /// Account management commands
    #[command(subcommand)]
    Account(AccountCommands),

    /// Credential store encryption commands
    #[command(subcommand)]
    Encrypt(EncryptCommands),

    /// Turn stock and fund quote downloads on or off
    #[command(subcommand)]
    Quotes(QuotesCommands),

    /// Check a downloaded statement file
    Validate {
        /// Statement file
        file: PathBuf,
    },

    /// Combine statement files into one
    Combine {
        /// Statement files, in output order
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Output directory (defaults to the statement output directory)
        #[arg(short, long)]
        out_dir: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let paths = VaultPaths::new()?;
    let storage = Storage::new(paths.clone())?;
    let sites = SiteConfig::load(&paths)?;

    match cli.command {
        Some(Commands::Config) => show_config(&paths, &sites)?,
        Some(Commands::Sites) => show_sites(&storage, &sites)?,
        Some(Commands::Account(cmd)) => handle_account_command(&storage, &sites, cmd)?,
        Some(Commands::Encrypt(cmd)) => handle_encrypt_command(&storage, &sites, cmd)?,
        Some(Commands::Quotes(cmd)) => handle_quotes_command(&storage, &sites, cmd)?,
        Some(Commands::Validate { file }) => validate_statement(&file)?,
        Some(Commands::Combine { files, out_dir }) => {
            let out_dir = out_dir.unwrap_or_else(|| paths.xfr_dir());
            combine_statements(&files, &out_dir)?;
        }
        None => {
            println!("ofxvault - OFX site and credential manager");
            println!();
            println!("Run 'ofxvault --help' for usage information.");
        }
    }

    if !sites.sites.is_empty() {
        backup_sites(&paths)?;
    }

    Ok(())
}
