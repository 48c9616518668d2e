//! Coffee shop CLI - Database migrations and catalog tools.
//!
//! # Usage
//!
//! ```bash
//! # Run storefront database migrations
//! coffeeshop-cli migrate
//!
//! # Upsert the default catalog
//! coffeeshop-cli seed
//!
//! # Replace the catalog with the products in a YAML file
//! coffeeshop-cli seed --file catalog.yaml --replace
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Load products into the catalog

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "coffeeshop-cli")]
#[command(author, version, about = "Coffee shop CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run storefront database migrations
    Migrate,
    /// Load products into the catalog
    Seed {
        /// YAML catalog file (defaults to the built-in catalog)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Delete products that are not in the seed
        #[arg(long)]
        replace: bool,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::storefront().await?,
        Commands::Seed { file, replace } => {
            commands::seed::catalog(file.as_deref(), replace).await?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_seed_flags() {
        let cli = Cli::try_parse_from(["coffeeshop-cli", "seed", "-f", "menu.yaml", "--replace"])
            .unwrap_or_else(|e| panic!("{e}"));
        match cli.command {
            Commands::Seed { file, replace } => {
                assert_eq!(file, Some(PathBuf::from("menu.yaml")));
                assert!(replace);
            }
            Commands::Migrate => panic!("expected seed"),
        }
    }
}
