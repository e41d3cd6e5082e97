//! CLI administration tool for linkforge.
//!
//! Works directly against the configured PostgreSQL store, without going
//! through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Stream every stored key
//! cargo run --bin admin -- keys
//!
//! # Look up a key
//! cargo run --bin admin -- resolve AbCd_123
//!
//! # Create a short link
//! cargo run --bin admin -- shorten https://example.com/a
//!
//! # Check database connection / show row count
//! cargo run --bin admin -- db check
//! cargo run --bin admin -- db info
//! ```
//!
//! # Environment Variables
//!
//! Same as the server (see `linkforge::config`). A database is required.

use linkforge::config::{self, Config};
use linkforge::infrastructure::persistence::PgUrlStore;
use linkforge::prelude::ShortLinkService;
use linkforge::server::{build_link_service, connect_database};

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use colored::*;
use futures_util::StreamExt;
use std::sync::Arc;

/// CLI tool for managing linkforge.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level commands.
#[derive(Subcommand)]
enum Commands {
    /// List every stored short key
    Keys,

    /// Show the original URL for a short key
    Resolve {
        /// Short key to look up
        short_key: String,
    },

    /// Create a short link
    Shorten {
        /// Original URL, stored verbatim
        original_url: String,

        /// Base URL printed in front of the key
        #[arg(long)]
        base_url: Option<String>,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = config::load_from_env()?;

    let Some(database_url) = config.database_url.clone() else {
        bail!("A database must be configured (DATABASE_URL or DB_HOST/DB_USER/DB_PASSWORD/DB_NAME)");
    };

    let pool = connect_database(&database_url, &config).await?;
    let store = Arc::new(PgUrlStore::new(Arc::new(pool)));
    let service = build_link_service(store, &config);

    match cli.command {
        Commands::Keys => list_keys(&service).await?,
        Commands::Resolve { short_key } => resolve(&service, &short_key).await?,
        Commands::Shorten {
            original_url,
            base_url,
        } => shorten(&service, &config, original_url, base_url).await?,
        Commands::Db { action } => match action {
            DbAction::Check => db_check(&service).await?,
            DbAction::Info => db_info(&service, &config).await?,
        },
    }

    Ok(())
}

/// Prints keys as they arrive from the store.
async fn list_keys(service: &ShortLinkService) -> Result<()> {
    println!("{}", "Short keys".bright_blue().bold());
    println!();

    let mut keys = service.list_keys();
    let mut total = 0usize;

    while let Some(key) = keys.next().await {
        let key = key.map_err(|e| anyhow::anyhow!("Failed to list keys: {}", e))?;
        println!("  {}", key.cyan());
        total += 1;
    }

    println!();
    println!("  Total: {}", total.to_string().bright_white().bold());

    Ok(())
}

async fn resolve(service: &ShortLinkService, short_key: &str) -> Result<()> {
    match service
        .resolve(short_key)
        .await
        .map_err(|e| anyhow::anyhow!("Lookup failed: {}", e))?
    {
        Some(url) => println!("{} {} {}", short_key.cyan(), "→".bright_black(), url),
        None => {
            println!("{} {}", short_key.cyan(), "not found".yellow());
            std::process::exit(1);
        }
    }

    Ok(())
}

async fn shorten(
    service: &ShortLinkService,
    config: &Config,
    original_url: String,
    base_url: Option<String>,
) -> Result<()> {
    let link = service
        .create(original_url)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create short link: {}", e))?;

    let base = base_url
        .or_else(|| config.public_base_url.clone())
        .unwrap_or_else(|| "/".to_string());

    println!("{}", "Short link created".green().bold());
    println!("  Key: {}", link.short_key.bright_yellow().bold());
    println!("  URL: {}", service.short_url(&base, &link.short_key));

    Ok(())
}

async fn db_check(service: &ShortLinkService) -> Result<()> {
    if service.store_healthy().await {
        println!("{}", "Database connection OK".green().bold());
        Ok(())
    } else {
        bail!("Database did not answer");
    }
}

async fn db_info(service: &ShortLinkService, config: &Config) -> Result<()> {
    let count = service
        .count()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to count links: {}", e))?;

    println!("{}", "Database info".bright_blue().bold());
    println!("  Links:        {}", count.to_string().bright_white().bold());
    println!("  Pool size:    {}", config.db_max_connections);
    println!("  Key attempts: {}", config.key_max_attempts);

    Ok(())
}
