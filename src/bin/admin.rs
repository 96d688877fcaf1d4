//! CLI administration tool for the shorturl storage engine.
//!
//! Drives the engine directly against whichever backend the environment
//! selects, without requiring any transport layer.
//!
//! # Usage
//!
//! ```bash
//! # Shorten a URL
//! cargo run --bin admin -- shorten https://example.com/some/long/path
//!
//! # Resolve a short id
//! cargo run --bin admin -- resolve 0f115db062b7c0dd030b16878c99dea5
//!
//! # List a user's URLs
//! cargo run --bin admin -- list user1
//!
//! # Soft-delete entries (relational backend)
//! cargo run --bin admin -- delete --owner user1 <id>...
//!
//! # Liveness and statistics
//! cargo run --bin admin -- ping
//! cargo run --bin admin -- stats
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` - selects the PostgreSQL backend
//! - `FILE_STORAGE_PATH` - selects the file-journal backend
//! - neither - pure in-memory backend (useful for smoke tests only)

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use tracing_subscriber::EnvFilter;

use shorturl::StorageEngine;
use shorturl::config::load_from_env;
use shorturl::error::StoreError;

/// CLI tool for managing shorturl storage.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Shorten a URL
    Shorten {
        /// The URL to shorten
        url: String,

        /// Owner recorded with the entry
        #[arg(short, long, default_value = "")]
        owner: String,
    },

    /// Resolve a short id back to its URL
    Resolve {
        /// The short identifier
        id: String,
    },

    /// List all URLs belonging to an owner
    List {
        /// Owner to list
        owner: String,
    },

    /// Soft-delete entries owned by --owner
    Delete {
        /// Short ids to delete
        ids: Vec<String>,

        /// Owner performing the deletion
        #[arg(short, long)]
        owner: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Check backend liveness
    Ping,

    /// Show storage statistics
    Stats,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let config = load_from_env()?;
    config.print_summary();

    let engine = StorageEngine::open(&config).await?;

    let result = run_command(cli.command, &engine).await;
    engine.close().await?;
    result
}

async fn run_command(command: Commands, engine: &StorageEngine) -> Result<()> {
    match command {
        Commands::Shorten { url, owner } => shorten(engine, &url, &owner).await,
        Commands::Resolve { id } => resolve(engine, &id).await,
        Commands::List { owner } => list(engine, &owner).await,
        Commands::Delete { ids, owner, yes } => delete(engine, ids, &owner, yes).await,
        Commands::Ping => ping(engine).await,
        Commands::Stats => stats(engine).await,
    }
}

async fn shorten(engine: &StorageEngine, url: &str, owner: &str) -> Result<()> {
    let outcome = engine.insert(url, owner).await?;

    if outcome.conflict {
        println!(
            "{} {}",
            "already shortened:".yellow(),
            outcome.short_id.bold()
        );
    } else {
        println!("{} {}", "shortened:".green(), outcome.short_id.bold());
    }

    Ok(())
}

async fn resolve(engine: &StorageEngine, id: &str) -> Result<()> {
    match engine.get(id).await {
        Ok(url) => {
            println!("{url}");
            Ok(())
        }
        Err(StoreError::NotFound) => {
            println!("{}", "not found".red());
            std::process::exit(1);
        }
        Err(StoreError::Gone) => {
            println!("{}", "deleted".yellow());
            std::process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}

async fn list(engine: &StorageEngine, owner: &str) -> Result<()> {
    let urls = engine.get_user_urls(owner).await?;

    if urls.is_empty() {
        println!("{}", "no URLs for this owner".dimmed());
        return Ok(());
    }

    println!("{}", format!("URLs owned by '{owner}':").bright_blue().bold());
    for url in urls {
        println!("  {}  {}", url.short_id.bold(), url.original_url);
    }

    Ok(())
}

async fn delete(engine: &StorageEngine, ids: Vec<String>, owner: &str, skip_confirm: bool) -> Result<()> {
    if ids.is_empty() {
        println!("{}", "nothing to delete".dimmed());
        return Ok(());
    }

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt(format!("Soft-delete {} entries owned by '{owner}'?", ids.len()))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "cancelled".yellow());
            return Ok(());
        }
    }

    engine.mark_deleted(&ids, owner).await?;
    println!(
        "{}",
        "done (entries owned by someone else were left untouched)".green()
    );

    Ok(())
}

async fn ping(engine: &StorageEngine) -> Result<()> {
    match engine.ping().await {
        Ok(()) => {
            println!("{}", "ok".green().bold());
            Ok(())
        }
        Err(e) => {
            println!("{} {}", "unreachable:".red().bold(), e);
            std::process::exit(1);
        }
    }
}

async fn stats(engine: &StorageEngine) -> Result<()> {
    match (engine.count_urls().await, engine.count_users().await) {
        (Ok(urls), Ok(users)) => {
            println!("{}", "Storage statistics".bright_blue().bold());
            println!("  URLs:  {}", urls.to_string().bold());
            println!("  Users: {}", users.to_string().bold());
            Ok(())
        }
        (Err(StoreError::Unavailable(msg)), _) | (_, Err(StoreError::Unavailable(msg))) => {
            println!("{} {}", "unavailable:".yellow(), msg);
            Ok(())
        }
        (Err(e), _) | (_, Err(e)) => Err(e.into()),
    }
}
