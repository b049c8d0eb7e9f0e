//! CLI administration tool for link-shortener.
//!
//! Provides commands for inspecting and removing links, viewing statistics,
//! and performing database operations without requiring HTTP API access.
//!
//! # Usage
//!
//! ```bash
//! # List the newest links
//! cargo run --bin admin -- links list
//!
//! # Show one link without counting an access
//! cargo run --bin admin -- links show abc123
//!
//! # Delete a link
//! cargo run --bin admin -- links delete abc123
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (or `DB_*` components): PostgreSQL connection string

use link_shortener::application::services::LinkService;
use link_shortener::config::{Config, StorageBackend};
use link_shortener::domain::entities::Link;
use link_shortener::infrastructure::persistence::PgLinkRepository;
use link_shortener::server::connect_pool;
use link_shortener::utils::code_generator::CodeGenerator;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing link-shortener.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Inspect and remove links
    Links {
        #[command(subcommand)]
        action: LinkAction,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Link management subcommands.
#[derive(Subcommand)]
enum LinkAction {
    /// List links, newest first
    List {
        #[arg(short, long, default_value_t = 1)]
        page: i64,

        #[arg(long, default_value_t = 25)]
        page_size: i64,
    },

    /// Show a link by short code
    Show { code: String },

    /// Delete a link by short code
    Delete {
        code: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
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

    let config = Config::from_env_with_storage(Some(StorageBackend::Postgres))?;
    config.validate()?;
    let pool = connect_pool(&config).await?;

    let service = LinkService::new(
        Arc::new(PgLinkRepository::new(Arc::new(pool.clone()))),
        CodeGenerator::secure(),
        config.allocator_settings(),
    );

    match cli.command {
        Commands::Links { action } => handle_link_action(action, &service).await?,
        Commands::Stats => handle_stats(&service, &pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Dispatches link management commands.
async fn handle_link_action(action: LinkAction, service: &LinkService) -> Result<()> {
    match action {
        LinkAction::List { page, page_size } => list_links(service, page, page_size).await,
        LinkAction::Show { code } => show_link(service, &code).await,
        LinkAction::Delete { code, yes } => delete_link(service, &code, yes).await,
    }
}

/// Lists one page of links.
///
/// # Output Format
///
/// ```text
/// 📋 Links (page 1)
///
///   Code     Hits     Created            URL
///   ──────────────────────────────────────────────────────────────
///   aB3xY9   12       2025-01-15 10:30   https://example.com/page
/// ```
async fn list_links(service: &LinkService, page: i64, page_size: i64) -> Result<()> {
    println!("{}", format!("📋 Links (page {page})").bright_blue().bold());
    println!();

    let links = service
        .list(page, page_size)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list links: {}", e))?;

    if links.is_empty() {
        println!("{}", "  No links found".yellow());
        return Ok(());
    }

    println!(
        "  {:<12} {:<8} {:<18} {}",
        "Code".bright_white().bold(),
        "Hits".bright_white().bold(),
        "Created".bright_white().bold(),
        "URL".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for link in &links {
        println!(
            "  {:<12} {:<8} {:<18} {}",
            link.short_code.cyan(),
            link.access_count.to_string().bright_green(),
            link.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            link.url
        );
    }

    println!();
    println!("  Shown: {}", links.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

async fn show_link(service: &LinkService, code: &str) -> Result<()> {
    let link = service
        .statistics(code)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    print_link(&link);
    Ok(())
}

/// Deletes a link after confirmation (default: No).
async fn delete_link(service: &LinkService, code: &str, skip_confirm: bool) -> Result<()> {
    println!("{}", "🗑  Delete Link".bright_blue().bold());
    println!();

    let link = service
        .statistics(code)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;
    print_link(&link);

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete this link?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    service
        .delete(&link.short_code)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to delete link: {}", e))?;

    println!();
    println!("{}", "✅ Link deleted".green().bold());
    println!();

    Ok(())
}

fn print_link(link: &Link) {
    println!("  Code:     {}", link.short_code.cyan().bold());
    println!("  URL:      {}", link.url);
    println!(
        "  Accesses: {}",
        link.access_count.to_string().bright_green()
    );
    println!(
        "  Created:  {}",
        link.created_at.to_rfc3339().bright_black()
    );
    println!(
        "  Updated:  {}",
        link.updated_at.to_rfc3339().bright_black()
    );
    println!();
}

/// Displays link and access totals.
async fn handle_stats(service: &LinkService, pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let links_count = service
        .count()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to count links: {}", e))?;

    let accesses: i64 = sqlx::query_scalar("SELECT COALESCE(SUM(access_count), 0)::BIGINT FROM links")
        .fetch_one(pool)
        .await?;

    println!(
        "  Links:    {}",
        links_count.to_string().bright_green().bold()
    );
    println!(
        "  Accesses: {}",
        accesses.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!();
        }
    }

    Ok(())
}
