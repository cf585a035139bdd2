use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod app;
mod db;
mod feed;
mod render;
mod saved;
mod search;

use crate::db::DbCommands;
use crate::saved::SavedCommands;

#[derive(Debug, Parser)]
#[command(name = "stocknews")]
#[command(about = "Company news with market sentiment and short headlines")]
struct Cli {
    /// User whose saved companies to read and write (defaults to `STOCKNEWS_USER_ID`)
    #[arg(long, global = true)]
    user: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search news for a company and print the enriched feed
    Search {
        /// Company name to search for; omit to list suggestions
        company: Option<String>,
        /// Number of pages to load
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        pages: u32,
        /// Save the resulting feed for the user
        #[arg(long)]
        save: bool,
    },
    /// Interactive feed session reading commands from stdin
    Feed,
    /// Manage saved companies
    Saved {
        #[command(subcommand)]
        command: SavedCommands,
    },
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = stocknews_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let user = cli.user.or_else(|| config.user_id.clone());

    match cli.command {
        Some(Commands::Search {
            company,
            pages,
            save,
        }) => search::run_search(&config, user.as_deref(), company.as_deref(), pages, save).await,
        Some(Commands::Feed) => feed::run_feed_session(&config, user.as_deref()).await,
        Some(Commands::Saved { command }) => {
            saved::run_saved(&config, app::require_user(user.as_deref())?, command).await
        }
        Some(Commands::Db { command }) => db::run_db(&config, command).await,
        None => {
            search::print_suggestions();
            Ok(())
        }
    }
}
