//! `saved` command handlers.

use clap::Subcommand;
use stocknews_core::AppConfig;
use stocknews_db::PersistenceGateway;
use stocknews_feed::{delete_all_saved, delete_saved, list_saved, refresh_company, FeedError};

use crate::app::{self, Store};
use crate::render;

/// Sub-commands available under `saved`.
#[derive(Debug, Subcommand)]
pub enum SavedCommands {
    /// List saved companies, most recently updated first
    List,
    /// Print the articles saved for a company
    Show {
        /// Saved company id (its slug, e.g. `acme-corp`)
        id: String,
    },
    /// Re-fetch the latest page for a saved company and overwrite it
    Refresh {
        /// Saved company id
        id: String,
    },
    /// Delete one saved company
    Delete {
        /// Saved company id
        id: String,
    },
    /// Delete every saved company for the user
    Clear,
}

pub(crate) async fn run_saved(
    config: &AppConfig,
    user: &str,
    command: SavedCommands,
) -> anyhow::Result<()> {
    let store = Store::open(config).await?;
    match command {
        SavedCommands::List => {
            let records = list_saved(&store, user).await?;
            if records.is_empty() {
                println!("no saved companies");
            }
            for record in &records {
                println!("{}", render::record_line(record));
            }
        }
        SavedCommands::Show { id } => {
            let record = store
                .get(user, &id)
                .await?
                .ok_or_else(|| anyhow::anyhow!("saved company '{id}' not found"))?;
            println!("{}", render::record_line(&record));
            println!("{}", render::sentiment_summary(&record.articles));
            print!("{}", render::articles(&record.articles));
        }
        SavedCommands::Refresh { id } => {
            let source = app::build_source(config)?;
            let enricher = app::build_enricher(config)?;
            match refresh_company(&source, &enricher, &store, user, &id, config.page_size).await {
                Ok(record) => println!(
                    "Refreshed {}: {} articles",
                    record.company_name, record.article_count
                ),
                Err(FeedError::NoResults) => println!("{}", FeedError::NoResults),
                Err(e) => return Err(e.into()),
            }
        }
        SavedCommands::Delete { id } => {
            delete_saved(&store, user, &id).await?;
            println!("Deleted {id}");
        }
        SavedCommands::Clear => {
            let removed = delete_all_saved(&store, user).await?;
            println!("Deleted {removed} saved companies");
        }
    }
    Ok(())
}
