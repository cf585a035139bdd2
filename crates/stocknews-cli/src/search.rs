//! `search` command: one search, optional extra pages, optional save.

use stocknews_core::AppConfig;
use stocknews_feed::Notice;

use crate::app::{self, Store};
use crate::render;

/// Shown when no company is given.
pub(crate) const SUGGESTIONS: [&str; 4] = ["Apple", "Tesla", "Microsoft", "Amazon"];

pub(crate) fn print_suggestions() {
    println!("Try searching for a company, e.g.:");
    for name in SUGGESTIONS {
        println!("  stocknews search {name}");
    }
}

pub(crate) fn print_notices(notices: &[Notice]) {
    for notice in notices {
        match notice {
            Notice::Found { .. } | Notice::EndReached => println!("{notice}"),
            Notice::NoResults | Notice::RateLimited | Notice::Failed { .. } => {
                eprintln!("error: {notice}");
            }
        }
    }
}

/// Search `company`, then trigger up to `pages - 1` continuation loads.
///
/// # Errors
///
/// Returns an error if a required API key is missing, or if `save` is set
/// and saving fails.
pub(crate) async fn run_search(
    config: &AppConfig,
    user: Option<&str>,
    company: Option<&str>,
    pages: u32,
    save: bool,
) -> anyhow::Result<()> {
    let Some(company) = company.map(str::trim).filter(|c| !c.is_empty()) else {
        print_suggestions();
        return Ok(());
    };
    // Resolve the user before spending API calls on a feed we cannot save.
    let user = if save {
        Some(app::require_user(user)?)
    } else {
        None
    };

    let mut controller = app::build_controller(config)?;
    print_notices(&controller.search(company).await);
    for _ in 1..pages {
        if !controller.state().can_load_more() {
            break;
        }
        print_notices(&controller.load_more().await);
    }

    let state = controller.state();
    if !state.articles().is_empty() {
        println!();
        println!(
            "{} ({} articles: {})",
            state.company(),
            state.articles().len(),
            render::sentiment_summary(state.articles())
        );
        print!("{}", render::articles(state.articles()));
    }

    if let Some(user) = user {
        let store = Store::open(config).await?;
        let record = controller.save(&store, user).await?;
        println!(
            "Saved {} articles for {} (id: {})",
            record.article_count, record.company_name, record.id
        );
    }
    Ok(())
}
