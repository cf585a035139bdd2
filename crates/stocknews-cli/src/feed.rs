//! `feed` command: an interactive session over one feed controller.
//!
//! Reads one command per line from stdin. `more` plays the part of the
//! scroll trigger; it is ignored while exhausted.

use stocknews_core::AppConfig;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::app::{self, Store};
use crate::render;
use crate::search::{print_notices, print_suggestions};

const HELP: &str = "\
commands:
  search <company>   start a new search
  more               load the next page
  save               save the current feed
  list               list saved companies
  help               show this help
  quit               end the session";

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum FeedCommand {
    Search(String),
    More,
    Save,
    List,
    Help,
    Quit,
    Unknown(String),
}

pub(crate) fn parse_command(line: &str) -> Option<FeedCommand> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(w, r)| (w, r.trim()));
    let command = match word.to_lowercase().as_str() {
        "search" | "s" => FeedCommand::Search(rest.to_string()),
        "more" | "m" => FeedCommand::More,
        "save" => FeedCommand::Save,
        "list" | "ls" => FeedCommand::List,
        "help" | "?" => FeedCommand::Help,
        "quit" | "exit" | "q" => FeedCommand::Quit,
        _ => FeedCommand::Unknown(word.to_string()),
    };
    Some(command)
}

pub(crate) async fn run_feed_session(
    config: &AppConfig,
    user: Option<&str>,
) -> anyhow::Result<()> {
    let mut controller = app::build_controller(config)?;
    let store = Store::open(config).await?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{HELP}");
    while let Some(line) = lines.next_line().await? {
        let Some(command) = parse_command(&line) else {
            continue;
        };
        match command {
            FeedCommand::Search(company) if company.is_empty() => print_suggestions(),
            FeedCommand::Search(company) => {
                print_notices(&controller.search(&company).await);
                print!("{}", render::articles(controller.state().articles()));
            }
            FeedCommand::More => {
                let shown = controller.state().articles().len();
                if !controller.state().can_load_more() {
                    println!("No more articles");
                    continue;
                }
                print_notices(&controller.load_more().await);
                let articles = controller.state().articles();
                for (i, article) in articles.iter().enumerate().skip(shown) {
                    print!("{}", render::article_block(i, article));
                }
            }
            FeedCommand::Save => match app::require_user(user) {
                Ok(user) => match controller.save(&store, user).await {
                    Ok(record) => println!("Articles saved successfully! ({})", record.id),
                    Err(e) => eprintln!("error: {e}"),
                },
                Err(e) => eprintln!("error: {e}"),
            },
            FeedCommand::List => match app::require_user(user) {
                Ok(user) => match stocknews_feed::list_saved(&store, user).await {
                    Ok(records) if records.is_empty() => println!("no saved companies"),
                    Ok(records) => {
                        for record in &records {
                            println!("{}", render::record_line(record));
                        }
                    }
                    Err(e) => eprintln!("error: {e}"),
                },
                Err(e) => eprintln!("error: {e}"),
            },
            FeedCommand::Help => println!("{HELP}"),
            FeedCommand::Quit => break,
            FeedCommand::Unknown(word) => eprintln!("unknown command '{word}'; try 'help'"),
        }
    }
    Ok(())
}
