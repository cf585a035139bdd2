//! Plain-text rendering of feeds and saved records.

use stocknews_core::{EnrichedArticle, SavedCompanyRecord, Sentiment};

fn badge(sentiment: Sentiment) -> &'static str {
    match sentiment {
        Sentiment::Bullish => "[BULLISH]",
        Sentiment::Bearish => "[BEARISH]",
        Sentiment::Neutral => "[NEUTRAL]",
    }
}

/// One numbered article: badge and display title, then source, date and url.
pub(crate) fn article_block(index: usize, article: &EnrichedArticle) -> String {
    let raw = &article.article;
    let meta: Vec<&str> = [raw.source_name.as_str(), raw.published_at.as_str()]
        .into_iter()
        .filter(|field| !field.is_empty())
        .collect();

    let mut lines = vec![format!(
        "{:>3}. {:<9} {}",
        index + 1,
        badge(article.sentiment),
        article.display_title()
    )];
    if !meta.is_empty() {
        lines.push(format!("     {}", meta.join(" | ")));
    }
    lines.push(format!("     {}", raw.url));
    lines.join("\n") + "\n"
}

pub(crate) fn articles(articles: &[EnrichedArticle]) -> String {
    articles
        .iter()
        .enumerate()
        .map(|(i, a)| article_block(i, a))
        .collect()
}

/// Counts per sentiment, e.g. `3 bullish, 1 bearish, 6 neutral`.
pub(crate) fn sentiment_summary(articles: &[EnrichedArticle]) -> String {
    let count = |s: Sentiment| articles.iter().filter(|a| a.sentiment == s).count();
    format!(
        "{} bullish, {} bearish, {} neutral",
        count(Sentiment::Bullish),
        count(Sentiment::Bearish),
        count(Sentiment::Neutral)
    )
}

pub(crate) fn record_line(record: &SavedCompanyRecord) -> String {
    format!(
        "{:<24} {:<24} {:>4} articles  updated {}",
        record.id,
        record.company_name,
        record.article_count,
        record.last_updated.format("%Y-%m-%d %H:%M UTC")
    )
}
