//! Turning free-text model output into labels and headlines.

use stocknews_core::Sentiment;

const HEADLINE_EDGE: &[char] = &['"', '\'', '-', '–', '—'];

/// Derive a sentiment label from model output.
///
/// Matching is substring containment on the lowercased text, `bullish`
/// checked first. Anything else is neutral.
///
/// ```
/// use stocknews_core::Sentiment;
/// use stocknews_enrich::parse_sentiment;
///
/// assert_eq!(parse_sentiment("  Bullish.\n"), Sentiment::Bullish);
/// assert_eq!(parse_sentiment("hard to say"), Sentiment::Neutral);
/// ```
#[must_use]
pub fn parse_sentiment(text: &str) -> Sentiment {
    let text = text.trim().to_lowercase();
    if text.contains("bullish") {
        Sentiment::Bullish
    } else if text.contains("bearish") {
        Sentiment::Bearish
    } else {
        Sentiment::Neutral
    }
}

/// Reduce model output to a single clean headline.
///
/// Keeps the first line and strips quotes, dashes and whitespace from both
/// ends. An empty result means no headline was produced.
#[must_use]
pub fn clean_headline(text: &str) -> String {
    let first_line = text.trim().lines().next().unwrap_or_default();
    first_line
        .trim_matches(|c: char| c.is_whitespace() || HEADLINE_EDGE.contains(&c))
        .to_string()
}
