//! Article types flowing from the news source through enrichment to the feed.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Market sentiment label attached to every enriched article.
///
/// `Neutral` is both the model's "no clear impact" answer and the fallback
/// used whenever a label cannot be derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Bullish,
    Bearish,
    #[default]
    Neutral,
}

impl Sentiment {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Sentiment::Bullish => "bullish",
            Sentiment::Bearish => "bearish",
            Sentiment::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One article as returned by the news source, before enrichment.
///
/// `url` is the stable identity of an article within a result set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawArticle {
    pub title: String,
    /// Article body or summary. Empty when the source sent none.
    #[serde(default)]
    pub description: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Source identifier (a URI for Event Registry), when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    #[serde(default)]
    pub source_name: String,
    /// Source-provided publication timestamp, kept verbatim.
    #[serde(default)]
    pub published_at: String,
}

impl RawArticle {
    /// Project the fields the enrichment prompts need.
    #[must_use]
    pub fn text(&self) -> ArticleText {
        ArticleText {
            title: self.title.clone(),
            description: self.description.clone(),
        }
    }
}

/// The `(title, description)` pair submitted to the enrichment model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleText {
    pub title: String,
    pub description: String,
}

/// A [`RawArticle`] plus its derived sentiment label and short headline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedArticle {
    #[serde(flatten)]
    pub article: RawArticle,
    #[serde(default)]
    pub sentiment: Sentiment,
    /// Model-written headline. `None` when generation failed or came back empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_title: Option<String>,
}

impl EnrichedArticle {
    /// Merge a raw article with its enrichment results.
    ///
    /// An empty headline is stored as `None` so consumers fall back to the
    /// original title.
    #[must_use]
    pub fn new(article: RawArticle, sentiment: Sentiment, short_title: String) -> Self {
        let short_title = if short_title.is_empty() {
            None
        } else {
            Some(short_title)
        };
        Self {
            article,
            sentiment,
            short_title,
        }
    }

    /// Title to show: the short headline when present, otherwise the original.
    #[must_use]
    pub fn display_title(&self) -> &str {
        self.short_title.as_deref().unwrap_or(&self.article.title)
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.article.url
    }
}
