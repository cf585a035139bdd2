//! Saved article sets, one per user and company.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::articles::EnrichedArticle;

/// A company's enriched articles as last saved by a user.
///
/// `id` is the company slug (see [`company_slug`]). Every save replaces the
/// record wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedCompanyRecord {
    pub id: String,
    pub company_name: String,
    pub articles: Vec<EnrichedArticle>,
    pub last_updated: DateTime<Utc>,
    /// Always equal to `articles.len()`.
    pub article_count: usize,
}

/// Derive the record key for a company name: lowercase, whitespace runs
/// collapsed to single hyphens.
///
/// ```
/// assert_eq!(stocknews_core::company_slug("Acme  Corp"), "acme-corp");
/// ```
#[must_use]
pub fn company_slug(company_name: &str) -> String {
    company_name
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}
