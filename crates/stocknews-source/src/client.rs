//! HTTP client for the Event Registry article search API.
//!
//! Wraps `reqwest` with the search request shape, API key management, and
//! typed error mapping: 429 becomes [`SourceError::RateLimited`], any other
//! non-2xx becomes [`SourceError::FetchFailed`] with the upstream message.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use stocknews_core::RawArticle;

use crate::error::SourceError;
use crate::normalize::normalize_response;
use crate::types::{ArticlePage, ArticleSearchRequest, ArticleSearchResponse};
use crate::PageSource;

const DEFAULT_BASE_URL: &str = "https://eventregistry.org/api/v1";
const GENERIC_FAILURE: &str = "Failed to fetch news articles";

/// Client for the Event Registry REST API.
///
/// Use [`EventRegistryClient::new`] for production or
/// [`EventRegistryClient::with_base_url`] to point at a mock server in tests.
pub struct EventRegistryClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl EventRegistryClient {
    /// Creates a new client pointed at the production Event Registry API.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, SourceError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`SourceError::InvalidRequest`] if
    /// `base_url` is not a valid URL.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("stocknews/0.1 (news-aggregator)")
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| {
            SourceError::InvalidRequest(format!("invalid base URL '{base_url}': {e}"))
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
        })
    }

    /// Fetches one page of articles whose titles match `query`, with the
    /// source's pagination metadata.
    ///
    /// # Errors
    ///
    /// - [`SourceError::InvalidRequest`] if `page_size` or `page` is zero.
    /// - [`SourceError::RateLimited`] on HTTP 429.
    /// - [`SourceError::FetchFailed`] on any other non-2xx status.
    /// - [`SourceError::Http`] on network failure.
    /// - [`SourceError::Deserialize`] if the body does not match the expected shape.
    pub async fn search(
        &self,
        query: &str,
        page_size: u32,
        page: u32,
    ) -> Result<ArticlePage, SourceError> {
        if page_size == 0 || page == 0 {
            return Err(SourceError::InvalidRequest(format!(
                "page size and page number are 1-indexed (got size {page_size}, page {page})"
            )));
        }

        let url = self.endpoint();
        let request = ArticleSearchRequest::new(&self.api_key, query, page_size, page);

        tracing::debug!(query, page, page_size, "requesting article page");
        let response = self.client.post(url).json(&request).send().await?;
        let status = response.status();
        // Rate limiting is decided by status alone; the body may never arrive.
        if status == StatusCode::TOO_MANY_REQUESTS {
            tracing::warn!(query, page, "news source rate limited the search");
            return Err(SourceError::RateLimited);
        }

        let body = response.text().await?;
        if !status.is_success() {
            let message = upstream_message(&body)
                .unwrap_or_else(|| format!("{GENERIC_FAILURE} (HTTP {})", status.as_u16()));
            return Err(SourceError::FetchFailed(message));
        }

        let parsed: ArticleSearchResponse =
            serde_json::from_str(&body).map_err(|e| SourceError::Deserialize {
                context: format!("getArticles(keyword={query}, page={page})"),
                source: e,
            })?;

        let result = normalize_response(parsed, page);
        tracing::debug!(
            query,
            page = result.page,
            count = result.articles.len(),
            total = result.total_results,
            "received article page"
        );
        Ok(result)
    }

    /// The `article/getArticles` endpoint under the configured base URL.
    fn endpoint(&self) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(["article", "getArticles"]);
        }
        url
    }
}

impl PageSource for EventRegistryClient {
    async fn fetch_page(
        &self,
        query: &str,
        page_size: u32,
        page: u32,
    ) -> Result<Vec<RawArticle>, SourceError> {
        self.search(query, page_size, page)
            .await
            .map(|page| page.articles)
    }
}

/// Pulls a human-readable message out of an error body, if it has one.
fn upstream_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["message", "error"]
        .iter()
        .find_map(|key| value.get(key).and_then(serde_json::Value::as_str))
        .filter(|msg| !msg.trim().is_empty())
        .map(str::to_owned)
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
