//! Article source adapter for the Event Registry news search API.
//!
//! Translates a company-name query plus a 1-indexed page number into a page
//! of [`RawArticle`]s. An empty page is the exhaustion signal; HTTP 429 is
//! surfaced as [`SourceError::RateLimited`]. Nothing here retries.

pub mod client;
pub mod error;
pub mod normalize;
pub mod types;

use std::future::Future;

use stocknews_core::RawArticle;

pub use client::EventRegistryClient;
pub use error::SourceError;
pub use types::ArticlePage;

/// Anything that can serve pages of raw articles for a query.
///
/// `page_size` and `page` are 1-indexed. A page past the last one yields an
/// empty `Vec`, not an error.
pub trait PageSource {
    fn fetch_page(
        &self,
        query: &str,
        page_size: u32,
        page: u32,
    ) -> impl Future<Output = Result<Vec<RawArticle>, SourceError>> + Send;
}
