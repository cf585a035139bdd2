//! Wire types for the Event Registry `article/getArticles` endpoint.

use serde::{Deserialize, Serialize};
use stocknews_core::RawArticle;

/// Request body for `POST {base}/article/getArticles`.
///
/// Matches on titles only, restricted to English business news, newest first.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ArticleSearchRequest<'a> {
    pub api_key: &'a str,
    pub keyword: &'a str,
    pub keyword_loc: &'static str,
    pub category_uri: &'static str,
    pub result_type: &'static str,
    pub lang: &'static str,
    pub articles_sort_by: &'static str,
    pub articles_page: u32,
    pub articles_count: u32,
}

impl<'a> ArticleSearchRequest<'a> {
    pub(crate) fn new(api_key: &'a str, keyword: &'a str, page_size: u32, page: u32) -> Self {
        Self {
            api_key,
            keyword,
            keyword_loc: "title",
            category_uri: "news/Business",
            result_type: "articles",
            lang: "eng",
            articles_sort_by: "date",
            articles_page: page,
            articles_count: page_size,
        }
    }
}

/// Top-level response envelope. `articles` is absent on some error-free
/// responses (e.g. an unknown keyword), which counts as an empty page.
#[derive(Debug, Deserialize)]
pub struct ArticleSearchResponse {
    #[serde(default)]
    pub articles: Option<ArticleResults>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleResults {
    #[serde(default)]
    pub results: Vec<SourceArticle>,
    #[serde(default)]
    pub total_results: u64,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub pages: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceArticle {
    #[serde(default)]
    pub title: String,
    pub body: Option<String>,
    #[serde(default)]
    pub url: String,
    pub image: Option<String>,
    pub source: Option<SourceInfo>,
    pub date_time_pub: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SourceInfo {
    pub uri: Option<String>,
    pub title: Option<String>,
}

/// One normalized page of results plus the source's pagination metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticlePage {
    pub articles: Vec<RawArticle>,
    pub total_results: u64,
    pub page: u32,
    pub pages: u32,
}
