//! Conversion from Event Registry results to [`RawArticle`].

use stocknews_core::RawArticle;

use crate::types::{ArticlePage, ArticleSearchResponse, SourceArticle};

/// Map one source result onto the shared article shape.
///
/// Missing `body`, `source.title`, and `dateTimePub` become empty strings;
/// a missing or blank `image` becomes `None`.
#[must_use]
pub fn normalize_article(article: SourceArticle) -> RawArticle {
    let (source_id, source_name) = match article.source {
        Some(source) => (
            source.uri.filter(|uri| !uri.is_empty()),
            source.title.unwrap_or_default(),
        ),
        None => (None, String::new()),
    };

    RawArticle {
        title: article.title,
        description: article.body.unwrap_or_default(),
        url: article.url,
        image_url: article.image.filter(|image| !image.trim().is_empty()),
        source_id,
        source_name,
        published_at: article.date_time_pub.unwrap_or_default(),
    }
}

/// Normalize a full response. A response without an `articles` object is
/// an empty page.
#[must_use]
pub fn normalize_response(response: ArticleSearchResponse, requested_page: u32) -> ArticlePage {
    match response.articles {
        Some(results) => ArticlePage {
            articles: results
                .results
                .into_iter()
                .map(normalize_article)
                .collect(),
            total_results: results.total_results,
            page: if results.page == 0 {
                requested_page
            } else {
                results.page
            },
            pages: results.pages,
        },
        None => ArticlePage {
            articles: Vec::new(),
            total_results: 0,
            page: requested_page,
            pages: 0,
        },
    }
}
