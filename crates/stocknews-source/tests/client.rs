//! Integration tests for `EventRegistryClient` using wiremock HTTP mocks.

use serde_json::json;
use stocknews_source::{EventRegistryClient, PageSource, SourceError};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> EventRegistryClient {
    EventRegistryClient::with_base_url("test-key", 5, base_url)
        .expect("client construction should not fail")
}

fn article(n: usize) -> serde_json::Value {
    json!({
        "title": format!("Acme headline {n}"),
        "body": format!("Body {n}"),
        "url": format!("https://news.example.com/acme-{n}"),
        "image": null,
        "source": { "uri": "news.example.com", "dataType": "news", "title": "Example News" },
        "dateTimePub": "2025-03-01T09:30:00Z"
    })
}

fn page_body(count: usize, page: u32) -> serde_json::Value {
    json!({
        "articles": {
            "results": (1..=count).map(article).collect::<Vec<_>>(),
            "totalResults": 57,
            "page": page,
            "count": count,
            "pages": 6
        }
    })
}

#[tokio::test]
async fn search_posts_expected_body_and_parses_page() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/article/getArticles"))
        .and(body_partial_json(json!({
            "apiKey": "test-key",
            "keyword": "Acme",
            "keywordLoc": "title",
            "categoryUri": "news/Business",
            "lang": "eng",
            "articlesSortBy": "date",
            "articlesPage": 1,
            "articlesCount": 10
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(10, 1)))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let page = client.search("Acme", 10, 1).await.expect("should parse page");

    assert_eq!(page.articles.len(), 10);
    assert_eq!(page.total_results, 57);
    assert_eq!(page.pages, 6);
    assert_eq!(page.articles[0].url, "https://news.example.com/acme-1");
    assert_eq!(page.articles[9].url, "https://news.example.com/acme-10");
    assert_eq!(page.articles[0].source_name, "Example News");
    assert!(page.articles[0].image_url.is_none());
}

#[tokio::test]
async fn fetch_page_sends_requested_page_number() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/article/getArticles"))
        .and(body_partial_json(json!({ "articlesPage": 3, "articlesCount": 5 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(5, 3)))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let articles = client.fetch_page("Acme", 5, 3).await.expect("page 3");
    assert_eq!(articles.len(), 5);
}

#[tokio::test]
async fn page_past_the_end_is_empty_not_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/article/getArticles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "articles": { "results": [], "totalResults": 57, "page": 99, "count": 0, "pages": 6 }
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let articles = client.fetch_page("Acme", 10, 99).await.expect("empty page is Ok");
    assert!(articles.is_empty());
}

#[tokio::test]
async fn response_without_articles_object_is_empty() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/article/getArticles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let articles = client
        .fetch_page("Nonexistent Corp", 10, 1)
        .await
        .expect("missing articles object is Ok");
    assert!(articles.is_empty());
}

#[tokio::test]
async fn http_429_maps_to_rate_limited() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/article/getArticles"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({ "message": "slow down" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.fetch_page("Acme", 10, 1).await.unwrap_err();
    assert!(err.is_rate_limited(), "expected RateLimited, got: {err:?}");
}

#[tokio::test]
async fn http_429_ignores_unreadable_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/article/getArticles"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("retry-after", "30")
                .set_body_bytes(vec![0xff, 0xfe, 0x00, 0x9f]),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.search("Acme", 10, 1).await.unwrap_err();
    assert!(
        matches!(err, SourceError::RateLimited),
        "expected RateLimited, got: {err:?}"
    );
}

#[tokio::test]
async fn non_2xx_carries_upstream_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/article/getArticles"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Invalid API key" })),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.fetch_page("Acme", 10, 1).await.unwrap_err();
    assert!(
        matches!(err, SourceError::FetchFailed(ref msg) if msg == "Invalid API key"),
        "expected FetchFailed(Invalid API key), got: {err:?}"
    );
}

#[tokio::test]
async fn non_2xx_without_message_uses_generic_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/article/getArticles"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.fetch_page("Acme", 10, 1).await.unwrap_err();
    match err {
        SourceError::FetchFailed(msg) => {
            assert!(msg.starts_with("Failed to fetch news articles"), "got: {msg}");
            assert!(msg.contains("503"), "got: {msg}");
        }
        other => panic!("expected FetchFailed, got: {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_is_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/article/getArticles"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.fetch_page("Acme", 10, 1).await.unwrap_err();
    assert!(matches!(err, SourceError::Deserialize { .. }), "got: {err:?}");
}

#[tokio::test]
async fn page_zero_is_rejected_without_a_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(1, 1)))
        .expect(0)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.fetch_page("Acme", 10, 0).await.unwrap_err();
    assert!(matches!(err, SourceError::InvalidRequest(_)), "got: {err:?}");
}
