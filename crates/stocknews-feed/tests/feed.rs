//! Feed controller and saved-company workflows against scripted doubles.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use stocknews_core::{RawArticle, Sentiment};
use stocknews_db::{GatewayError, InMemoryGateway, PersistenceGateway};
use stocknews_enrich::{EnrichError, Enricher, FanOut, TextModel};
use stocknews_feed::{
    delete_all_saved, delete_saved, list_saved, refresh_company, ErrorKind, FeedController,
    FeedError, FeedPhase, Notice,
};
use stocknews_source::{PageSource, SourceError};
use tokio::sync::Notify;

// ---------------------------------------------------------------------------
// Doubles
// ---------------------------------------------------------------------------

#[derive(Clone)]
enum Reply {
    Page(Vec<RawArticle>),
    RateLimited,
    Fail(&'static str),
}

/// Holds a fetch open until the test releases it.
#[derive(Default)]
struct Gate {
    entered: Notify,
    release: Notify,
}

/// Serves scripted pages keyed by (company, page). Unscripted pages are empty.
#[derive(Default)]
struct ScriptedSource {
    pages: Mutex<HashMap<(String, u32), Reply>>,
    calls: Mutex<Vec<(String, u32)>>,
    gate: Option<(String, Arc<Gate>)>,
}

impl ScriptedSource {
    fn with(self, company: &str, page: u32, reply: Reply) -> Self {
        self.script(company, page, reply);
        self
    }

    /// Every fetch for `company` waits on `gate` before replying.
    fn gated(mut self, company: &str, gate: Arc<Gate>) -> Self {
        self.gate = Some((company.to_string(), gate));
        self
    }

    fn script(&self, company: &str, page: u32, reply: Reply) {
        self.pages
            .lock()
            .unwrap()
            .insert((company.to_string(), page), reply);
    }

    fn calls(&self) -> Vec<(String, u32)> {
        self.calls.lock().unwrap().clone()
    }
}

impl PageSource for ScriptedSource {
    async fn fetch_page(
        &self,
        query: &str,
        _page_size: u32,
        page: u32,
    ) -> Result<Vec<RawArticle>, SourceError> {
        self.calls.lock().unwrap().push((query.to_string(), page));
        if let Some((company, gate)) = &self.gate {
            if company == query {
                gate.entered.notify_one();
                gate.release.notified().await;
            }
        }
        let reply = self
            .pages
            .lock()
            .unwrap()
            .get(&(query.to_string(), page))
            .cloned();
        match reply {
            Some(Reply::Page(articles)) => Ok(articles),
            Some(Reply::RateLimited) => Err(SourceError::RateLimited),
            Some(Reply::Fail(message)) => Err(SourceError::FetchFailed(message.to_string())),
            None => Ok(Vec::new()),
        }
    }
}

/// Bullish for every article; headline `Short <title>` unless the title ends
/// in `#9`, which gets an empty headline.
#[derive(Default)]
struct ScriptedModel {
    calls: AtomicUsize,
}

impl ScriptedModel {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TextModel for ScriptedModel {
    async fn generate(&self, prompt: &str) -> Result<String, EnrichError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if prompt.starts_with("Analyze the sentiment") {
            return Ok("Bullish".to_string());
        }
        let title = prompt
            .lines()
            .find_map(|line| line.strip_prefix("Original Title: "))
            .unwrap_or_default();
        if title.ends_with("#9") {
            Ok(String::new())
        } else {
            Ok(format!("Short {title}"))
        }
    }
}

fn raw(company: &str, page: u32, n: usize) -> RawArticle {
    RawArticle {
        title: format!("{company} p{page} #{n}"),
        description: format!("{company} news item {n}"),
        url: format!("https://news.example.com/{company}/{page}/{n}"),
        image_url: None,
        source_id: None,
        source_name: "Example News".to_string(),
        published_at: "2025-03-01T09:30:00Z".to_string(),
    }
}

fn page(company: &str, page_no: u32, count: usize) -> Reply {
    Reply::Page((0..count).map(|n| raw(company, page_no, n)).collect())
}

fn controller(
    source: ScriptedSource,
    page_size: u32,
) -> FeedController<ScriptedSource, ScriptedModel> {
    FeedController::new(
        source,
        Enricher::new(ScriptedModel::default(), FanOut::Unbounded),
        page_size,
    )
}

// ---------------------------------------------------------------------------
// Search and pagination
// ---------------------------------------------------------------------------

#[tokio::test]
async fn first_page_is_enriched_with_headline_fallback() {
    let source = ScriptedSource::default().with("Acme", 1, page("Acme", 1, 10));
    let mut feed = controller(source, 10);

    let notices = feed.search("Acme").await;

    assert_eq!(notices, [Notice::Found { count: 10 }]);
    let state = feed.state();
    assert_eq!(state.articles().len(), 10);
    assert!(!state.exhausted());
    assert_eq!(state.phase(), FeedPhase::Ready);
    assert!(state.articles()[9].short_title.is_none());
    assert_eq!(state.articles()[9].display_title(), "Acme p1 #9");
    for article in &state.articles()[..9] {
        assert!(article.short_title.is_some());
        assert_eq!(article.sentiment, Sentiment::Bullish);
    }
}

#[tokio::test]
async fn unknown_company_notifies_once_and_stops() {
    let mut feed = controller(ScriptedSource::default(), 10);

    let notices = feed.search("Nonexistent Corp").await;
    assert_eq!(notices, [Notice::NoResults]);
    assert!(feed.state().exhausted());
    assert!(feed.state().articles().is_empty());

    assert!(feed.load_more().await.is_empty());
    assert!(feed.load_more().await.is_empty());
    assert_eq!(feed.source().calls(), [("Nonexistent Corp".to_string(), 1)]);
    assert_eq!(feed.enricher().model().calls(), 0);
}

#[tokio::test]
async fn second_page_appends_in_order() {
    let source = ScriptedSource::default()
        .with("Acme", 1, page("Acme", 1, 10))
        .with("Acme", 2, page("Acme", 2, 7));
    let mut feed = controller(source, 10);

    feed.search("Acme").await;
    let notices = feed.load_more().await;

    assert!(notices.is_empty());
    let urls: Vec<_> = feed.state().articles().iter().map(|a| a.url()).collect();
    assert_eq!(urls.len(), 17);
    for (i, url) in urls[..10].iter().enumerate() {
        assert_eq!(*url, format!("https://news.example.com/Acme/1/{i}"));
    }
    for (i, url) in urls[10..].iter().enumerate() {
        assert_eq!(*url, format!("https://news.example.com/Acme/2/{i}"));
    }
    assert_eq!(feed.state().current_page(), 2);
}

#[tokio::test]
async fn exhaustion_blocks_further_calls() {
    let source = ScriptedSource::default().with("Acme", 1, page("Acme", 1, 10));
    let mut feed = controller(source, 10);

    feed.search("Acme").await;
    assert_eq!(feed.load_more().await, [Notice::EndReached]);
    assert!(feed.state().exhausted());

    assert!(feed.load_more().await.is_empty());
    assert_eq!(feed.source().calls().len(), 2);
}

#[tokio::test]
async fn only_one_page_request_in_flight() {
    let source = ScriptedSource::default()
        .with("Acme", 1, page("Acme", 1, 10))
        .with("Acme", 2, page("Acme", 2, 10));
    let mut feed = controller(source, 10);
    feed.search("Acme").await;

    let first = feed.request_more().expect("page 2 should be requested");
    assert!(feed.state().pending());
    assert!(feed.request_more().is_none());

    let result = feed.fetcher().fetch(&first).await;
    feed.complete(first.ticket, result);
    assert!(!feed.state().pending());
    assert_eq!(feed.state().articles().len(), 20);
    assert_eq!(feed.source().calls().len(), 2);
}

#[tokio::test]
async fn continuation_failure_ends_feed_quietly() {
    let source = ScriptedSource::default()
        .with("Acme", 1, page("Acme", 1, 10))
        .with("Acme", 2, Reply::Fail("upstream exploded"));
    let mut feed = controller(source, 10);

    feed.search("Acme").await;
    let notices = feed.load_more().await;

    assert_eq!(notices, [Notice::EndReached]);
    assert!(feed.state().exhausted());
    assert_eq!(feed.state().articles().len(), 10);
}

#[tokio::test]
async fn rate_limited_search_is_distinguished() {
    let source = ScriptedSource::default().with("Acme", 1, Reply::RateLimited);
    let mut feed = controller(source, 10);

    assert_eq!(feed.search("Acme").await, [Notice::RateLimited]);
    assert!(feed.state().exhausted());
}

#[tokio::test]
async fn failed_search_reports_upstream_message() {
    let source = ScriptedSource::default().with("Acme", 1, Reply::Fail("Invalid API key"));
    let mut feed = controller(source, 10);

    assert_eq!(
        feed.search("Acme").await,
        [Notice::Failed {
            message: "Invalid API key".to_string()
        }]
    );
    assert!(feed.state().articles().is_empty());
}

#[tokio::test]
async fn closed_enricher_fails_the_page() {
    let source = ScriptedSource::default().with("Acme", 1, page("Acme", 1, 3));
    let mut feed = controller(source, 10);
    feed.enricher().pool().close();

    let request = feed.submit_search("Acme").unwrap();
    let result = feed.fetcher().fetch(&request).await;
    let err = result.as_ref().unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::EnrichmentUnavailable));

    let notices = feed.complete(request.ticket, result);
    assert!(matches!(notices.as_slice(), [Notice::Failed { .. }]));
    assert!(feed.state().exhausted());
}

#[tokio::test]
async fn slow_response_from_old_search_is_discarded() {
    let source = ScriptedSource::default()
        .with("Acme", 1, page("Acme", 1, 10))
        .with("Tesla", 1, page("Tesla", 1, 4));
    let mut feed = controller(source, 10);

    let old = feed.submit_search("Acme").unwrap();
    let new = feed.submit_search("Tesla").unwrap();
    let old_result = feed.fetcher().fetch(&old).await;
    let new_result = feed.fetcher().fetch(&new).await;

    assert_eq!(
        feed.complete(new.ticket, new_result),
        [Notice::Found { count: 4 }]
    );
    assert!(feed.complete(old.ticket, old_result).is_empty());

    assert_eq!(feed.state().company(), "Tesla");
    assert_eq!(feed.state().articles().len(), 4);
    assert!(feed
        .state()
        .articles()
        .iter()
        .all(|a| a.url().contains("/Tesla/")));
}

#[tokio::test]
async fn new_search_while_old_page_in_flight_wins() {
    let gate = Arc::new(Gate::default());
    let source = ScriptedSource::default()
        .with("Acme", 1, page("Acme", 1, 10))
        .with("Tesla", 1, page("Tesla", 1, 4))
        .gated("Acme", Arc::clone(&gate));
    let mut feed = controller(source, 10);
    let fetcher = feed.fetcher();

    let old = feed.submit_search("Acme").unwrap();
    let (old_result, new_notices) = tokio::join!(fetcher.fetch(&old), async {
        gate.entered.notified().await;
        let new = feed.submit_search("Tesla").unwrap();
        let new_result = fetcher.fetch(&new).await;
        let notices = feed.complete(new.ticket, new_result);
        gate.release.notify_one();
        notices
    });

    assert_eq!(new_notices, [Notice::Found { count: 4 }]);
    assert_eq!(old_result.as_ref().map(Vec::len).ok(), Some(10));
    assert!(feed.complete(old.ticket, old_result).is_empty());

    assert_eq!(feed.state().company(), "Tesla");
    assert_eq!(feed.state().phase(), FeedPhase::Ready);
    assert_eq!(feed.state().articles().len(), 4);
    assert!(feed
        .state()
        .articles()
        .iter()
        .all(|a| a.url().contains("/Tesla/")));
    assert_eq!(
        feed.source().calls(),
        [("Acme".to_string(), 1), ("Tesla".to_string(), 1)]
    );
}

#[tokio::test]
async fn stale_failure_does_not_exhaust_new_search() {
    let source = ScriptedSource::default()
        .with("Acme", 1, Reply::Fail("boom"))
        .with("Tesla", 1, page("Tesla", 1, 2));
    let mut feed = controller(source, 10);

    let old = feed.submit_search("Acme").unwrap();
    let new = feed.submit_search("Tesla").unwrap();
    let old_result = feed.fetcher().fetch(&old).await;
    assert!(feed.complete(old.ticket, old_result).is_empty());
    assert!(!feed.state().exhausted());
    assert_eq!(feed.state().phase(), FeedPhase::Loading);

    let new_result = feed.fetcher().fetch(&new).await;
    feed.complete(new.ticket, new_result);
    assert_eq!(feed.state().articles().len(), 2);
}

#[tokio::test]
async fn blank_search_does_nothing() {
    let mut feed = controller(ScriptedSource::default(), 10);
    assert!(feed.search("   ").await.is_empty());
    assert_eq!(feed.state().phase(), FeedPhase::Idle);
    assert!(feed.source().calls().is_empty());
}

// ---------------------------------------------------------------------------
// Saved companies
// ---------------------------------------------------------------------------

#[tokio::test]
async fn empty_feed_cannot_be_saved() {
    let gateway = InMemoryGateway::new();
    let mut feed = controller(ScriptedSource::default(), 10);
    feed.search("Nonexistent Corp").await;

    let err = feed.save(&gateway, "user-1").await.unwrap_err();
    assert!(matches!(err, FeedError::NothingToSave));
    assert!(gateway.list("user-1").await.unwrap().is_empty());
}

#[tokio::test]
async fn save_then_list_round_trips_and_overwrites() {
    let gateway = InMemoryGateway::new();
    let source = ScriptedSource::default().with("Acme", 1, page("Acme", 1, 5));
    let mut feed = controller(source, 5);
    feed.search("Acme").await;

    let record = feed.save(&gateway, "user-1").await.unwrap();
    assert_eq!(record.id, "acme");

    let records = list_saved(&gateway, "user-1").await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].article_count, 5);
    assert_eq!(records[0].articles, feed.state().articles());

    feed.save(&gateway, "user-1").await.unwrap();
    assert_eq!(list_saved(&gateway, "user-1").await.unwrap().len(), 1);
}

#[tokio::test]
async fn refresh_replaces_saved_articles() {
    let gateway = InMemoryGateway::new();
    let source = ScriptedSource::default().with("Acme Corp", 1, page("Acme Corp", 1, 5));
    let mut feed = controller(source, 5);
    feed.search("Acme Corp").await;
    feed.save(&gateway, "user-1").await.unwrap();

    feed.source()
        .script("Acme Corp", 1, page("Acme Corp", 1, 3));
    let record = refresh_company(
        feed.source(),
        feed.enricher(),
        &gateway,
        "user-1",
        "acme-corp",
        10,
    )
    .await
    .unwrap();

    assert_eq!(record.article_count, 3);
    let stored = gateway.get("user-1", "acme-corp").await.unwrap().unwrap();
    assert_eq!(stored.articles.len(), 3);
    assert_eq!(stored.company_name, "Acme Corp");
}

#[tokio::test]
async fn refresh_with_nothing_new_keeps_record() {
    let gateway = InMemoryGateway::new();
    let source = ScriptedSource::default().with("Acme", 1, page("Acme", 1, 5));
    let mut feed = controller(source, 5);
    feed.search("Acme").await;
    let saved = feed.save(&gateway, "user-1").await.unwrap();

    feed.source().script("Acme", 1, Reply::Page(Vec::new()));
    let err = refresh_company(feed.source(), feed.enricher(), &gateway, "user-1", "acme", 10)
        .await
        .unwrap_err();

    assert!(matches!(err, FeedError::NoResults));
    assert_eq!(err.to_string(), "No new articles found");
    let stored = gateway.get("user-1", "acme").await.unwrap().unwrap();
    assert_eq!(stored, saved);
}

#[tokio::test]
async fn refresh_unknown_record_is_not_found() {
    let gateway = InMemoryGateway::new();
    let feed = controller(ScriptedSource::default(), 10);

    let err = refresh_company(feed.source(), feed.enricher(), &gateway, "user-1", "ghost", 10)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        FeedError::Persistence(GatewayError::NotFound(ref id)) if id == "ghost"
    ));
    assert!(feed.source().calls().is_empty());
}

#[tokio::test]
async fn delete_and_delete_all_pass_through() {
    let gateway = InMemoryGateway::new();
    let source = ScriptedSource::default()
        .with("Acme", 1, page("Acme", 1, 2))
        .with("Tesla", 1, page("Tesla", 1, 2));
    let mut feed = controller(source, 10);
    feed.search("Acme").await;
    feed.save(&gateway, "user-1").await.unwrap();
    feed.search("Tesla").await;
    feed.save(&gateway, "user-1").await.unwrap();

    delete_saved(&gateway, "user-1", "acme").await.unwrap();
    let ids: Vec<_> = list_saved(&gateway, "user-1")
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(ids, ["tesla"]);

    assert_eq!(delete_all_saved(&gateway, "user-1").await.unwrap(), 1);
    assert!(list_saved(&gateway, "user-1").await.unwrap().is_empty());
}
