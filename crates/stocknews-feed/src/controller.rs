//! Drives a [`FeedState`] with a page source and an enricher.

use std::sync::Arc;

use stocknews_core::{EnrichedArticle, SavedCompanyRecord};
use stocknews_db::PersistenceGateway;
use stocknews_enrich::{Enricher, TextModel};
use stocknews_source::PageSource;

use crate::error::{ErrorKind, FeedError};
use crate::state::{FeedEvent, FeedState, Notice, PageRequest, PageTicket};

/// The I/O half of a feed: fetches and enriches the page a [`PageRequest`]
/// names. Cheap to clone; clones share the same source and enricher.
pub struct PageFetcher<S, M> {
    source: Arc<S>,
    enricher: Arc<Enricher<M>>,
    page_size: u32,
}

impl<S, M> Clone for PageFetcher<S, M> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            enricher: Arc::clone(&self.enricher),
            page_size: self.page_size,
        }
    }
}

impl<S, M> PageFetcher<S, M>
where
    S: PageSource + Sync,
    M: TextModel + Sync,
{
    #[must_use]
    pub fn new(source: S, enricher: Enricher<M>, page_size: u32) -> Self {
        Self {
            source: Arc::new(source),
            enricher: Arc::new(enricher),
            page_size,
        }
    }

    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    #[must_use]
    pub fn enricher(&self) -> &Enricher<M> {
        &self.enricher
    }

    #[must_use]
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Fetch and enrich the page named by `request`.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Source`] if the page fetch fails or
    /// [`FeedError::Enrichment`] if the page cannot be enriched.
    pub async fn fetch(&self, request: &PageRequest) -> Result<Vec<EnrichedArticle>, FeedError> {
        let page = request.ticket.page;
        tracing::debug!(company = %request.company, page, "fetching page");
        let raw = self
            .source
            .fetch_page(&request.company, self.page_size, page)
            .await?;
        if raw.is_empty() {
            return Ok(Vec::new());
        }
        let enriched = self.enricher.enrich(raw).await?;
        tracing::info!(
            company = %request.company,
            page,
            count = enriched.len(),
            "page loaded"
        );
        Ok(enriched)
    }
}

/// Owns one feed session.
///
/// The stepwise API is [`FeedController::submit_search`] or
/// [`FeedController::request_more`], then a fetch on a
/// [`FeedController::fetcher`] clone, then [`FeedController::complete`].
/// The fetcher does not borrow the controller, so a new search can be
/// submitted while an older page is still loading; completions from
/// superseded searches are dropped. [`FeedController::search`] and
/// [`FeedController::load_more`] run a whole cycle.
pub struct FeedController<S, M> {
    fetcher: PageFetcher<S, M>,
    state: FeedState,
}

impl<S, M> FeedController<S, M>
where
    S: PageSource + Sync,
    M: TextModel + Sync,
{
    #[must_use]
    pub fn new(source: S, enricher: Enricher<M>, page_size: u32) -> Self {
        Self {
            fetcher: PageFetcher::new(source, enricher, page_size),
            state: FeedState::default(),
        }
    }

    #[must_use]
    pub fn state(&self) -> &FeedState {
        &self.state
    }

    #[must_use]
    pub fn source(&self) -> &S {
        self.fetcher.source()
    }

    #[must_use]
    pub fn enricher(&self) -> &Enricher<M> {
        self.fetcher.enricher()
    }

    #[must_use]
    pub fn page_size(&self) -> u32 {
        self.fetcher.page_size()
    }

    /// A handle for running page fetches independently of the controller.
    #[must_use]
    pub fn fetcher(&self) -> PageFetcher<S, M> {
        self.fetcher.clone()
    }

    /// Start a new search. Returns the page-1 request, or `None` for a blank
    /// query.
    pub fn submit_search(&mut self, company: &str) -> Option<PageRequest> {
        let (request, _) = self.apply(FeedEvent::SearchSubmitted {
            company: company.to_string(),
        });
        if let Some(request) = &request {
            tracing::info!(
                company = %request.company,
                generation = request.ticket.generation,
                "search submitted"
            );
        }
        request
    }

    /// Ask for the next page. `None` when a fetch is already in flight, the
    /// feed is exhausted, or no search is active.
    pub fn request_more(&mut self) -> Option<PageRequest> {
        let (request, _) = self.apply(FeedEvent::LoadMoreRequested);
        if request.is_none() {
            tracing::debug!(
                phase = ?self.state.phase(),
                exhausted = self.state.exhausted(),
                "load more ignored"
            );
        }
        request
    }

    /// Feed a fetch result back into the state machine.
    pub fn complete(
        &mut self,
        ticket: PageTicket,
        result: Result<Vec<EnrichedArticle>, FeedError>,
    ) -> Vec<Notice> {
        let stale = ticket.generation != self.state.generation();
        let event = match result {
            Ok(articles) => FeedEvent::PageLoaded { ticket, articles },
            Err(e) => {
                let kind = e.kind().unwrap_or(ErrorKind::FetchFailed);
                if !stale {
                    tracing::warn!(
                        page = ticket.page,
                        kind = %kind,
                        error = %e,
                        "page fetch failed; feed exhausted"
                    );
                }
                FeedEvent::PageFailed {
                    ticket,
                    kind,
                    message: e.to_string(),
                }
            }
        };
        if stale {
            tracing::debug!(
                generation = ticket.generation,
                current = self.state.generation(),
                page = ticket.page,
                "discarding stale page"
            );
        }
        let (_, notices) = self.apply(event);
        notices
    }

    /// Submit a search and load its first page.
    pub async fn search(&mut self, company: &str) -> Vec<Notice> {
        let Some(request) = self.submit_search(company) else {
            return Vec::new();
        };
        let result = self.fetcher.fetch(&request).await;
        self.complete(request.ticket, result)
    }

    /// Load the next page if allowed.
    pub async fn load_more(&mut self) -> Vec<Notice> {
        let Some(request) = self.request_more() else {
            return Vec::new();
        };
        let result = self.fetcher.fetch(&request).await;
        self.complete(request.ticket, result)
    }

    /// Save the active company and every accumulated article.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::NothingToSave`] when the feed is empty, or
    /// [`FeedError::Persistence`] if the gateway fails.
    pub async fn save<G>(
        &self,
        gateway: &G,
        user_id: &str,
    ) -> Result<SavedCompanyRecord, FeedError>
    where
        G: PersistenceGateway + Sync,
    {
        crate::workflows::save_feed(gateway, user_id, &self.state).await
    }

    fn apply(&mut self, event: FeedEvent) -> (Option<PageRequest>, Vec<Notice>) {
        let transition = std::mem::take(&mut self.state).apply(event);
        self.state = transition.state;
        (transition.request, transition.notices)
    }
}
