//! The feed as a pure state machine.
//!
//! [`FeedState::apply`] takes an event and returns the next state together
//! with the page fetch to issue (if any) and the notices to show. Nothing
//! here performs I/O.
//!
//! Every search bumps the generation. Each page request carries the
//! generation it was issued under, and completions from an older generation
//! are dropped without touching the state.

use std::fmt;

use stocknews_core::EnrichedArticle;

use crate::error::ErrorKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedPhase {
    /// No search has been submitted.
    #[default]
    Idle,
    /// First page of a search in flight.
    Loading,
    /// A continuation page in flight.
    LoadingMore,
    /// Nothing in flight.
    Ready,
}

/// Identifies one page request: the search it belongs to and the page number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageTicket {
    pub generation: u64,
    pub page: u32,
}

/// A page fetch the caller should perform and report back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub company: String,
    pub ticket: PageTicket,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedEvent {
    SearchSubmitted {
        company: String,
    },
    LoadMoreRequested,
    PageLoaded {
        ticket: PageTicket,
        articles: Vec<EnrichedArticle>,
    },
    PageFailed {
        ticket: PageTicket,
        kind: ErrorKind,
        message: String,
    },
}

/// User-facing feedback produced by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Found { count: usize },
    NoResults,
    RateLimited,
    Failed { message: String },
    EndReached,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Found { count } => write!(f, "Found {count} articles"),
            Notice::NoResults => f.write_str("No articles found for this company"),
            Notice::RateLimited => f.write_str("API rate limit exceeded. Please try again later."),
            Notice::Failed { message } => f.write_str(message),
            Notice::EndReached => f.write_str("No more articles"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedState {
    company: String,
    articles: Vec<EnrichedArticle>,
    current_page: u32,
    exhausted: bool,
    phase: FeedPhase,
    generation: u64,
}

impl Default for FeedState {
    fn default() -> Self {
        Self {
            company: String::new(),
            articles: Vec::new(),
            current_page: 1,
            exhausted: false,
            phase: FeedPhase::Idle,
            generation: 0,
        }
    }
}

/// Result of applying one event.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: FeedState,
    pub request: Option<PageRequest>,
    pub notices: Vec<Notice>,
}

impl Transition {
    fn quiet(state: FeedState) -> Self {
        Self {
            state,
            request: None,
            notices: Vec::new(),
        }
    }
}

impl FeedState {
    #[must_use]
    pub fn company(&self) -> &str {
        &self.company
    }

    #[must_use]
    pub fn articles(&self) -> &[EnrichedArticle] {
        &self.articles
    }

    /// Last page fetched for the current search. Starts at `1`.
    #[must_use]
    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    #[must_use]
    pub fn exhausted(&self) -> bool {
        self.exhausted
    }

    #[must_use]
    pub fn phase(&self) -> FeedPhase {
        self.phase
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// A page fetch is in flight.
    #[must_use]
    pub fn pending(&self) -> bool {
        matches!(self.phase, FeedPhase::Loading | FeedPhase::LoadingMore)
    }

    /// Whether a load-more trigger would issue a fetch right now.
    #[must_use]
    pub fn can_load_more(&self) -> bool {
        self.phase == FeedPhase::Ready && !self.exhausted
    }

    #[must_use]
    pub fn apply(self, event: FeedEvent) -> Transition {
        match event {
            FeedEvent::SearchSubmitted { company } => self.submit(&company),
            FeedEvent::LoadMoreRequested => self.load_more(),
            FeedEvent::PageLoaded { ticket, articles } => self.page_loaded(ticket, articles),
            FeedEvent::PageFailed {
                ticket,
                kind,
                message,
            } => self.page_failed(ticket, kind, message),
        }
    }

    fn submit(self, company: &str) -> Transition {
        let company = company.trim();
        if company.is_empty() {
            return Transition::quiet(self);
        }

        let generation = self.generation + 1;
        let ticket = PageTicket {
            generation,
            page: 1,
        };
        let state = FeedState {
            company: company.to_string(),
            articles: Vec::new(),
            current_page: 1,
            exhausted: false,
            phase: FeedPhase::Loading,
            generation,
        };
        Transition {
            request: Some(PageRequest {
                company: state.company.clone(),
                ticket,
            }),
            state,
            notices: Vec::new(),
        }
    }

    fn load_more(mut self) -> Transition {
        if !self.can_load_more() {
            return Transition::quiet(self);
        }

        self.phase = FeedPhase::LoadingMore;
        let request = PageRequest {
            company: self.company.clone(),
            ticket: PageTicket {
                generation: self.generation,
                page: self.current_page + 1,
            },
        };
        Transition {
            state: self,
            request: Some(request),
            notices: Vec::new(),
        }
    }

    /// A completion counts only if it answers the request currently in flight.
    fn is_current(&self, ticket: PageTicket) -> bool {
        ticket.generation == self.generation
            && match self.phase {
                FeedPhase::Loading => ticket.page == 1,
                FeedPhase::LoadingMore => ticket.page == self.current_page + 1,
                FeedPhase::Idle | FeedPhase::Ready => false,
            }
    }

    fn page_loaded(mut self, ticket: PageTicket, articles: Vec<EnrichedArticle>) -> Transition {
        if !self.is_current(ticket) {
            return Transition::quiet(self);
        }

        let first_page = self.phase == FeedPhase::Loading;
        self.phase = FeedPhase::Ready;
        let notice = if articles.is_empty() {
            self.exhausted = true;
            if first_page {
                self.articles.clear();
                Notice::NoResults
            } else {
                Notice::EndReached
            }
        } else {
            let count = articles.len();
            self.articles.extend(articles);
            self.current_page = ticket.page;
            if first_page {
                Notice::Found { count }
            } else {
                return Transition::quiet(self);
            }
        };

        Transition {
            state: self,
            request: None,
            notices: vec![notice],
        }
    }

    fn page_failed(mut self, ticket: PageTicket, kind: ErrorKind, message: String) -> Transition {
        if !self.is_current(ticket) {
            return Transition::quiet(self);
        }

        let first_page = self.phase == FeedPhase::Loading;
        self.phase = FeedPhase::Ready;
        self.exhausted = true;
        let notice = if first_page {
            self.articles.clear();
            match kind {
                ErrorKind::RateLimited => Notice::RateLimited,
                _ => Notice::Failed { message },
            }
        } else {
            Notice::EndReached
        };

        Transition {
            state: self,
            request: None,
            notices: vec![notice],
        }
    }
}

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
