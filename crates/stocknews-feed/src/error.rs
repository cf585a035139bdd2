use std::fmt;

use stocknews_db::GatewayError;
use stocknews_enrich::EnrichError;
use stocknews_source::SourceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Enrichment(#[from] EnrichError),

    #[error(transparent)]
    Persistence(#[from] GatewayError),

    #[error("No articles to save")]
    NothingToSave,

    #[error("No new articles found")]
    NoResults,
}

/// Coarse failure classes reported to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    RateLimited,
    FetchFailed,
    EnrichmentUnavailable,
    PersistenceFailed,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ErrorKind::RateLimited => "rate_limited",
            ErrorKind::FetchFailed => "fetch_failed",
            ErrorKind::EnrichmentUnavailable => "enrichment_unavailable",
            ErrorKind::PersistenceFailed => "persistence_failed",
        })
    }
}

impl FeedError {
    /// The failure class, or `None` for outcomes that are not failures of
    /// an upstream (nothing to save, nothing found).
    #[must_use]
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            FeedError::Source(SourceError::RateLimited) => Some(ErrorKind::RateLimited),
            FeedError::Source(_) => Some(ErrorKind::FetchFailed),
            FeedError::Enrichment(_) => Some(ErrorKind::EnrichmentUnavailable),
            FeedError::Persistence(_) => Some(ErrorKind::PersistenceFailed),
            FeedError::NothingToSave | FeedError::NoResults => None,
        }
    }
}
