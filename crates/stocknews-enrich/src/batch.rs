//! Per-item batch clients for the two enrichment tasks.
//!
//! Each item becomes its own model call, all issued together through a
//! [`WorkerPool`]. A failed item never fails the batch: it falls back to
//! [`Sentiment::Neutral`] or an empty headline and the failure is logged.
//! Output `i` always belongs to input `i`.

use std::sync::Arc;

use futures::future::try_join_all;
use stocknews_core::{ArticleText, Sentiment};
use tokio::sync::{Semaphore, SemaphorePermit};

use crate::error::EnrichError;
use crate::model::TextModel;
use crate::parse::{clean_headline, parse_sentiment};
use crate::prompts::{headline_prompt, sentiment_prompt};

/// How many model calls may be in flight through one [`WorkerPool`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FanOut {
    /// One concurrent call per item, no cap.
    #[default]
    Unbounded,
    /// At most `n` concurrent calls.
    Limited(usize),
}

impl FanOut {
    /// `0` means unbounded, matching the `STOCKNEWS_ENRICH_CONCURRENCY` setting.
    #[must_use]
    pub fn from_limit(limit: usize) -> Self {
        if limit == 0 {
            FanOut::Unbounded
        } else {
            FanOut::Limited(limit)
        }
    }

    fn permits(self) -> usize {
        match self {
            FanOut::Unbounded => Semaphore::MAX_PERMITS,
            FanOut::Limited(n) => n.min(Semaphore::MAX_PERMITS),
        }
    }
}

/// Gate for per-item model calls.
///
/// Cloning shares the same permits. Once [`WorkerPool::close`] is called
/// every batch fails with [`EnrichError::Unavailable`].
#[derive(Debug, Clone)]
pub struct WorkerPool {
    fan_out: FanOut,
    semaphore: Arc<Semaphore>,
}

impl WorkerPool {
    #[must_use]
    pub fn new(fan_out: FanOut) -> Self {
        Self {
            fan_out,
            semaphore: Arc::new(Semaphore::new(fan_out.permits())),
        }
    }

    #[must_use]
    pub fn fan_out(&self) -> FanOut {
        self.fan_out
    }

    /// Stop accepting work. In-flight calls finish; new batches fail.
    pub fn close(&self) {
        self.semaphore.close();
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.semaphore.is_closed()
    }

    fn ensure_open(&self) -> Result<(), EnrichError> {
        if self.is_closed() {
            Err(EnrichError::Unavailable(
                "enrichment worker pool is closed".to_string(),
            ))
        } else {
            Ok(())
        }
    }
}

/// Classify every item as bullish, bearish or neutral.
///
/// # Errors
///
/// Returns [`EnrichError::Unavailable`] only when the pool is closed and the
/// batch cannot be issued. Per-item failures become `Neutral`.
pub async fn classify_sentiment_batch<M>(
    model: &M,
    pool: &WorkerPool,
    items: &[ArticleText],
) -> Result<Vec<Sentiment>, EnrichError>
where
    M: TextModel + Sync,
{
    pool.ensure_open()?;
    let labels = try_join_all(
        items
            .iter()
            .enumerate()
            .map(|(index, item)| classify_one(model, pool, index, item)),
    )
    .await?;
    tracing::debug!(count = labels.len(), "sentiment batch complete");
    Ok(labels)
}

/// Write a short headline for every item. An empty string means none.
///
/// # Errors
///
/// Returns [`EnrichError::Unavailable`] only when the pool is closed and the
/// batch cannot be issued. Per-item failures become an empty string.
pub async fn summarize_headline_batch<M>(
    model: &M,
    pool: &WorkerPool,
    items: &[ArticleText],
) -> Result<Vec<String>, EnrichError>
where
    M: TextModel + Sync,
{
    pool.ensure_open()?;
    let headlines = try_join_all(
        items
            .iter()
            .enumerate()
            .map(|(index, item)| summarize_one(model, pool, index, item)),
    )
    .await?;
    tracing::debug!(count = headlines.len(), "headline batch complete");
    Ok(headlines)
}

async fn classify_one<M>(
    model: &M,
    pool: &WorkerPool,
    index: usize,
    item: &ArticleText,
) -> Result<Sentiment, EnrichError>
where
    M: TextModel + Sync,
{
    let _permit = acquire(pool).await?;
    match model.generate(&sentiment_prompt(item)).await {
        Ok(text) => Ok(parse_sentiment(&text)),
        Err(e) => {
            tracing::warn!(
                index,
                title = %item.title,
                error = %e,
                fallback = %Sentiment::Neutral,
                "sentiment classification failed; using fallback"
            );
            Ok(Sentiment::Neutral)
        }
    }
}

async fn summarize_one<M>(
    model: &M,
    pool: &WorkerPool,
    index: usize,
    item: &ArticleText,
) -> Result<String, EnrichError>
where
    M: TextModel + Sync,
{
    let _permit = acquire(pool).await?;
    match model.generate(&headline_prompt(item)).await {
        Ok(text) => Ok(clean_headline(&text)),
        Err(e) => {
            tracing::warn!(
                index,
                title = %item.title,
                error = %e,
                "headline generation failed; leaving headline empty"
            );
            Ok(String::new())
        }
    }
}

async fn acquire(pool: &WorkerPool) -> Result<SemaphorePermit<'_>, EnrichError> {
    pool.semaphore.acquire().await.map_err(|_| {
        EnrichError::Unavailable("enrichment worker pool closed mid-batch".to_string())
    })
}

#[cfg(test)]
#[path = "batch_test.rs"]
mod tests;
