//! Enrichment of one page of raw articles.

use stocknews_core::{ArticleText, EnrichedArticle, RawArticle};

use crate::batch::{classify_sentiment_batch, summarize_headline_batch, FanOut, WorkerPool};
use crate::error::EnrichError;
use crate::model::TextModel;

/// Runs the sentiment and headline batches for a page and merges them.
pub struct Enricher<M> {
    model: M,
    pool: WorkerPool,
}

impl<M> Enricher<M>
where
    M: TextModel + Sync,
{
    #[must_use]
    pub fn new(model: M, fan_out: FanOut) -> Self {
        Self {
            model,
            pool: WorkerPool::new(fan_out),
        }
    }

    #[must_use]
    pub fn model(&self) -> &M {
        &self.model
    }

    #[must_use]
    pub fn pool(&self) -> &WorkerPool {
        &self.pool
    }

    /// Enrich `articles`, keeping their order.
    ///
    /// Both batches are in flight at the same time. Output `i` is
    /// `articles[i]` with `sentiments[i]` and `headlines[i]` (an empty
    /// headline is stored as `None`).
    ///
    /// # Errors
    ///
    /// - [`EnrichError::Unavailable`] if either batch could not be issued.
    /// - [`EnrichError::Misaligned`] if a batch returned the wrong number of
    ///   results.
    pub async fn enrich(
        &self,
        articles: Vec<RawArticle>,
    ) -> Result<Vec<EnrichedArticle>, EnrichError> {
        if articles.is_empty() {
            return Ok(Vec::new());
        }

        let items: Vec<ArticleText> = articles.iter().map(RawArticle::text).collect();
        let (sentiments, headlines) = futures::join!(
            classify_sentiment_batch(&self.model, &self.pool, &items),
            summarize_headline_batch(&self.model, &self.pool, &items),
        );
        let sentiments = sentiments?;
        let headlines = headlines?;

        if sentiments.len() != articles.len() || headlines.len() != articles.len() {
            return Err(EnrichError::Misaligned {
                expected: articles.len(),
                sentiments: sentiments.len(),
                headlines: headlines.len(),
            });
        }

        let enriched: Vec<EnrichedArticle> = articles
            .into_iter()
            .zip(sentiments)
            .zip(headlines)
            .map(|((article, sentiment), headline)| {
                EnrichedArticle::new(article, sentiment, headline)
            })
            .collect();

        tracing::debug!(count = enriched.len(), "page enriched");
        Ok(enriched)
    }
}
