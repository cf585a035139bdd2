//! Saved-company operations: save, refresh, list, delete.

use stocknews_core::SavedCompanyRecord;
use stocknews_db::{GatewayError, PersistenceGateway};
use stocknews_enrich::{Enricher, TextModel};
use stocknews_source::PageSource;

use crate::error::FeedError;
use crate::state::FeedState;

/// Save the feed's company and accumulated articles, replacing any earlier
/// save for the same company.
///
/// # Errors
///
/// [`FeedError::NothingToSave`] when the feed has no articles;
/// [`FeedError::Persistence`] if the gateway fails.
pub async fn save_feed<G>(
    gateway: &G,
    user_id: &str,
    state: &FeedState,
) -> Result<SavedCompanyRecord, FeedError>
where
    G: PersistenceGateway + Sync,
{
    if state.articles().is_empty() {
        return Err(FeedError::NothingToSave);
    }
    let record = gateway
        .save(user_id, state.company(), state.articles())
        .await?;
    tracing::info!(
        user_id,
        id = %record.id,
        article_count = record.article_count,
        "feed saved"
    );
    Ok(record)
}

/// Re-fetch page 1 for a saved company and overwrite the record with it.
///
/// # Errors
///
/// - [`FeedError::Persistence`] with [`GatewayError::NotFound`] if there is
///   no such record.
/// - [`FeedError::NoResults`] if the source has nothing; the record is left
///   as it was.
/// - [`FeedError::Source`] / [`FeedError::Enrichment`] if the fetch or the
///   enrichment fails.
pub async fn refresh_company<S, M, G>(
    source: &S,
    enricher: &Enricher<M>,
    gateway: &G,
    user_id: &str,
    record_id: &str,
    page_size: u32,
) -> Result<SavedCompanyRecord, FeedError>
where
    S: PageSource + Sync,
    M: TextModel + Sync,
    G: PersistenceGateway + Sync,
{
    let existing = gateway
        .get(user_id, record_id)
        .await?
        .ok_or_else(|| GatewayError::NotFound(record_id.to_string()))?;

    let raw = source
        .fetch_page(&existing.company_name, page_size, 1)
        .await?;
    if raw.is_empty() {
        tracing::info!(user_id, id = record_id, "refresh found no articles");
        return Err(FeedError::NoResults);
    }

    let articles = enricher.enrich(raw).await?;
    let record = gateway
        .save(user_id, &existing.company_name, &articles)
        .await?;
    tracing::info!(
        user_id,
        id = %record.id,
        article_count = record.article_count,
        "saved company refreshed"
    );
    Ok(record)
}

/// # Errors
///
/// Returns [`FeedError::Persistence`] if the gateway fails.
pub async fn list_saved<G>(
    gateway: &G,
    user_id: &str,
) -> Result<Vec<SavedCompanyRecord>, FeedError>
where
    G: PersistenceGateway + Sync,
{
    Ok(gateway.list(user_id).await?)
}

/// # Errors
///
/// Returns [`FeedError::Persistence`] if the record does not exist or the
/// gateway fails.
pub async fn delete_saved<G>(
    gateway: &G,
    user_id: &str,
    record_id: &str,
) -> Result<(), FeedError>
where
    G: PersistenceGateway + Sync,
{
    gateway.delete(user_id, record_id).await?;
    tracing::info!(user_id, id = record_id, "saved company deleted");
    Ok(())
}

/// Remove every saved company for the user and return how many went.
///
/// # Errors
///
/// Returns [`FeedError::Persistence`] if the gateway fails.
pub async fn delete_all_saved<G>(gateway: &G, user_id: &str) -> Result<u64, FeedError>
where
    G: PersistenceGateway + Sync,
{
    let removed = gateway.delete_all(user_id).await?;
    tracing::info!(user_id, removed, "all saved companies deleted");
    Ok(removed)
}
