use std::future::Future;

use stocknews_core::{EnrichedArticle, SavedCompanyRecord};

use crate::GatewayError;

/// Per-user store of saved company article sets.
///
/// Records are keyed by [`stocknews_core::company_slug`] of the company name.
/// The gateway derives the slug and stamps `last_updated`; callers only
/// supply the company name and the enriched articles.
pub trait PersistenceGateway {
    /// Create or wholesale replace the record for `company_name`.
    fn save(
        &self,
        user_id: &str,
        company_name: &str,
        articles: &[EnrichedArticle],
    ) -> impl Future<Output = Result<SavedCompanyRecord, GatewayError>> + Send;

    /// All of the user's records, most recently updated first.
    fn list(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<Vec<SavedCompanyRecord>, GatewayError>> + Send;

    fn get(
        &self,
        user_id: &str,
        record_id: &str,
    ) -> impl Future<Output = Result<Option<SavedCompanyRecord>, GatewayError>> + Send;

    /// Remove one record. [`GatewayError::NotFound`] if it does not exist.
    fn delete(
        &self,
        user_id: &str,
        record_id: &str,
    ) -> impl Future<Output = Result<(), GatewayError>> + Send;

    /// Remove every record for the user, returning how many were removed.
    fn delete_all(&self, user_id: &str) -> impl Future<Output = Result<u64, GatewayError>> + Send;
}
