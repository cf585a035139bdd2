//! Process-local gateway, used when no database is configured.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use stocknews_core::{company_slug, EnrichedArticle, SavedCompanyRecord};

use crate::gateway::PersistenceGateway;
use crate::GatewayError;

type Records = HashMap<String, HashMap<String, SavedCompanyRecord>>;

#[derive(Debug, Default)]
pub struct InMemoryGateway {
    records: Mutex<Records>,
}

impl InMemoryGateway {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Records> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PersistenceGateway for InMemoryGateway {
    async fn save(
        &self,
        user_id: &str,
        company_name: &str,
        articles: &[EnrichedArticle],
    ) -> Result<SavedCompanyRecord, GatewayError> {
        let record = SavedCompanyRecord {
            id: company_slug(company_name),
            company_name: company_name.to_string(),
            articles: articles.to_vec(),
            last_updated: Utc::now(),
            article_count: articles.len(),
        };
        self.lock()
            .entry(user_id.to_string())
            .or_default()
            .insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn list(&self, user_id: &str) -> Result<Vec<SavedCompanyRecord>, GatewayError> {
        let mut records: Vec<SavedCompanyRecord> = self
            .lock()
            .get(user_id)
            .map(|by_slug| by_slug.values().cloned().collect())
            .unwrap_or_default();
        records.sort_by(|a, b| {
            b.last_updated
                .cmp(&a.last_updated)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(records)
    }

    async fn get(
        &self,
        user_id: &str,
        record_id: &str,
    ) -> Result<Option<SavedCompanyRecord>, GatewayError> {
        Ok(self
            .lock()
            .get(user_id)
            .and_then(|by_slug| by_slug.get(record_id))
            .cloned())
    }

    async fn delete(&self, user_id: &str, record_id: &str) -> Result<(), GatewayError> {
        self.lock()
            .get_mut(user_id)
            .and_then(|by_slug| by_slug.remove(record_id))
            .map(|_| ())
            .ok_or_else(|| GatewayError::NotFound(record_id.to_string()))
    }

    async fn delete_all(&self, user_id: &str) -> Result<u64, GatewayError> {
        let removed = self
            .lock()
            .remove(user_id)
            .map_or(0, |by_slug| by_slug.len());
        Ok(u64::try_from(removed).unwrap_or(u64::MAX))
    }
}
