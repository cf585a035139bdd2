//! Postgres gateway over the `saved_companies` table.

use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use stocknews_core::{company_slug, EnrichedArticle, SavedCompanyRecord};

use crate::gateway::PersistenceGateway;
use crate::GatewayError;

const RECORD_COLUMNS: &str = "id, company_name, articles, article_count, last_updated";

/// A row from the `saved_companies` table.
#[derive(Debug, sqlx::FromRow)]
struct SavedCompanyRow {
    id: String,
    company_name: String,
    articles: Json<Vec<EnrichedArticle>>,
    article_count: i32,
    last_updated: DateTime<Utc>,
}

impl From<SavedCompanyRow> for SavedCompanyRecord {
    fn from(row: SavedCompanyRow) -> Self {
        Self {
            id: row.id,
            company_name: row.company_name,
            articles: row.articles.0,
            last_updated: row.last_updated,
            article_count: usize::try_from(row.article_count).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PgGateway {
    pool: PgPool,
}

impl PgGateway {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl PersistenceGateway for PgGateway {
    async fn save(
        &self,
        user_id: &str,
        company_name: &str,
        articles: &[EnrichedArticle],
    ) -> Result<SavedCompanyRecord, GatewayError> {
        let slug = company_slug(company_name);
        let payload = serde_json::to_value(articles)?;
        let article_count = i32::try_from(articles.len()).unwrap_or(i32::MAX);

        let row = sqlx::query_as::<_, SavedCompanyRow>(&format!(
            "INSERT INTO saved_companies \
                 (user_id, id, company_name, articles, article_count, last_updated) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT (user_id, id) DO UPDATE SET \
                 company_name = EXCLUDED.company_name, \
                 articles = EXCLUDED.articles, \
                 article_count = EXCLUDED.article_count, \
                 last_updated = EXCLUDED.last_updated \
             RETURNING {RECORD_COLUMNS}"
        ))
        .bind(user_id)
        .bind(&slug)
        .bind(company_name)
        .bind(payload)
        .bind(article_count)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(user_id, id = %slug, article_count, "saved company articles");
        Ok(row.into())
    }

    async fn list(&self, user_id: &str) -> Result<Vec<SavedCompanyRecord>, GatewayError> {
        let rows = sqlx::query_as::<_, SavedCompanyRow>(&format!(
            "SELECT {RECORD_COLUMNS} \
             FROM saved_companies \
             WHERE user_id = $1 \
             ORDER BY last_updated DESC, id"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(SavedCompanyRecord::from).collect())
    }

    async fn get(
        &self,
        user_id: &str,
        record_id: &str,
    ) -> Result<Option<SavedCompanyRecord>, GatewayError> {
        let row = sqlx::query_as::<_, SavedCompanyRow>(&format!(
            "SELECT {RECORD_COLUMNS} \
             FROM saved_companies \
             WHERE user_id = $1 AND id = $2"
        ))
        .bind(user_id)
        .bind(record_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(SavedCompanyRecord::from))
    }

    async fn delete(&self, user_id: &str, record_id: &str) -> Result<(), GatewayError> {
        let result = sqlx::query("DELETE FROM saved_companies WHERE user_id = $1 AND id = $2")
            .bind(user_id)
            .bind(record_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(GatewayError::NotFound(record_id.to_string()));
        }
        tracing::info!(user_id, id = record_id, "deleted saved company");
        Ok(())
    }

    async fn delete_all(&self, user_id: &str) -> Result<u64, GatewayError> {
        let result = sqlx::query("DELETE FROM saved_companies WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        tracing::info!(user_id, removed = result.rows_affected(), "deleted all saved companies");
        Ok(result.rows_affected())
    }
}
