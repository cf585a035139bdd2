//! Wiring from [`AppConfig`] to concrete clients and the saved-company store.

use anyhow::Context;
use stocknews_core::{AppConfig, EnrichedArticle, SavedCompanyRecord};
use stocknews_db::{GatewayError, InMemoryGateway, PersistenceGateway, PgGateway};
use stocknews_enrich::{Enricher, FanOut, GeminiClient};
use stocknews_feed::FeedController;
use stocknews_source::EventRegistryClient;

pub(crate) type LiveController = FeedController<EventRegistryClient, GeminiClient>;

pub(crate) fn build_source(config: &AppConfig) -> anyhow::Result<EventRegistryClient> {
    let key = config.require_news_api_key()?;
    EventRegistryClient::with_base_url(key, config.request_timeout_secs, &config.news_api_base_url)
        .context("failed to build news source client")
}

pub(crate) fn build_enricher(config: &AppConfig) -> anyhow::Result<Enricher<GeminiClient>> {
    let key = config.require_gemini_api_key()?;
    let model = GeminiClient::with_base_url(
        key,
        &config.model,
        config.request_timeout_secs,
        &config.gemini_api_base_url,
    )
    .context("failed to build model client")?;
    let fan_out = FanOut::from_limit(config.enrich_concurrency);
    tracing::debug!(model = model.model(), ?fan_out, "enricher ready");
    Ok(Enricher::new(model, fan_out))
}

pub(crate) fn build_controller(config: &AppConfig) -> anyhow::Result<LiveController> {
    Ok(FeedController::new(
        build_source(config)?,
        build_enricher(config)?,
        config.page_size,
    ))
}

pub(crate) fn require_user(user: Option<&str>) -> anyhow::Result<&str> {
    user.filter(|u| !u.trim().is_empty())
        .ok_or_else(|| anyhow::anyhow!("no user id: pass --user or set STOCKNEWS_USER_ID"))
}

/// Saved-company store: Postgres when `DATABASE_URL` is set, otherwise
/// process memory (lost on exit).
pub(crate) enum Store {
    Postgres(PgGateway),
    Memory(InMemoryGateway),
}

impl Store {
    pub(crate) async fn open(config: &AppConfig) -> anyhow::Result<Self> {
        if config.database_url.is_none() {
            tracing::warn!("DATABASE_URL not set; saved companies are kept in memory only");
            return Ok(Store::Memory(InMemoryGateway::new()));
        }
        let pool = stocknews_db::connect_pool_from_config(config).await?;
        Ok(Store::Postgres(PgGateway::new(pool)))
    }
}

impl PersistenceGateway for Store {
    async fn save(
        &self,
        user_id: &str,
        company_name: &str,
        articles: &[EnrichedArticle],
    ) -> Result<SavedCompanyRecord, GatewayError> {
        match self {
            Store::Postgres(g) => g.save(user_id, company_name, articles).await,
            Store::Memory(g) => g.save(user_id, company_name, articles).await,
        }
    }

    async fn list(&self, user_id: &str) -> Result<Vec<SavedCompanyRecord>, GatewayError> {
        match self {
            Store::Postgres(g) => g.list(user_id).await,
            Store::Memory(g) => g.list(user_id).await,
        }
    }

    async fn get(
        &self,
        user_id: &str,
        record_id: &str,
    ) -> Result<Option<SavedCompanyRecord>, GatewayError> {
        match self {
            Store::Postgres(g) => g.get(user_id, record_id).await,
            Store::Memory(g) => g.get(user_id, record_id).await,
        }
    }

    async fn delete(&self, user_id: &str, record_id: &str) -> Result<(), GatewayError> {
        match self {
            Store::Postgres(g) => g.delete(user_id, record_id).await,
            Store::Memory(g) => g.delete(user_id, record_id).await,
        }
    }

    async fn delete_all(&self, user_id: &str) -> Result<u64, GatewayError> {
        match self {
            Store::Postgres(g) => g.delete_all(user_id).await,
            Store::Memory(g) => g.delete_all(user_id).await,
        }
    }
}
