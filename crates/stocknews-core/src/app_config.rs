use crate::ConfigError;

#[derive(Clone)]
pub struct AppConfig {
    pub news_api_key: Option<String>,
    pub news_api_base_url: String,
    pub gemini_api_key: Option<String>,
    pub gemini_api_base_url: String,
    pub model: String,
    pub page_size: u32,
    /// Cap on concurrent model calls. `0` means unbounded.
    pub enrich_concurrency: usize,
    pub request_timeout_secs: u64,
    pub log_level: String,
    pub user_id: Option<String>,
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
}

impl AppConfig {
    /// The Event Registry key, required by any operation that searches.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] if `NEWS_API_KEY` was not set.
    pub fn require_news_api_key(&self) -> Result<&str, ConfigError> {
        self.news_api_key
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar("NEWS_API_KEY".to_string()))
    }

    /// The generative model key, required by any operation that enriches.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] if `GEMINI_API_KEY` was not set.
    pub fn require_gemini_api_key(&self) -> Result<&str, ConfigError> {
        self.gemini_api_key
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar("GEMINI_API_KEY".to_string()))
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field(
                "news_api_key",
                &self.news_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("news_api_base_url", &self.news_api_base_url)
            .field(
                "gemini_api_key",
                &self.gemini_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("gemini_api_base_url", &self.gemini_api_base_url)
            .field("model", &self.model)
            .field("page_size", &self.page_size)
            .field("enrich_concurrency", &self.enrich_concurrency)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("log_level", &self.log_level)
            .field("user_id", &self.user_id)
            .field(
                "database_url",
                &self.database_url.as_ref().map(|_| "[redacted]"),
            )
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .finish()
    }
}
