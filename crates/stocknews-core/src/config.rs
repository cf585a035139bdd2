use crate::app_config::AppConfig;
use crate::ConfigError;

const DEFAULT_NEWS_API_BASE_URL: &str = "https://eventregistry.org/api/v1";
const DEFAULT_GEMINI_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-2.0-flash-lite";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// API keys are optional here; callers that need one ask for it through
/// [`AppConfig::require_news_api_key`] or [`AppConfig::require_gemini_api_key`].
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let optional = |var: &str| -> Option<String> {
        lookup(var).ok().filter(|v| !v.trim().is_empty())
    };

    let or_default = |var: &str, default: &str| -> String {
        optional(var).unwrap_or_else(|| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let page_size = parse_u32("STOCKNEWS_PAGE_SIZE", "10")?;
    if page_size == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "STOCKNEWS_PAGE_SIZE".to_string(),
            reason: "page size must be at least 1".to_string(),
        });
    }

    Ok(AppConfig {
        news_api_key: optional("NEWS_API_KEY"),
        news_api_base_url: or_default("NEWS_API_BASE_URL", DEFAULT_NEWS_API_BASE_URL),
        gemini_api_key: optional("GEMINI_API_KEY"),
        gemini_api_base_url: or_default("GEMINI_API_BASE_URL", DEFAULT_GEMINI_API_BASE_URL),
        model: or_default("STOCKNEWS_MODEL", DEFAULT_MODEL),
        page_size,
        enrich_concurrency: parse_usize("STOCKNEWS_ENRICH_CONCURRENCY", "0")?,
        request_timeout_secs: parse_u64("STOCKNEWS_REQUEST_TIMEOUT_SECS", "30")?,
        log_level: or_default("STOCKNEWS_LOG_LEVEL", "info"),
        user_id: optional("STOCKNEWS_USER_ID"),
        database_url: optional("DATABASE_URL"),
        db_max_connections: parse_u32("STOCKNEWS_DB_MAX_CONNECTIONS", "10")?,
        db_min_connections: parse_u32("STOCKNEWS_DB_MIN_CONNECTIONS", "1")?,
        db_acquire_timeout_secs: parse_u64("STOCKNEWS_DB_ACQUIRE_TIMEOUT_SECS", "10")?,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
