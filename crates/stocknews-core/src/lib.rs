//! Shared domain types and configuration for the stock news aggregator.

pub mod app_config;
pub mod articles;
pub mod config;
pub mod saved;

use thiserror::Error;

pub use app_config::AppConfig;
pub use articles::{ArticleText, EnrichedArticle, RawArticle, Sentiment};
pub use config::{load_app_config, load_app_config_from_env};
pub use saved::{company_slug, SavedCompanyRecord};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
