use thiserror::Error;

/// Errors returned by the news source client.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The search API answered HTTP 429.
    #[error("API rate limit exceeded. Please try again later.")]
    RateLimited,

    /// The search API answered with any other non-2xx status. Carries the
    /// upstream `message` when the body had one.
    #[error("{0}")]
    FetchFailed(String),

    /// The caller asked for something the API cannot serve (e.g. page 0).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

impl SourceError {
    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, SourceError::RateLimited)
    }
}
