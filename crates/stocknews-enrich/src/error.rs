use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnrichError {
    /// The batch could not be issued at all (the worker pool is closed).
    #[error("enrichment unavailable: {0}")]
    Unavailable(String),

    /// The model answered, but not with something usable.
    #[error("model error: {0}")]
    Model(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The two batches did not line up with the input page.
    #[error(
        "enrichment results misaligned: {expected} articles, {sentiments} sentiments, {headlines} headlines"
    )]
    Misaligned {
        expected: usize,
        sentiments: usize,
        headlines: usize,
    },
}
